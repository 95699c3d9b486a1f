// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel buffer a rasterization fills in.  One contiguous
//! allocation, row-major, three bytes (red, green, blue) per cell.

/// Bytes per pixel.
pub const CHANNELS: usize = 3;

/// A `height x width` grid of RGB triples.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A black buffer of the given size.
    pub fn new(width: usize, height: usize) -> PixelBuffer {
        PixelBuffer {
            width,
            height,
            data: vec![0 as u8; width * height * CHANNELS],
        }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of bytes in one row.
    pub fn row_len(&self) -> usize {
        self.width * CHANNELS
    }

    /// The colour at `row`, `col`.
    pub fn get(&self, row: usize, col: usize) -> Option<[u8; 3]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        let offset = (row * self.width + col) * CHANNELS;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// Iterates over the rows, top first, as the writers read them.
    pub fn rows(&self) -> std::slice::Chunks<u8> {
        self.data.chunks(self.row_len().max(1))
    }

    /// The raw bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The raw bytes, for the schedulers to carve into disjoint rows.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
