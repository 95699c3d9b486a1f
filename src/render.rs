// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a region into a finished pixel buffer.

use log::debug;

use crate::colour;
use crate::errors::RenderError;
use crate::escape;
use crate::pixels::{PixelBuffer, CHANNELS};
use crate::planes::{Grid, Pixel, Region};
use crate::schedule::{DynamicChunks, Schedule};

/// Default escape iteration cap.
pub const DEFAULT_MAX_ITER: usize = 5000;
/// Default number of samples per image.
pub const DEFAULT_TARGET_SAMPLES: usize = 1_000_000;
/// Default number of rows per dynamic chunk.
pub const DEFAULT_CHUNK_ROWS: usize = 2;

/// The knobs of a rasterization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Escape iteration cap.  Higher means finer detail at the edge
    /// of the set, and more work for every interior point.
    pub max_iter: usize,
    /// Roughly how many pixels each image should have.
    pub target_samples: usize,
    /// Rows per chunk for dynamic scheduling.
    pub chunk_rows: usize,
    /// Number of worker threads.
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            max_iter: DEFAULT_MAX_ITER,
            target_samples: DEFAULT_TARGET_SAMPLES,
            chunk_rows: DEFAULT_CHUNK_ROWS,
            threads: num_cpus::get(),
        }
    }
}

impl RenderConfig {
    /// Rejects zero values, which would leave nothing to draw or
    /// nobody to draw it.
    pub fn validate(&self) -> Result<(), RenderError> {
        let fields = [
            ("iteration cap", self.max_iter),
            ("target sample count", self.target_samples),
            ("chunk size", self.chunk_rows),
            ("thread count", self.threads),
        ];
        for (name, value) in fields.iter() {
            if *value == 0 {
                return Err(RenderError::InvalidConfig(format!(
                    "the {} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Renders regions with a fixed configuration and scheduling policy.
pub struct Rasterizer<S: Schedule> {
    config: RenderConfig,
    schedule: S,
}

impl Rasterizer<DynamicChunks> {
    /// A rasterizer that hands out chunks of `config.chunk_rows` rows
    /// on demand to `config.threads` workers.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        let schedule = DynamicChunks {
            threads: config.threads,
            chunk_rows: config.chunk_rows,
        };
        Rasterizer::with_schedule(config, schedule)
    }
}

impl<S: Schedule> Rasterizer<S> {
    /// A rasterizer using any scheduling policy.  The thread count and
    /// chunk size in `config` are only those `schedule` chose to use.
    pub fn with_schedule(config: RenderConfig, schedule: S) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Rasterizer { config, schedule })
    }

    /// Sizes the grid for `region`, evaluates every cell under the
    /// scheduling policy, and returns the buffer once every worker has
    /// finished.
    pub fn render(&self, region: &Region) -> Result<PixelBuffer, RenderError> {
        let grid = Grid::new(region, self.config.target_samples)?;
        debug!(
            "{}: {}x{} pixels, {} per unit, {}",
            region.name,
            grid.width,
            grid.height,
            grid.scale,
            self.schedule.describe()
        );

        let max_iter = self.config.max_iter;
        let mut pixels = PixelBuffer::new(grid.width, grid.height);
        let kernel = |row: usize, bytes: &mut [u8]| {
            for (column, pixel) in bytes.chunks_mut(CHANNELS).enumerate() {
                let point = grid.pixel_to_point(&Pixel(column, row));
                let result = escape::evaluate(point.re, point.im, max_iter);
                pixel.copy_from_slice(&colour::rgb(result, max_iter));
            }
        };
        self.schedule.fill(&mut pixels, &kernel)?;
        Ok(pixels)
    }
}

/// Renders `region` with dynamic scheduling over every available
/// CPU, in chunks of two rows.
pub fn rasterize(
    region: &Region,
    target_samples: usize,
    max_iter: usize,
) -> Result<PixelBuffer, RenderError> {
    let config = RenderConfig {
        max_iter,
        target_samples,
        ..RenderConfig::default()
    };
    Rasterizer::new(config)?.render(region)
}
