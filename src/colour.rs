// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Maps escape results onto 24-bit colour.

use crate::escape::EscapeResult;

/// The largest 24-bit value.
pub const MAX_COLOUR: u32 = 0x00FF_FFFF;

/// The colour of points that never escaped.
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Scales the escape count against the iteration cap onto
/// `0..=0xFFFFFF` and splits the result into red, green and blue,
/// most significant byte first.  Points inside the set are white.
pub fn rgb(result: EscapeResult, max_iter: usize) -> [u8; 3] {
    match result {
        EscapeResult::Inside => WHITE,
        EscapeResult::Escaped(n) => {
            let v = ((n as f64 / max_iter as f64) * f64::from(MAX_COLOUR)).floor();
            let v = if v >= f64::from(MAX_COLOUR) {
                MAX_COLOUR
            } else {
                v as u32
            };
            [(v >> 16) as u8, (v >> 8) as u8, v as u8]
        }
    }
}
