// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Region and Grid structs.  A Region is a rectangle on
//! the complex plane that somebody asked us to draw; a Grid describes
//! the relationship between that rectangle and a rectangle on the
//! integral plane with its origin at 0,0 in the upper left corner.
use num::Complex;

use crate::errors::RenderError;
use crate::pixels::CHANNELS;

/// A rectangle on the complex plane, and the name of the image that
/// will be made of it.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    /// The smallest abscissa.
    pub xmin: f64,
    /// The largest abscissa.
    pub xmax: f64,
    /// The smallest ordinate.
    pub ymin: f64,
    /// The largest ordinate.
    pub ymax: f64,
    /// The output name, without an extension.
    pub name: String,
}

impl Region {
    /// A region given by its four bounds.
    pub fn rectangle(xmin: f64, xmax: f64, ymin: f64, ymax: f64, name: &str) -> Region {
        Region {
            xmin,
            xmax,
            ymin,
            ymax,
            name: name.to_string(),
        }
    }

    /// A square region given by its centre and the length of its side.
    pub fn square(xcenter: f64, ycenter: f64, side: f64, name: &str) -> Region {
        let half = side / 2.0;
        Region::rectangle(
            xcenter - half,
            xcenter + half,
            ycenter - half,
            ycenter + half,
            name,
        )
    }

    /// Width of the region on the complex plane.
    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Height of the region on the complex plane.
    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

/// Describes the column, row of a cell in the grid.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// The integral plane derived from a region and a sample budget.
/// Pixels are square: one unit on the complex plane is `scale`
/// pixels in both directions, so the aspect ratio of the region is
/// kept.
#[derive(Copy, Clone, Debug)]
pub struct Grid {
    /// Number of columns.
    pub width: usize,
    /// Number of rows.
    pub height: usize,
    /// Pixels per unit on the complex plane.
    pub scale: f64,
    /// The complex point at column 0, row 0: the left upper corner.
    pub origin: Complex<f64>,
}

impl Grid {
    /// Sizes a grid for `region` so that it holds roughly
    /// `target_samples` cells.  Width and height are truncated
    /// independently, so the cell count is usually a little short of
    /// the target.
    pub fn new(region: &Region, target_samples: usize) -> Result<Grid, RenderError> {
        let bounds = [region.xmin, region.xmax, region.ymin, region.ymax];
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(RenderError::InvalidRegion(format!(
                "{}: region bounds must be finite",
                region.name
            )));
        }
        if target_samples == 0 {
            return Err(RenderError::InvalidConfig(
                "the target sample count must be positive".to_string(),
            ));
        }

        let (region_width, region_height) = (region.width(), region.height());
        let scale = (target_samples as f64).sqrt() / (region_width * region_height).sqrt();
        if !scale.is_finite() {
            return Err(RenderError::InvalidRegion(format!(
                "{}: region [{}, {}] x [{}, {}] is too small to sample",
                region.name, region.xmin, region.xmax, region.ymin, region.ymax
            )));
        }

        // `as` truncates toward zero, and turns NaN or a negative
        // product into 0, which the check below rejects.
        let width = (scale * region_width) as usize;
        let height = (scale * region_height) as usize;
        if width == 0 || height == 0 || region_width <= 0.0 || region_height <= 0.0 {
            return Err(RenderError::InvalidRegion(format!(
                "{}: region [{}, {}] x [{}, {}] gives a {}x{} image",
                region.name, region.xmin, region.xmax, region.ymin, region.ymax, width, height
            )));
        }

        // A Vec holds at most isize::MAX bytes.
        let bytes = width
            .checked_mul(height)
            .and_then(|cells| cells.checked_mul(CHANNELS))
            .filter(|&bytes| bytes <= isize::max_value() as usize);
        if bytes.is_none() {
            return Err(RenderError::InvalidConfig(format!(
                "{}: a {}x{} image is too large for {} samples",
                region.name, width, height, target_samples
            )));
        }

        Ok(Grid {
            width,
            height,
            scale,
            origin: Complex::new(region.xmin, region.ymax),
        })
    }

    /// Given a pixel on the grid, return the point on the complex
    /// plane that it samples.  Row 0 is the top of the region.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        Complex::new(
            self.origin.re + (pixel.0 as f64) / self.scale,
            self.origin.im - (pixel.1 as f64) / self.scale,
        )
    }
}
