#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Batch Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which the sequence `z(0) = 0, z(n+1) = z(n)^2 + c` stays
//! bounded.  We can never iterate forever, so a point is taken to be
//! in the set if it has not left the circle of radius 2 after some
//! fixed number of iterations; a point that does leave is certainly
//! outside, and the iteration at which it left is its colour.
//!
//! Points inside the set cost the full iteration budget while points
//! far outside cost almost nothing, so the work of a single image is
//! very unevenly spread.  Rows are therefore handed out to worker
//! threads in small chunks, on demand, rather than in fixed bands;
//! see the `schedule` module.
//!
//! A batch file lists the regions to draw, and each region becomes
//! one image.

extern crate crossbeam;
extern crate failure;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;

pub mod batch;
pub mod colour;
pub mod errors;
pub mod escape;
pub mod pixels;
pub mod planes;
pub mod ppm;
pub mod render;
pub mod schedule;

pub use errors::{BatchError, RenderError};
pub use escape::{evaluate, EscapeResult};
pub use pixels::PixelBuffer;
pub use planes::{Grid, Region};
pub use render::{rasterize, Rasterizer, RenderConfig};
pub use schedule::{DynamicChunks, Policy, Schedule, Sequential, StaticPartition};
