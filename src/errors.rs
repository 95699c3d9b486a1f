// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The ways a batch can fail.  None of them are transient: the
//! computation is deterministic, so every failure is a defect in the
//! input or the configuration, and nothing is ever retried.

use failure::Fail;
use std::io;

/// Failures while turning a region into pixels.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The region is empty, inverted, or too thin to hold a pixel.
    #[fail(display = "invalid region: {}", _0)]
    InvalidRegion(String),

    /// A render parameter is out of range.
    #[fail(display = "invalid configuration: {}", _0)]
    InvalidConfig(String),

    /// A worker thread panicked before finishing its share of the grid.
    #[fail(display = "a render worker panicked")]
    WorkerPanicked,
}

/// Failures while reading a batch file.  Line numbers start at 1.
#[derive(Debug, Fail)]
pub enum BatchError {
    /// The batch file could not be read.
    #[fail(display = "could not read batch file: {}", _0)]
    Io(#[cause] io::Error),

    /// The file has no request count, or it is not a number.
    #[fail(display = "line {}: expected the number of images", _0)]
    BadCount(usize),

    /// A request starts with something other than 1 or 2.
    #[fail(display = "line {}: unknown region type '{}'", _0, _1)]
    UnknownTag(usize, String),

    /// A request has too few or too many fields for its type.
    #[fail(display = "line {}: expected {} fields", _0, _1)]
    WrongFieldCount(usize, usize),

    /// A coordinate could not be parsed.
    #[fail(display = "line {}: '{}' is not a number", _0, _1)]
    BadNumber(usize, String),

    /// An output name is empty or would escape its directory or
    /// carry its own extension.
    #[fail(display = "line {}: invalid image name '{}'", _0, _1)]
    BadName(usize, String),

    /// The file ends before all announced requests were read.
    #[fail(display = "expected {} images, found {}", _0, _1)]
    MissingEntries(usize, usize),
}

impl From<io::Error> for BatchError {
    fn from(err: io::Error) -> BatchError {
        BatchError::Io(err)
    }
}
