// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reads the batch file describing which images to draw.
//!
//! ```text
//! 3
//! 1 -2 1 -1.5 1.5 whole
//! 2 -0.75 0.1 0.2 neck
//! 1 -0.2 0.1 0.8 1.1 antenna
//! ```
//!
//! The first line holds the number of images.  Each image is then one
//! line, either `1 xmin xmax ymin ymax name` for a rectangle or
//! `2 xcenter ycenter side name` for a square.  Names carry no
//! extension.  Any defect aborts the whole batch, before anything
//! has been drawn.

use itertools::Itertools;
use log::warn;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::errors::BatchError;
use crate::planes::Region;

fn parse_number<T: FromStr>(token: &str, line: usize) -> Result<T, BatchError> {
    T::from_str(token).map_err(|_| BatchError::BadNumber(line, token.to_string()))
}

fn parse_name(token: &str, line: usize) -> Result<String, BatchError> {
    let bad = token.is_empty()
        || token.contains('.')
        || token.contains('/')
        || token.contains('\\');
    if bad {
        Err(BatchError::BadName(line, token.to_string()))
    } else {
        Ok(token.to_string())
    }
}

/// Parses one request line.  `line` is only used in error messages.
pub fn parse_entry(text: &str, line: usize) -> Result<Region, BatchError> {
    let mut tokens = text.split_whitespace();
    let tag = match tokens.next() {
        Some(tag) => tag,
        None => return Err(BatchError::WrongFieldCount(line, 6)),
    };
    match tag {
        "1" => match tokens.collect::<Vec<&str>>().as_slice() {
            [xmin, xmax, ymin, ymax, name] => Ok(Region::rectangle(
                parse_number(xmin, line)?,
                parse_number(xmax, line)?,
                parse_number(ymin, line)?,
                parse_number(ymax, line)?,
                &parse_name(name, line)?,
            )),
            _ => Err(BatchError::WrongFieldCount(line, 6)),
        },
        "2" => {
            let (xcenter, ycenter, side, name) = tokens
                .collect_tuple()
                .ok_or(BatchError::WrongFieldCount(line, 5))?;
            Ok(Region::square(
                parse_number(xcenter, line)?,
                parse_number(ycenter, line)?,
                parse_number(side, line)?,
                &parse_name(name, line)?,
            ))
        }
        other => Err(BatchError::UnknownTag(line, other.to_string())),
    }
}

/// Parses a whole batch.  Blank lines are skipped; lines after the
/// announced number of entries are ignored.
pub fn parse_batch(text: &str) -> Result<Vec<Region>, BatchError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let count: usize = match lines.next() {
        Some((line, l)) => l.parse().map_err(|_| BatchError::BadCount(line))?,
        None => return Err(BatchError::BadCount(1)),
    };

    let regions = lines
        .by_ref()
        .take(count)
        .map(|(line, l)| parse_entry(l, line))
        .collect::<Result<Vec<Region>, BatchError>>()?;
    if regions.len() < count {
        return Err(BatchError::MissingEntries(count, regions.len()));
    }

    let extra = lines.count();
    if extra > 0 {
        warn!("ignoring {} lines after the last of {} images", extra, count);
    }
    Ok(regions)
}

/// Reads and parses the batch file at `path`.
pub fn read_batch<P: AsRef<Path>>(path: P) -> Result<Vec<Region>, BatchError> {
    let text = fs::read_to_string(path)?;
    parse_batch(&text)
}
