// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes finished pixel buffers to disk.
//!
//! The default is plain-text PPM (P3), laid out exactly as earlier
//! versions of this renderer wrote it: the header, then ` R G B ` for
//! every pixel with no line breaks, then a single newline.  Binary PPM
//! and PNG go through the `image` crate.

use failure::Error;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::convert::TryFrom;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::pixels::{PixelBuffer, CHANNELS};

/// The image formats we can write.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// Plain-text PPM, `P3`.
    Ppm,
    /// Binary PPM, `P6`.
    Pnm,
    /// PNG.
    Png,
}

impl Format {
    /// The names accepted by `from_str`.
    pub const NAMES: &'static [&'static str] = &["ppm", "pnm", "png"];

    /// The file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ppm => "ppm",
            Format::Pnm => "pnm",
            Format::Png => "png",
        }
    }
}

impl Default for Format {
    fn default() -> Format {
        Format::Ppm
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Format, String> {
        match s {
            "ppm" => Ok(Format::Ppm),
            "pnm" => Ok(Format::Pnm),
            "png" => Ok(Format::Png),
            _ => Err(format!("unknown image format '{}'", s)),
        }
    }
}

/// Streams `pixels` as plain-text PPM.
pub fn write_ppm<W: Write>(output: &mut W, pixels: &PixelBuffer) -> Result<(), std::io::Error> {
    write!(output, "P3\n{} {}\n255\n", pixels.width(), pixels.height())?;
    for row in pixels.rows() {
        for rgb in row.chunks(CHANNELS) {
            write!(output, " {} {} {} ", rgb[0], rgb[1], rgb[2])?;
        }
    }
    writeln!(output)?;
    output.flush()
}

/// Where an image named `name` lands in `outdir`.
pub fn image_path(outdir: &Path, name: &str, format: Format) -> PathBuf {
    outdir.join(format!("{}.{}", name, format.extension()))
}

// The image crate takes u32 dimensions.
fn dimensions(pixels: &PixelBuffer) -> Result<(u32, u32), Error> {
    match (u32::try_from(pixels.width()), u32::try_from(pixels.height())) {
        (Ok(width), Ok(height)) => Ok((width, height)),
        _ => Err(failure::err_msg(format!(
            "a {}x{} image is too large to encode",
            pixels.width(),
            pixels.height()
        ))),
    }
}

/// Writes `pixels` to `path` in the given format.
pub fn write_image(path: &Path, pixels: &PixelBuffer, format: Format) -> Result<(), Error> {
    match format {
        Format::Ppm => {
            let mut output = BufWriter::new(File::create(path)?);
            write_ppm(&mut output, pixels)?;
        }
        Format::Pnm => {
            let (width, height) = dimensions(pixels)?;
            let output = File::create(path)?;
            let mut encoder =
                PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
            encoder.encode(pixels.as_bytes(), width, height, ColorType::RGB(8))?;
        }
        Format::Png => {
            let (width, height) = dimensions(pixels)?;
            image::save_buffer(path, pixels.as_bytes(), width, height, ColorType::RGB(8))?;
        }
    }
    Ok(())
}
