// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate mandelbatch;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::Error;
use log::info;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use mandelbatch::batch;
use mandelbatch::ppm::{self, Format};
use mandelbatch::{Policy, Rasterizer, RenderConfig};

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const BATCH: &str = "batch";
const ITERATIONS: &str = "iterations";
const SAMPLES: &str = "samples";
const CHUNK: &str = "chunk";
const THREADS: &str = "threads";
const SCHEDULE: &str = "schedule";
const FORMAT: &str = "format";
const OUTDIR: &str = "outdir";

// Three bytes a sample, so about 3GB of pixels.
const MAX_SAMPLES: usize = 1_000_000_000;

fn args<'a>(max_threads: usize, default_threads: &'a str) -> ArgMatches<'a> {
    App::new("mandelbatch")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Renders a batch of Mandelbrot set regions to images")
        .arg(
            Arg::with_name(BATCH)
                .required(true)
                .index(1)
                .help("Batch file listing the regions to draw"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("5000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iterations before a point is taken to be in the set"),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .required(false)
                .long(SAMPLES)
                .short("s")
                .takes_value(true)
                .default_value("1000000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        MAX_SAMPLES,
                        "Could not parse sample count",
                        &format!("Sample count must be between 1 and {}", MAX_SAMPLES),
                    )
                })
                .help("Approximate number of pixels per image"),
        )
        .arg(
            Arg::with_name(CHUNK)
                .required(false)
                .long(CHUNK)
                .short("c")
                .takes_value(true)
                .default_value("2")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        4096,
                        "Could not parse chunk size",
                        "Chunk size must be between 1 and 4096",
                    )
                })
                .help("Rows handed to a worker at a time by the dynamic schedule"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value(default_threads)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .arg(
            Arg::with_name(SCHEDULE)
                .required(false)
                .long(SCHEDULE)
                .takes_value(true)
                .default_value("dynamic")
                .possible_values(Policy::NAMES)
                .help("How rows are shared out among the threads"),
        )
        .arg(
            Arg::with_name(FORMAT)
                .required(false)
                .long(FORMAT)
                .short("f")
                .takes_value(true)
                .default_value("ppm")
                .possible_values(Format::NAMES)
                .help("Output image format"),
        )
        .arg(
            Arg::with_name(OUTDIR)
                .required(false)
                .long(OUTDIR)
                .short("d")
                .takes_value(true)
                .default_value(".")
                .help("Directory the images are written to"),
        )
        .get_matches()
}

fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    let raw = matches.value_of(name).unwrap_or_default();
    T::from_str(raw).map_err(|_| failure::err_msg(format!("Could not parse {} '{}'", name, raw)))
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = RenderConfig {
        max_iter: value(matches, ITERATIONS)?,
        target_samples: value(matches, SAMPLES)?,
        chunk_rows: value(matches, CHUNK)?,
        threads: value(matches, THREADS)?,
    };
    let policy: Policy = value(matches, SCHEDULE)?;
    let format: Format = value(matches, FORMAT)?;
    let outdir = Path::new(matches.value_of(OUTDIR).unwrap_or("."));

    let regions = batch::read_batch(matches.value_of(BATCH).unwrap_or_default())?;
    info!("{} images to render", regions.len());

    let rasterizer =
        Rasterizer::with_schedule(config, policy.build(config.threads, config.chunk_rows))?;
    for region in &regions {
        let start = Instant::now();
        let pixels = rasterizer.render(region)?;
        let path = ppm::image_path(outdir, &region.name, format);
        ppm::write_image(&path, &pixels, format)?;
        info!(
            "wrote {} ({}x{}) in {:.2} seconds",
            path.display(),
            pixels.width(),
            pixels.height(),
            start.elapsed().as_secs_f64()
        );
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let max_threads = num_cpus::get() * 4;
    let default_threads = num_cpus::get().to_string();
    let matches = args(max_threads, &default_threads);

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
