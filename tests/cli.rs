// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;

fn write_batch(dir: &Path, text: &str) -> String {
    let path = dir.join("batch.txt");
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

fn mandelbatch(dir: &Path, batch: &str, extra: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("mandelbatch").unwrap();
    cmd.arg(batch)
        .args(&["--outdir", dir.to_str().unwrap()])
        .args(extra);
    cmd
}

// Parses a P3 file into (width, height, pixels).
fn read_p3(path: &Path) -> (usize, usize, Vec<[u32; 3]>) {
    let text = fs::read_to_string(path).unwrap();
    assert!(text.ends_with('\n'));
    let mut tokens = text.split_whitespace();
    assert_eq!(tokens.next(), Some("P3"));
    let width: usize = tokens.next().unwrap().parse().unwrap();
    let height: usize = tokens.next().unwrap().parse().unwrap();
    assert_eq!(tokens.next(), Some("255"));
    let values: Vec<u32> = tokens.map(|t| t.parse().unwrap()).collect();
    assert_eq!(values.len(), width * height * 3);
    let pixels = values.chunks(3).map(|c| [c[0], c[1], c[2]]).collect();
    (width, height, pixels)
}

#[test]
fn renders_every_image_in_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(
        dir.path(),
        "2\n1 -2 0.5 -1.25 1.25 e2e\n2 -0.75 0 1 square\n",
    );
    mandelbatch(dir.path(), &batch, &["-i", "100", "-s", "10000"])
        .assert()
        .success();

    let e2e = dir.path().join("e2e.ppm");
    let text = fs::read_to_string(&e2e).unwrap();
    assert!(text.starts_with("P3\n100 100\n255\n"));
    let (width, _, pixels) = read_p3(&e2e);
    // The origin is column 80, row 50.
    assert_eq!(pixels[50 * width + 80], [255, 255, 255]);

    let (width, height, _) = read_p3(&dir.path().join("square.ppm"));
    assert_eq!((width, height), (100, 100));
}

#[test]
fn schedules_produce_identical_images() {
    let dir = tempfile::tempdir().unwrap();
    let mut outputs = vec![];
    for (i, extra) in [
        vec!["--schedule", "sequential"],
        vec!["--schedule", "static", "-t", "3"],
        vec!["--schedule", "dynamic", "-t", "2", "-c", "1"],
        vec!["--schedule", "dynamic", "-t", "4", "-c", "15"],
    ]
    .iter()
    .enumerate()
    {
        let outdir = dir.path().join(format!("run{}", i));
        fs::create_dir(&outdir).unwrap();
        let batch = write_batch(&outdir, "1\n1 -2 1 -1 1 full\n");
        let mut args = vec!["-i", "300", "-s", "20000"];
        args.extend(extra.iter());
        mandelbatch(&outdir, &batch, &args).assert().success();
        outputs.push(fs::read(outdir.join("full.ppm")).unwrap());
    }
    assert!(outputs.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn writes_binary_formats() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(dir.path(), "1\n2 -0.5 0 2 tiny\n");
    for format in &["pnm", "png"] {
        mandelbatch(dir.path(), &batch, &["-i", "50", "-s", "2500", "-f", *format])
            .assert()
            .success();
        let path = dir.path().join(format!("tiny.{}", format));
        assert!(fs::metadata(path).unwrap().len() > 0);
    }
}

#[test]
fn malformed_batches_abort_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(dir.path(), "2\n2 0 0 1 fine\n7 0 0 1 broken\n");
    mandelbatch(dir.path(), &batch, &["-s", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown region type '7'"));
    assert!(!dir.path().join("fine.ppm").exists());
}

#[test]
fn degenerate_regions_fail() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(dir.path(), "1\n1 1 1 -1 1 flat\n");
    mandelbatch(dir.path(), &batch, &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid region"));
    assert!(!dir.path().join("flat.ppm").exists());
}

#[test]
fn regions_below_f64_resolution_fail() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(dir.path(), "1\n1 0 1e-200 0 1e-200 tiny\n");
    mandelbatch(dir.path(), &batch, &["-s", "10000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid region"));
    assert!(!dir.path().join("tiny.ppm").exists());
}

#[test]
fn missing_batch_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.txt");
    mandelbatch(dir.path(), missing.to_str().unwrap(), &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read batch file"));
}

#[test]
fn rejects_bad_options() {
    let dir = tempfile::tempdir().unwrap();
    let batch = write_batch(dir.path(), "1\n2 0 0 1 x\n");
    mandelbatch(dir.path(), &batch, &["-i", "0"])
        .assert()
        .failure();
    mandelbatch(dir.path(), &batch, &["--schedule", "guided"])
        .assert()
        .failure();
    mandelbatch(dir.path(), &batch, &["-s", "18446744073709551615"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Sample count must be between"));
}
