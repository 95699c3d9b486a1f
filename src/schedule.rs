// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scheduling policies for the fill phase.
//!
//! The cost of a row is wildly uneven: a row crossing the black heart
//! of the set pays the full iteration cap for every interior pixel,
//! while a row far outside the set escapes almost at once.  Handing
//! each thread one fixed band of rows therefore leaves most of the
//! threads idle while the one holding the heart grinds on.  The
//! `DynamicChunks` policy instead keeps a queue of small chunks of
//! rows and lets each worker pull the next chunk whenever it finishes
//! one.  `StaticPartition` and `Sequential` exist to compare against.
//!
//! Every policy hands each row's bytes to exactly one call of the
//! kernel, as a disjoint `&mut [u8]`, so no locking happens around
//! the pixels themselves; the only lock guards the queue of chunks.
//! Workers run inside a crossbeam scope, and the end of that scope
//! is the barrier after which the buffer may be read.

use log::debug;
use std::iter::Enumerate;
use std::slice::ChunksMut;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use crate::errors::RenderError;
use crate::pixels::PixelBuffer;

/// Fills in one row.  Receives the row index (0 is the top) and the
/// bytes of that row.
pub type RowKernel<'k> = dyn Fn(usize, &mut [u8]) + Sync + 'k;

type ChunkQueue<'a> = Arc<Mutex<Enumerate<ChunksMut<'a, u8>>>>;

/// A way of distributing the rows of a buffer among workers.
pub trait Schedule {
    /// Runs `kernel` exactly once for every row of `pixels`, and
    /// returns only after every call has finished.
    fn fill(&self, pixels: &mut PixelBuffer, kernel: &RowKernel) -> Result<(), RenderError>;

    /// Short human-readable description, for the logs.
    fn describe(&self) -> String;
}

impl<S: Schedule + ?Sized> Schedule for Box<S> {
    fn fill(&self, pixels: &mut PixelBuffer, kernel: &RowKernel) -> Result<(), RenderError> {
        (**self).fill(pixels, kernel)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Every row in order, on the calling thread.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sequential;

impl Schedule for Sequential {
    fn fill(&self, pixels: &mut PixelBuffer, kernel: &RowKernel) -> Result<(), RenderError> {
        let row_len = pixels.row_len();
        if row_len == 0 {
            return Ok(());
        }
        for (row, bytes) in pixels.as_bytes_mut().chunks_mut(row_len).enumerate() {
            kernel(row, bytes);
        }
        Ok(())
    }

    fn describe(&self) -> String {
        "sequential".to_string()
    }
}

/// The rows are cut into `threads` contiguous bands of equal height
/// up front, and each worker renders one band.
#[derive(Copy, Clone, Debug)]
pub struct StaticPartition {
    /// Number of workers.
    pub threads: usize,
}

impl Schedule for StaticPartition {
    fn fill(&self, pixels: &mut PixelBuffer, kernel: &RowKernel) -> Result<(), RenderError> {
        let (row_len, height) = (pixels.row_len(), pixels.height());
        if row_len == 0 || height == 0 {
            return Ok(());
        }
        let threads = self.threads.max(1);
        let rows_per_band = (height + threads - 1) / threads;
        debug!(
            "static: {} rows in bands of {} over {} workers",
            height, rows_per_band, threads
        );

        let bands: Vec<&mut [u8]> = pixels
            .as_bytes_mut()
            .chunks_mut(rows_per_band * row_len)
            .collect();
        crossbeam::scope(|spawner| {
            for (band, bytes) in bands.into_iter().enumerate() {
                spawner.spawn(move |_| {
                    let first_row = band * rows_per_band;
                    for (offset, row) in bytes.chunks_mut(row_len).enumerate() {
                        kernel(first_row + offset, row);
                    }
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)
    }

    fn describe(&self) -> String {
        format!("static partition over {} threads", self.threads.max(1))
    }
}

/// The rows are cut into chunks of `chunk_rows`, and idle workers
/// take the next chunk from a shared queue until none remain.  Small
/// chunks balance best; large ones drift back toward the behaviour of
/// `StaticPartition`.
#[derive(Copy, Clone, Debug)]
pub struct DynamicChunks {
    /// Number of workers.
    pub threads: usize,
    /// Rows per chunk.
    pub chunk_rows: usize,
}

impl Schedule for DynamicChunks {
    fn fill(&self, pixels: &mut PixelBuffer, kernel: &RowKernel) -> Result<(), RenderError> {
        let (row_len, height) = (pixels.row_len(), pixels.height());
        if row_len == 0 || height == 0 {
            return Ok(());
        }
        let chunk_rows = self.chunk_rows.max(1);
        let chunk_count = (height + chunk_rows - 1) / chunk_rows;
        let threads = self.threads.max(1).min(chunk_count);
        debug!(
            "dynamic: {} chunks of {} rows over {} workers",
            chunk_count, chunk_rows, threads
        );

        let chunks: ChunkQueue = Arc::new(Mutex::new(
            pixels
                .as_bytes_mut()
                .chunks_mut(chunk_rows * row_len)
                .enumerate(),
        ));
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                let chunks = chunks.clone();
                spawner.spawn(move |_| loop {
                    // A poisoned queue means another worker panicked; the
                    // scope reports it, so this one just stops.
                    let chunk = match chunks.lock() {
                        Ok(mut queue) => queue.next(),
                        Err(_) => None,
                    };
                    match chunk {
                        Some((index, bytes)) => {
                            let first_row = index * chunk_rows;
                            for (offset, row) in bytes.chunks_mut(row_len).enumerate() {
                                kernel(first_row + offset, row);
                            }
                        }
                        None => {
                            break;
                        }
                    }
                });
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)
    }

    fn describe(&self) -> String {
        format!(
            "dynamic chunks of {} rows over {} threads",
            self.chunk_rows.max(1),
            self.threads.max(1)
        )
    }
}

/// The scheduling policies, by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Policy {
    /// `DynamicChunks`.
    Dynamic,
    /// `StaticPartition`.
    Static,
    /// `Sequential`.
    Sequential,
}

impl Policy {
    /// The names accepted by `from_str`.
    pub const NAMES: &'static [&'static str] = &["dynamic", "static", "sequential"];

    /// Builds the policy for the given worker count and chunk size.
    /// `Static` ignores the chunk size and `Sequential` ignores both.
    pub fn build(self, threads: usize, chunk_rows: usize) -> Box<dyn Schedule + Send + Sync> {
        match self {
            Policy::Dynamic => Box::new(DynamicChunks {
                threads,
                chunk_rows,
            }),
            Policy::Static => Box::new(StaticPartition { threads }),
            Policy::Sequential => Box::new(Sequential),
        }
    }
}

impl Default for Policy {
    fn default() -> Policy {
        Policy::Dynamic
    }
}

impl FromStr for Policy {
    type Err = String;

    fn from_str(s: &str) -> Result<Policy, String> {
        match s {
            "dynamic" => Ok(Policy::Dynamic),
            "static" => Ok(Policy::Static),
            "sequential" => Ok(Policy::Sequential),
            _ => Err(format!("unknown schedule '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // Writes the row index into every byte and counts the calls.
    fn stamp(policy: &dyn Schedule, width: usize, height: usize) -> (PixelBuffer, usize) {
        let mut pixels = PixelBuffer::new(width, height);
        let calls = AtomicUsize::new(0);
        let kernel = |row: usize, bytes: &mut [u8]| {
            calls.fetch_add(1, Ordering::SeqCst);
            for b in bytes.iter_mut() {
                *b = b.wrapping_add(row as u8).wrapping_add(1);
            }
        };
        policy.fill(&mut pixels, &kernel).unwrap();
        (pixels, calls.load(Ordering::SeqCst))
    }

    fn policies() -> Vec<Box<dyn Schedule>> {
        vec![
            Box::new(Sequential),
            Box::new(StaticPartition { threads: 1 }),
            Box::new(StaticPartition { threads: 3 }),
            Box::new(StaticPartition { threads: 64 }),
            Box::new(DynamicChunks {
                threads: 4,
                chunk_rows: 1,
            }),
            Box::new(DynamicChunks {
                threads: 2,
                chunk_rows: 7,
            }),
            Box::new(DynamicChunks {
                threads: 0,
                chunk_rows: 0,
            }),
        ]
    }

    #[test]
    fn every_row_is_written_exactly_once() {
        for policy in policies() {
            let (pixels, calls) = stamp(policy.as_ref(), 5, 23);
            assert_eq!(calls, 23, "{}", policy.describe());
            for (row, bytes) in pixels.rows().enumerate() {
                assert!(
                    bytes.iter().all(|&b| b == row as u8 + 1),
                    "{} row {}",
                    policy.describe(),
                    row
                );
            }
        }
    }

    #[test]
    fn empty_buffers_are_left_alone() {
        for policy in policies() {
            let (pixels, calls) = stamp(policy.as_ref(), 0, 0);
            assert_eq!(calls, 0);
            assert!(pixels.as_bytes().is_empty());
        }
    }

    #[test]
    fn worker_panics_are_reported() {
        let mut pixels = PixelBuffer::new(2, 8);
        let kernel = |row: usize, _bytes: &mut [u8]| {
            if row == 5 {
                panic!("boom");
            }
        };
        let dynamic = DynamicChunks {
            threads: 3,
            chunk_rows: 2,
        };
        match dynamic.fill(&mut pixels, &kernel) {
            Err(RenderError::WorkerPanicked) => {}
            other => panic!("expected WorkerPanicked, got {:?}", other),
        }
        let fixed = StaticPartition { threads: 2 };
        assert!(fixed.fill(&mut pixels, &kernel).is_err());
    }

    #[test]
    fn policies_by_name() {
        for name in Policy::NAMES {
            assert!(name.parse::<Policy>().is_ok());
        }
        assert_eq!("static".parse::<Policy>(), Ok(Policy::Static));
        assert!("guided".parse::<Policy>().is_err());
        assert_eq!(Policy::default(), Policy::Dynamic);
        assert_eq!(
            Policy::Dynamic.build(4, 2).describe(),
            "dynamic chunks of 2 rows over 4 threads"
        );
    }
}
