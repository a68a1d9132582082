// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Batch
//!
//! The unit of work flowing through an instance pipeline: a spool file of
//! newline-delimited records plus the cursor snapshot to persist once the
//! batch commits.
//!
//! ## Ownership
//!
//! A batch *owns* its spool file. Handing a batch to the next stage (via a
//! channel send) transfers that ownership; the receiving stage is the one
//! that eventually deletes the file, either on commit or on drop. Because
//! `Batch` is not `Copy` and the engine moves it between stages, the type
//! system enforces the single-owner rule the design calls for.
//!
//! ## Empty batches
//!
//! A batch with `record_count == 0` is a pure cursor carrier: inputs with
//! ack-style progress emit them during idle periods so the persisted cursor
//! keeps advancing. Empty batches may omit the spool file entirely.

use std::path::{Path, PathBuf};

use crate::value_objects::cursor::Cursor;

/// A spool file plus cursor snapshot travelling the pipeline.
#[derive(Debug, Clone)]
pub struct Batch {
    spool_path: Option<PathBuf>,
    record_count: u64,
    cursor: Cursor,
    retry_count: u32,
}

impl Batch {
    /// Creates a batch backed by a spool file with `record_count` records.
    pub fn records(spool_path: impl Into<PathBuf>, record_count: u64, cursor: Cursor) -> Self {
        Self {
            spool_path: Some(spool_path.into()),
            record_count,
            cursor,
            retry_count: 0,
        }
    }

    /// Creates a record-less batch that only carries a cursor.
    pub fn empty(cursor: Cursor) -> Self {
        Self {
            spool_path: None,
            record_count: 0,
            cursor,
            retry_count: 0,
        }
    }

    /// True when the batch carries no records and takes the fast path that
    /// skips the output stage.
    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }

    pub fn spool_path(&self) -> Option<&Path> {
        self.spool_path.as_deref()
    }

    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Consumes the batch, yielding the cursor to persist.
    pub fn into_cursor(self) -> Cursor {
        self.cursor
    }

    /// Number of delivery re-attempts already spent on this batch.
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Returns the batch with its retry counter advanced by one.
    pub fn with_retry(mut self) -> Self {
        self.retry_count += 1;
        self
    }
}
