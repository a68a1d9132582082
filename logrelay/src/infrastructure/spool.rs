// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Batch Spool
//!
//! An append-only record writer backed by a temporary file, with atomic
//! rotation. The spool is the inter-stage carrier of the pipeline: inputs
//! buffer what they read into a spool and rotate it into a batch; the
//! process stage hands each processor the previous file and a fresh spool
//! for its results.
//!
//! ## File lifecycle
//!
//! The backing file is created lazily on the first `write` after
//! construction or rotation, so an idle writer costs nothing and an empty
//! rotation creates no file. `rotate` closes the current file and transfers
//! ownership of its path to the caller - from that point the caller deletes
//! it. Anything not handed off is removed by `exit` (or on drop, as a last
//! resort).
//!
//! ## Records
//!
//! Records are newline-delimited. `write` appends a terminating newline only
//! when the payload does not already end with one; an empty payload is a
//! no-op. The writer is safe for concurrent `write` + `rotate` (a single
//! mutex serializes them).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use parking_lot::Mutex;

use logrelay_domain::{CollectorError, RecordSink};

/// Rotating temporary-file record writer.
pub struct SpoolWriter {
    inner: Mutex<SpoolInner>,
}

struct SpoolInner {
    file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    size: u64,
    write_count: u64,
}

impl SpoolWriter {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SpoolInner {
                file: None,
                path: None,
                size: 0,
                write_count: 0,
            }),
        }
    }

    /// Appends one record, adding a terminating newline when missing.
    /// Empty payloads are ignored.
    pub fn write(&self, record: &[u8]) -> Result<(), CollectorError> {
        if record.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.lock();
        if inner.file.is_none() {
            inner.open_new()?;
        }

        // open_new just guaranteed the file
        let needs_newline = record.last() != Some(&b'\n');
        let file = inner.file.as_mut().ok_or_else(|| {
            CollectorError::SpoolError("spool file missing after open".to_string())
        })?;

        file.write_all(record)
            .map_err(|e| CollectorError::SpoolError(format!("issue writing record: {e}")))?;
        let mut written = record.len() as u64;
        if needs_newline {
            file.write_all(b"\n")
                .map_err(|e| CollectorError::SpoolError(format!("issue writing record: {e}")))?;
            written += 1;
        }

        inner.size += written;
        inner.write_count += 1;
        Ok(())
    }

    /// Closes the current file and hands its `(record_count, path)` to the
    /// caller, which becomes responsible for deleting it. Returns `None`
    /// when nothing was written since the last rotation; no file is created
    /// in that case, and two successive empty rotations are both `None`.
    pub fn rotate(&self) -> Result<Option<(u64, PathBuf)>, CollectorError> {
        let mut inner = self.inner.lock();
        if inner.file.is_none() {
            return Ok(None);
        }

        inner.close_current()?;

        let count = inner.write_count;
        let path = inner.path.take().ok_or_else(|| {
            CollectorError::SpoolError("rotated spool file has no path".to_string())
        })?;
        inner.size = 0;
        inner.write_count = 0;
        Ok(Some((count, path)))
    }

    /// Flushes and closes the current file, leaving it on disk.
    pub fn close(&self) -> Result<(), CollectorError> {
        self.inner.lock().close_current()
    }

    /// Closes and deletes any file that was never handed off via `rotate`.
    pub fn exit(&self) -> Result<(), CollectorError> {
        let mut inner = self.inner.lock();
        inner.close_current()?;
        if let Some(path) = inner.path.take() {
            std::fs::remove_file(&path).map_err(|e| {
                CollectorError::SpoolError(format!(
                    "issue removing spool file {}: {e}",
                    path.display()
                ))
            })?;
        }
        inner.size = 0;
        inner.write_count = 0;
        Ok(())
    }

    /// Path of the current backing file: present from the first write until
    /// the file is handed off by `rotate` or removed by `exit`.
    pub fn name(&self) -> Option<PathBuf> {
        self.inner.lock().path.clone()
    }

    /// Bytes written to the active file since the last rotation.
    pub fn size(&self) -> u64 {
        self.inner.lock().size
    }

    /// Records written to the active file since the last rotation.
    pub fn write_count(&self) -> u64 {
        self.inner.lock().write_count
    }
}

impl SpoolInner {
    fn open_new(&mut self) -> Result<(), CollectorError> {
        let tmp = tempfile::Builder::new()
            .prefix("logrelay-spool-")
            .tempfile()
            .map_err(|e| CollectorError::SpoolError(format!("can't open new spool file: {e}")))?;

        let (file, temp_path) = tmp.into_parts();
        // Ownership is manual from here on: the pipeline deletes spool files
        // when batches settle, not the tempfile guard.
        let path = temp_path
            .keep()
            .map_err(|e| CollectorError::SpoolError(format!("can't persist spool file: {e}")))?;

        self.file = Some(BufWriter::new(file));
        self.path = Some(path);
        self.size = 0;
        self.write_count = 0;
        Ok(())
    }

    fn close_current(&mut self) -> Result<(), CollectorError> {
        if let Some(writer) = self.file.take() {
            let file = writer
                .into_inner()
                .map_err(|e| CollectorError::SpoolError(format!("issue flushing spool: {e}")))?;
            file.sync_all()
                .map_err(|e| CollectorError::SpoolError(format!("issue syncing spool: {e}")))?;
        }
        Ok(())
    }
}

impl Default for SpoolWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordSink for SpoolWriter {
    fn append(&self, record: &[u8]) -> Result<(), CollectorError> {
        self.write(record)
    }
}

impl Drop for SpoolWriter {
    fn drop(&mut self) {
        let mut inner = self.inner.lock();
        inner.file = None;
        if let Some(path) = inner.path.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}
