// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Processor Port
//!
//! A processor transforms one spool file into the next: it reads the records
//! of its input file and appends zero or more transformed records to the
//! sink the engine provides. The engine chains processors in configured
//! order, rotating a fresh spool file between each.
//!
//! Processors are synchronous: the work is line-at-a-time file
//! transformation, and keeping the trait sync keeps implementations trivial.
//! A processor must not retain the sink after `process` returns; record
//! order must be preserved (records are appended in the order they were
//! read).
//!
//! A processor error aborts the current batch only - the engine discards the
//! partial spool, drops the batch without advancing its cursor, and carries
//! on with the next one.

use std::path::Path;
use std::sync::Arc;

use crate::error::CollectorError;

/// Destination for transformed records, implemented by the engine's spool
/// writer. Appended records are newline-delimited in the rotated file.
pub trait RecordSink: Send + Sync {
    fn append(&self, record: &[u8]) -> Result<(), CollectorError>;
}

/// The processor capability.
pub trait Processor: Send + Sync {
    /// Reads records from `input` and writes transformed records to `sink`.
    fn process(&self, input: &Path, sink: &dyn RecordSink) -> Result<(), CollectorError>;
}

/// Constructs a processor from its opaque settings document.
pub trait ProcessorFactory: Send + Sync {
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Processor>, CollectorError>;
}

impl<F> ProcessorFactory for F
where
    F: Fn(&[u8]) -> Result<Arc<dyn Processor>, CollectorError> + Send + Sync,
{
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Processor>, CollectorError> {
        self(settings)
    }
}
