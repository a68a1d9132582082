// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Collector Error System
//!
//! A single error enum covers every failure mode the engine can observe,
//! from registration-time problems (`AlreadyRegistered`, `UnknownPlugin`)
//! through per-batch pipeline failures (`ProcessorError`, `OutputError`,
//! `SpoolError`, `StateError`).
//!
//! ## Criticality
//!
//! Criticality is not encoded in the variant: the same `OutputError` is
//! non-critical when one batch fails to deliver and critical when an output
//! cannot authenticate at bootstrap. The reporter decides and passes the
//! flag to the `ErrorHandler` hook; the variant identifies the subsystem.
//!
//! ## Disposition summary
//!
//! | Variant | Typical source | Disposition |
//! |---|---|---|
//! | `InvalidConfiguration` | plugin factory | critical; `start` fails |
//! | `UnknownPlugin` | registry lookup | critical; `start` fails |
//! | `AlreadyRegistered` | duplicate registration | returned to caller |
//! | `DuplicateInstance` | `start` on a live id | returned to caller |
//! | `InstanceNotFound` | `stop`/`status` on unknown id | returned to caller |
//! | `InputError` | input bootstrap/runtime | critical; pipeline drains |
//! | `ProcessorError` | per-batch transform | non-critical; batch dropped |
//! | `OutputError` | per-batch delivery | non-critical; retry policy |
//! | `StateError` | cursor persistence | non-critical; cursor skipped |
//! | `SpoolError` | temp-file writer | non-critical unless bootstrap |
//!
//! Errors are `Clone` (string payloads) so they can be both handed to the
//! error handler and appended to the instance status without ceremony.

use thiserror::Error;

/// Domain-specific errors for the log-collection engine.
///
/// Each variant carries a rendered message rather than a source chain; errors
/// cross the status snapshot and error-handler boundaries by value and must
/// stay cheap to clone.
#[derive(Error, Debug, Clone)]
pub enum CollectorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Plugin already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Unknown plugin: {0}")]
    UnknownPlugin(String),

    #[error("Instance already running: {0}")]
    DuplicateInstance(String),

    #[error("Instance not found: {0}")]
    InstanceNotFound(String),

    #[error("Input error: {0}")]
    InputError(String),

    #[error("Processor error: {0}")]
    ProcessorError(String),

    #[error("Output error: {0}")]
    OutputError(String),

    #[error("State error: {0}")]
    StateError(String),

    #[error("Spool error: {0}")]
    SpoolError(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<std::io::Error> for CollectorError {
    fn from(err: std::io::Error) -> Self {
        CollectorError::IoError(err.to_string())
    }
}

impl From<serde_json::Error> for CollectorError {
    fn from(err: serde_json::Error) -> Self {
        CollectorError::SerializationError(err.to_string())
    }
}
