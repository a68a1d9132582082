// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Error Handler Hook
//!
//! Every failure the engine or a plugin observes is reported through a single
//! host-supplied callback. The boolean flag marks criticality: critical
//! failures terminate the input (and therefore the instance), non-critical
//! ones are per-batch and leave the pipeline running.
//!
//! The handler receives only real errors. Successful commits are a separate
//! status transition, never an error-handler call with a sentinel value.

use std::sync::Arc;

use crate::error::CollectorError;

/// Host-supplied failure hook: `(critical, error)`.
///
/// Handlers must be cheap and non-blocking; they run inline on pipeline
/// stages. The engine additionally mirrors every reported error into the
/// instance status.
pub type ErrorHandler = Arc<dyn Fn(bool, CollectorError) + Send + Sync>;

/// An error handler that discards everything. Useful for tests and for
/// embedders that rely solely on `Status`.
pub fn noop_error_handler() -> ErrorHandler {
    Arc::new(|_, _| {})
}
