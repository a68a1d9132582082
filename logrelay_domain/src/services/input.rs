// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Input Port
//!
//! An input is the producing end of a pipeline instance: it watches some
//! source (files, a network receiver, a queue), spools what it reads into
//! batches, and advances its own cursor. The engine runs exactly one input
//! per instance and closes the process channel when `run` returns.
//!
//! ## Contract
//!
//! - `run` is long-running. It returns on `stop()` or on an unrecoverable
//!   bootstrap error (reported as critical through the context's handler).
//! - The input owns cursor semantics: the engine hands it the last persisted
//!   cursor (or `None` on first start) and never inspects what comes back on
//!   emitted batches. Cursors must advance monotonically through the input's
//!   own logic.
//! - Batches are emitted through the [`BatchSink`]; the sink is bounded, so a
//!   stalled pipeline blocks the input (backpressure). Inputs that cannot
//!   pause their source must buffer into their spool and flush periodically.
//! - `stop` is an idempotent cancellation request; `run` should notice it
//!   promptly, including in the middle of a timed wait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollectorError;
use crate::services::error_handler::ErrorHandler;
use crate::value_objects::{Batch, Cursor};

/// Bounded hand-off from an input into the pipeline.
///
/// Implemented by the engine over its process channel. A send error means the
/// pipeline is shutting down; inputs should treat it as a stop signal and
/// return from `run`.
#[async_trait]
pub trait BatchSink: Send + Sync {
    async fn send(&self, batch: Batch) -> Result<(), CollectorError>;
}

/// Everything an input needs while running.
pub struct InputContext {
    /// Failure hook; bootstrap failures are reported with `critical = true`.
    pub handler: ErrorHandler,

    /// Last persisted cursor, or `None` when no progress has been recorded.
    pub cursor: Option<Cursor>,

    /// Destination for produced batches.
    pub sink: Arc<dyn BatchSink>,
}

/// The input capability.
#[async_trait]
pub trait Input: Send + Sync {
    /// Produces batches until stopped or until an unrecoverable error.
    async fn run(&self, ctx: InputContext);

    /// Idempotent cancellation request.
    fn stop(&self);
}

/// Constructs an input from its opaque settings document.
pub trait InputFactory: Send + Sync {
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Input>, CollectorError>;
}

impl<F> InputFactory for F
where
    F: Fn(&[u8]) -> Result<Arc<dyn Input>, CollectorError> + Send + Sync,
{
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Input>, CollectorError> {
        self(settings)
    }
}
