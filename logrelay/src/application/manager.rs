// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Instance Manager
//!
//! Drives a single input → process → output → state pipeline to completion
//! with defined delivery, retry, and shutdown semantics. This is the heart
//! of the engine.
//!
//! ## Structure
//!
//! Four cooperating stages connected by three bounded channels:
//!
//! ```text
//! input.run ──▶ [process] ──▶ process stage ──▶ [output] ──▶ output stage ──▶ [state] ──▶ state stage
//! ```
//!
//! Every stage runs as its own task. When the input's `run` returns, its
//! sender drops and the process channel closes; closure then cascades stage
//! by stage as each upstream drains, so shutdown completes in bounded time.
//! Channel capacity is bounded (20): a stalled downstream stage blocks
//! upstream sends and ultimately pauses the input.
//!
//! ## Delivery policy
//!
//! For each batch the output stage attempts every configured output in
//! order, tracking whether any succeeded and whether any failed:
//!
//! - at least one output accepted the batch → the batch commits: spool file
//!   deleted, cursor forwarded for persistence, success tick recorded
//!   (after the per-output failures, so a partial success ends with a clear
//!   error counter);
//! - every output failed and the retry budget (3) remains → cancellable
//!   fixed backoff, then the same batch is retried with its counter
//!   advanced;
//! - every output failed with the budget spent → the batch is dropped: file
//!   deleted, cursor *not* persisted, failure recorded.
//!
//! With a single output this is at-least-once delivery. With several,
//! semantics relax to lossy-across-outputs: once any output accepts, the
//! cursor advances and the failing outputs never see the batch again.
//! Deploy one output per instance when durability across sinks matters.
//!
//! ## Cursor discipline
//!
//! The cursor persisted for an instance never moves backwards: the input
//! consumes the loaded cursor at start and advances it through its own
//! logic; the engine persists a batch's cursor only after that batch
//! commits (or via the empty-batch fast path, which exists so idle inputs
//! with ack-style cursors keep checkpointing).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::mpsc;

use logrelay_bootstrap::shutdown::CancellationToken;
use logrelay_domain::{
    Batch, BatchSink, CollectorError, Cursor, ErrorHandler, Input, InputContext, InstanceId,
    InstanceStatus, Output, Processor, StateStore,
};

use crate::infrastructure::spool::SpoolWriter;

/// Capacity of each pipeline channel.
const PIPE_CAPACITY: usize = 20;

/// Delivery re-attempts permitted per batch when every output fails.
const MAX_RETRIES: u32 = 3;

/// Fixed backoff between delivery attempts.
const RETRY_BACKOFF: Duration = Duration::from_secs(60);

/// Pipeline tuning knobs.
///
/// Production uses the defaults; tests scale the backoff down so retry
/// scenarios complete in milliseconds.
#[derive(Debug, Clone)]
pub struct PipelineTuning {
    pub channel_capacity: usize,
    pub retry_backoff: Duration,
    pub max_retries: u32,
}

impl Default for PipelineTuning {
    fn default() -> Self {
        Self {
            channel_capacity: PIPE_CAPACITY,
            retry_backoff: RETRY_BACKOFF,
            max_retries: MAX_RETRIES,
        }
    }
}

/// Everything a manager needs to drive one instance.
pub struct ManagerConfig {
    pub id: InstanceId,
    pub input: Arc<dyn Input>,
    pub processors: Vec<Arc<dyn Processor>>,
    pub outputs: Vec<Arc<dyn Output>>,
    pub state_store: Arc<dyn StateStore>,
    pub error_handler: ErrorHandler,
    pub tuning: PipelineTuning,
}

/// The per-instance pipeline engine.
pub struct Manager {
    id: InstanceId,
    status: Arc<RwLock<InstanceStatus>>,
    input: Arc<dyn Input>,
    processors: Vec<Arc<dyn Processor>>,
    outputs: Vec<Arc<dyn Output>>,
    state_store: Arc<dyn StateStore>,
    handler: ErrorHandler,
    stop_token: CancellationToken,
    tuning: PipelineTuning,
}

/// Engine-side implementation of the input's batch sink over the bounded
/// process channel. A failed send means the pipeline is gone; the spool file
/// the batch carried is removed here so a shutdown race cannot leak it.
struct ChannelBatchSink {
    tx: mpsc::Sender<Batch>,
}

#[async_trait]
impl BatchSink for ChannelBatchSink {
    async fn send(&self, batch: Batch) -> Result<(), CollectorError> {
        if let Err(mpsc::error::SendError(batch)) = self.tx.send(batch).await {
            if let Some(path) = batch.spool_path() {
                let _ = std::fs::remove_file(path);
            }
            return Err(CollectorError::Cancelled(
                "pipeline is shutting down".to_string(),
            ));
        }
        Ok(())
    }
}

impl Manager {
    pub fn new(config: ManagerConfig) -> Self {
        let status = Arc::new(RwLock::new(InstanceStatus::new()));

        // Wrap the host handler so every reported error also lands in the
        // instance status.
        let status_for_handler = Arc::clone(&status);
        let base = config.error_handler;
        let handler: ErrorHandler = Arc::new(move |critical, err: CollectorError| {
            base(critical, err.clone());
            status_for_handler.write().record_failure(err);
        });

        Self {
            id: config.id,
            status,
            input: config.input,
            processors: config.processors,
            outputs: config.outputs,
            state_store: config.state_store,
            handler,
            stop_token: CancellationToken::new(),
            tuning: config.tuning,
        }
    }

    pub fn id(&self) -> &InstanceId {
        &self.id
    }

    /// Consistent snapshot of the instance status.
    pub fn status(&self) -> InstanceStatus {
        self.status.read().clone()
    }

    /// Asks the input to stop and wakes any retry backoff. Idempotent; the
    /// rest of the pipeline drains on its own.
    pub fn stop(&self) {
        self.input.stop();
        self.stop_token.cancel();
    }

    /// Runs the pipeline to completion. Returns after all four stages exit.
    pub async fn run(self: Arc<Self>) {
        let initial_cursor = self.state_store.load(&self.id).await;
        self.status.write().set_running(true);
        tracing::info!(instance = %self.id, "instance starting");

        let (process_tx, process_rx) = mpsc::channel::<Batch>(self.tuning.channel_capacity);
        let (output_tx, output_rx) = mpsc::channel::<Batch>(self.tuning.channel_capacity);
        let (state_tx, state_rx) = mpsc::channel::<Cursor>(self.tuning.channel_capacity);

        let input_stage = {
            let manager = Arc::clone(&self);
            tokio::spawn(async move {
                let ctx = InputContext {
                    handler: manager.handler.clone(),
                    cursor: initial_cursor,
                    sink: Arc::new(ChannelBatchSink { tx: process_tx }),
                };
                manager.input.run(ctx).await;
                tracing::debug!(instance = %manager.id, "input returned, process channel closing");
            })
        };

        let process_stage = {
            let manager = Arc::clone(&self);
            let state_tx = state_tx.clone();
            tokio::spawn(async move {
                manager.process_stage(process_rx, output_tx, state_tx).await;
            })
        };

        let output_stage = {
            let manager = Arc::clone(&self);
            tokio::spawn(async move {
                manager.output_stage(output_rx, state_tx).await;
            })
        };

        let state_stage = {
            let manager = Arc::clone(&self);
            tokio::spawn(async move {
                manager.state_stage(state_rx).await;
            })
        };

        for (name, stage) in [
            ("input", input_stage),
            ("process", process_stage),
            ("output", output_stage),
            ("state", state_stage),
        ] {
            if let Err(err) = stage.await {
                tracing::error!(instance = %self.id, stage = name, "pipeline stage panicked: {err}");
            }
        }

        self.status.write().set_running(false);
        tracing::info!(instance = %self.id, "instance stopped");
    }

    /// Process stage: pipes each batch through the processor chain, rotating
    /// a fresh spool file between processors. Empty batches bypass the
    /// output stage entirely and go straight to cursor persistence.
    async fn process_stage(
        &self,
        mut rx: mpsc::Receiver<Batch>,
        output_tx: mpsc::Sender<Batch>,
        state_tx: mpsc::Sender<Cursor>,
    ) {
        while let Some(batch) = rx.recv().await {
            if batch.is_empty() {
                // Empty-batch fast path: nothing to transform or deliver,
                // but the cursor still advances.
                if let Some(path) = batch.spool_path() {
                    self.remove_spool(path);
                }
                self.record_success(0);
                if state_tx.send(batch.into_cursor()).await.is_err() {
                    break;
                }
                continue;
            }

            let Some(processed) = self.run_processors(batch) else {
                // Batch dropped; errors already reported. Keep going.
                continue;
            };

            if processed.is_empty() {
                // The chain dropped every record: same fast path.
                self.record_success(0);
                if state_tx.send(processed.into_cursor()).await.is_err() {
                    break;
                }
            } else if let Err(mpsc::error::SendError(processed)) =
                output_tx.send(processed).await
            {
                if let Some(path) = processed.spool_path() {
                    self.remove_spool(path);
                }
                break;
            }
        }
        tracing::debug!(instance = %self.id, "process stage drained");
    }

    /// Runs the configured processors over one batch. Returns the final
    /// batch, or `None` when the batch was dropped because a processor
    /// failed. Each processor reads the previous file and writes the next;
    /// input files are deleted as soon as their successor exists.
    fn run_processors(&self, batch: Batch) -> Option<Batch> {
        if self.processors.is_empty() {
            return Some(batch);
        }

        let cursor = batch.cursor().clone();
        let mut current_path: PathBuf = match batch.spool_path() {
            Some(path) => path.to_path_buf(),
            None => {
                self.report(
                    false,
                    CollectorError::InternalError(
                        "record batch arrived without a spool file".to_string(),
                    ),
                );
                return None;
            }
        };
        let mut current_count = batch.record_count();

        let spool = SpoolWriter::new();
        for processor in &self.processors {
            if let Err(err) = processor.process(&current_path, &spool) {
                self.report(false, err);
                self.remove_spool(&current_path);
                if let Err(err) = spool.exit() {
                    self.report(false, err);
                }
                return None;
            }

            // The processor's output replaces this file.
            self.remove_spool(&current_path);

            match spool.rotate() {
                Ok(Some((count, path))) => {
                    current_path = path;
                    current_count = count;
                }
                Ok(None) => {
                    // Nothing written: the batch is now a pure cursor
                    // carrier and the rest of the chain has no work.
                    return Some(Batch::empty(cursor));
                }
                Err(err) => {
                    self.report(false, err);
                    return None;
                }
            }
        }

        Some(Batch::records(current_path, current_count, cursor))
    }

    /// Output stage: applies the delivery policy batch by batch. Commits
    /// forward the cursor; drops do not.
    async fn output_stage(&self, mut rx: mpsc::Receiver<Batch>, state_tx: mpsc::Sender<Cursor>) {
        while let Some(batch) = rx.recv().await {
            if let Some((cursor, count)) = self.deliver(batch).await {
                self.record_success(count);
                if state_tx.send(cursor).await.is_err() {
                    break;
                }
            }
        }
        tracing::debug!(instance = %self.id, "output stage drained");
    }

    /// Attempts delivery of one batch, retrying per policy. Returns the
    /// cursor and record count on commit, `None` when the batch is dropped.
    /// The spool file is deleted on every exit path.
    async fn deliver(&self, mut batch: Batch) -> Option<(Cursor, u64)> {
        let path: PathBuf = match batch.spool_path() {
            Some(path) => path.to_path_buf(),
            None => {
                self.report(
                    false,
                    CollectorError::InternalError(
                        "record batch reached output stage without a spool file".to_string(),
                    ),
                );
                return None;
            }
        };

        loop {
            let mut had_error = false;
            let mut any_written = false;

            for output in &self.outputs {
                match output.write(&path).await {
                    Ok(_) => any_written = true,
                    Err(err) => {
                        had_error = true;
                        self.report(false, err);
                    }
                }
            }

            if had_error && !any_written {
                if batch.retry_count() < self.tuning.max_retries {
                    tokio::select! {
                        _ = self.stop_token.cancelled() => {
                            // Stop during backoff: the batch is dropped and
                            // its cursor is never persisted.
                            tracing::debug!(instance = %self.id, "retry backoff cancelled by stop");
                            self.remove_spool(&path);
                            return None;
                        }
                        _ = tokio::time::sleep(self.tuning.retry_backoff) => {
                            batch = batch.with_retry();
                            tracing::debug!(
                                instance = %self.id,
                                retry = batch.retry_count(),
                                "retrying batch delivery"
                            );
                            continue;
                        }
                    }
                }

                self.report(
                    false,
                    CollectorError::OutputError(format!(
                        "dropping batch after {} failed delivery attempts",
                        self.tuning.max_retries + 1
                    )),
                );
                self.remove_spool(&path);
                return None;
            }

            // All outputs succeeded, or at least one did while others
            // failed (lossy across outputs; the per-output failures were
            // reported above).
            self.remove_spool(&path);
            let count = batch.record_count();
            tracing::debug!(instance = %self.id, records = count, "batch committed");
            return Some((batch.into_cursor(), count));
        }
    }

    /// State stage: persists each committed cursor. A failed save is
    /// reported and the cursor skipped; the next restart resumes from the
    /// previous persisted cursor.
    async fn state_stage(&self, mut rx: mpsc::Receiver<Cursor>) {
        while let Some(cursor) = rx.recv().await {
            if let Err(err) = self.state_store.save(&self.id, &cursor).await {
                self.report(false, err);
            }
        }
        tracing::debug!(instance = %self.id, "state stage drained");
    }

    fn record_success(&self, count: u64) {
        self.status.write().record_success(count);
    }

    fn report(&self, critical: bool, err: CollectorError) {
        (self.handler)(critical, err);
    }

    fn remove_spool(&self, path: &Path) {
        if let Err(err) = std::fs::remove_file(path) {
            self.report(
                false,
                CollectorError::SpoolError(format!(
                    "issue removing spool file {}: {err}",
                    path.display()
                )),
            );
        }
    }
}
