// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cancellation
//!
//! A lightweight, cloneable cancellation token for cooperative shutdown.
//! Inputs carry one to make `stop()` interrupt their poll loops, and the
//! pipeline engine carries one per instance so a retry backoff wakes the
//! moment the instance is asked to stop.
//!
//! ## Usage
//!
//! ```rust
//! use logrelay_bootstrap::shutdown::CancellationToken;
//! use std::time::Duration;
//!
//! # async fn example() {
//! let token = CancellationToken::new();
//! let worker_token = token.clone();
//!
//! tokio::spawn(async move {
//!     tokio::select! {
//!         _ = worker_token.cancelled() => {
//!             // asked to stop; drop the wait and clean up
//!         }
//!         _ = tokio::time::sleep(Duration::from_secs(60)) => {
//!             // timed wait elapsed normally
//!         }
//!     }
//! });
//!
//! token.cancel();
//! # }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Cloneable cancellation token.
///
/// Cancellation is sticky: once cancelled, every clone observes it and
/// `cancelled()` returns immediately, so a token can be checked long after
/// the cancelling side has gone away.
#[derive(Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(Notify::new()),
        }
    }

    /// Cancels this token and wakes all waiters. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    /// Non-blocking check.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves when the token is cancelled; immediately if it already was.
    pub async fn cancelled(&self) {
        // Re-check after each wakeup: notify_waiters does not store a permit,
        // so a waiter registered after cancel() relies on the flag.
        while !self.is_cancelled() {
            let notified = self.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
