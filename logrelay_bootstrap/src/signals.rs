// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # System Signal Handling
//!
//! Graceful shutdown wiring for the collector binary:
//!
//! - first SIGTERM/SIGINT: invoke the shutdown callback (the serve loop
//!   stops every instance and lets the pipelines drain);
//! - second signal: forced exit - the operator has decided draining is
//!   taking too long.

use crate::exit_code::ExitCode;

/// Waits for SIGTERM or SIGINT (Ctrl+C).
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            tracing::error!("failed to register SIGTERM handler: {err}");
            // Fall back to Ctrl+C only
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => {
            tracing::info!("received SIGTERM, initiating graceful shutdown");
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("received SIGINT (Ctrl+C), initiating graceful shutdown");
        }
    }
}

/// Waits for Ctrl+C.
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("received Ctrl+C, initiating graceful shutdown");
}

/// Installs the two-stage shutdown handler.
///
/// Spawns a task that invokes `on_shutdown` on the first signal and exits
/// the process on the second. Send an additional signal for a forced
/// shutdown when draining hangs.
pub fn install(on_shutdown: impl FnOnce() + Send + 'static) {
    tokio::spawn(async move {
        shutdown_signal().await;
        on_shutdown();

        shutdown_signal().await;
        tracing::warn!("additional shutdown signal received, forcing exit");
        std::process::exit(ExitCode::Error.as_i32());
    });
}
