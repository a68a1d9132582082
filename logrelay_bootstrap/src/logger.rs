// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logging Initialization
//!
//! One-shot tracing subscriber setup for the collector binary. `RUST_LOG`
//! wins when set; otherwise the verbose flag picks between `info` and
//! `debug` defaults.
//!
//! Library code (engine, plugins) only ever uses the `tracing` macros and
//! never initializes a subscriber; embedders bring their own.

use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Safe to call once per process; later calls are ignored (relevant for test
/// binaries that share a process).
pub fn init(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
