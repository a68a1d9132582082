// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bootstrap Module
//!
//! Sits outside the domain/application/infrastructure layers and provides
//! the process-level plumbing every deployment needs:
//!
//! - **Logging init** - tracing subscriber setup (`logger`)
//! - **Cancellation** - cloneable cancellation tokens for cooperative
//!   shutdown of inputs and retry waits (`shutdown`)
//! - **Signal handling** - SIGTERM/Ctrl+C driven graceful stop, with a
//!   forced exit on the second signal (`signals`)
//! - **Exit codes** - Unix `sysexits.h` conventions (`exit_code`)
//!
//! Enterprise layers never depend on this crate's signal or logger setup;
//! only the cancellation token crosses into the engine, as the primitive
//! behind `Input::stop` and the retry-backoff wakeup.

pub mod exit_code;
pub mod logger;
pub mod shutdown;
pub mod signals;

pub use exit_code::ExitCode;
pub use shutdown::CancellationToken;
