// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LogRelay
//!
//! A pluggable log-collection engine. Each running instance continuously
//! ingests events from a configured input, passes them through an ordered
//! chain of processors, and delivers the results to one or more outputs,
//! while durably checkpointing progress so a restart neither loses nor
//! duplicates more than a bounded window of events. Many instances run
//! concurrently in one process under a supervising collector.
//!
//! ## Layers
//!
//! - `application` - the collector (plugin registry + instance supervisor)
//!   and the instance manager (the four-stage pipeline engine)
//! - `infrastructure` - the batch spool, cursor state stores, the config
//!   loader, and the builtin plugins (file input, json processor,
//!   stdout/file outputs)
//! - `presentation` - the operator CLI (`serve`, `validate`)
//!
//! ## Embedding
//!
//! The collector is a library first: bring your own
//! [`StateStore`](logrelay_domain::StateStore) and error handler, register
//! plugin factories by name, and drive `start`/`stop`/`status` yourself.
//! The binary in `main.rs` is one thin shell over exactly that API.

pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use application::collector::{Collector, CollectorConfig};
pub use application::manager::{Manager, ManagerConfig, PipelineTuning};
pub use infrastructure::spool::SpoolWriter;
pub use infrastructure::state::{FileStateStore, MemoryStateStore};
