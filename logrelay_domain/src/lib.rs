// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # LogRelay Domain
//!
//! The domain layer of the logrelay log-collection engine. It defines the
//! contracts between the pipeline engine and everything pluggable around it,
//! and is completely independent of the async runtime, the filesystem layout,
//! and any concrete plugin.
//!
//! ## Module Structure
//!
//! - `entities` - Mutable objects with identity (`InstanceStatus`)
//! - `value_objects` - Immutable pipeline currency (`Batch`, `Cursor`,
//!   `InstanceId`, `InstanceConfig`)
//! - `services` - Ports consumed or implemented by the engine: the plugin
//!   capability traits (`Input`, `Processor`, `Output`) with their factories,
//!   the sink ports (`BatchSink`, `RecordSink`), cursor persistence
//!   (`StateStore`), and the `ErrorHandler` hook
//! - `error` - The `CollectorError` taxonomy shared by every layer
//!
//! ## Design Notes
//!
//! The cursor is producer-defined and opaque: the engine moves `Cursor`
//! values through the pipeline and persists them, but never interprets them.
//! Plugin instances are constructed through fallible factories registered by
//! name; the engine only ever sees the capability traits.
//!
//! Async appears only on I/O-bound ports (`Input`, `Output`, `BatchSink`,
//! `StateStore`). Processors transform one spool file into the next and stay
//! synchronous.

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

// Re-export commonly used types for convenient access
pub use entities::InstanceStatus;
pub use error::CollectorError;
pub use services::{
    BatchSink, ErrorHandler, Input, InputContext, InputFactory, Output, OutputFactory, Processor,
    ProcessorFactory, RecordSink, StateStore,
};
pub use value_objects::{Batch, Cursor, InstanceConfig, InstanceId, PluginSpec};
