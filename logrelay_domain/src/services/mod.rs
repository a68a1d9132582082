// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Ports between the engine and its collaborators: plugin capability traits,
//! their factories, the sink ports, cursor persistence, and the error hook.

pub mod error_handler;
pub mod input;
pub mod output;
pub mod processor;
pub mod state_store;

pub use error_handler::ErrorHandler;
pub use input::{BatchSink, Input, InputContext, InputFactory};
pub use output::{Output, OutputFactory};
pub use processor::{Processor, ProcessorFactory, RecordSink};
pub use state_store::StateStore;
