// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Builtin Plugins
//!
//! The plugins every collector ships with: a scheduled file-tail input, a
//! JSON line processor, and stdout/file outputs. External systems (message
//! buses, object stores) are expected to register their own factories
//! through the collector API.

pub mod input;
pub mod output;
pub mod processor;

use logrelay_domain::CollectorError;

use crate::application::collector::Collector;

/// Registers the builtin plugin factories.
pub fn register_builtins(collector: &Collector) -> Result<(), CollectorError> {
    collector.register_input(input::file::INPUT_NAME, input::file::factory())?;
    collector.register_processor(processor::json::PROCESSOR_NAME, processor::json::factory())?;
    collector.register_output(output::stdout::OUTPUT_NAME, output::stdout::factory())?;
    collector.register_output(output::file::OUTPUT_NAME, output::file::factory())?;
    Ok(())
}
