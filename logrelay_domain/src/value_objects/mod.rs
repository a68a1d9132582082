// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Immutable value objects that flow through the pipeline.

pub mod batch;
pub mod cursor;
pub mod instance_config;
pub mod instance_id;

pub use batch::Batch;
pub use cursor::Cursor;
pub use instance_config::{InstanceConfig, PluginSpec};
pub use instance_id::InstanceId;
