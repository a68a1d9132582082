// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Instance Configuration
//!
//! The declarative shape of one pipeline instance: a single input, an ordered
//! processor chain, and one or more outputs. Each plugin is addressed by
//! registry name and carries an opaque settings document that only the
//! plugin's factory interprets.
//!
//! Configs are immutable once an instance starts. On disk they are JSON:
//!
//! ```json
//! {
//!   "input": { "name": "file", "settings": { "path": "/var/log/*.log", "schedule": 15 } },
//!   "processors": [ { "name": "json", "settings": { "remove": [{ "key": "password" }] } } ],
//!   "outputs": [ { "name": "stdout" } ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::CollectorError;

/// A named plugin plus its opaque settings.
///
/// Settings are stored as raw JSON and handed to the plugin factory as bytes;
/// the engine never looks inside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSpec {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl PluginSpec {
    /// Creates a spec with no settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
        }
    }

    /// Creates a spec with a JSON settings document.
    pub fn with_settings(name: impl Into<String>, settings: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            settings: Some(settings),
        }
    }

    /// The settings document rendered to the opaque byte form factories
    /// receive. Missing settings yield an empty slice.
    pub fn settings_bytes(&self) -> Vec<u8> {
        match &self.settings {
            // serde_json::Value serialization cannot fail
            Some(value) => serde_json::to_vec(value).unwrap_or_default(),
            None => Vec::new(),
        }
    }
}

/// Configuration for one pipeline instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub input: PluginSpec,

    #[serde(default)]
    pub processors: Vec<PluginSpec>,

    pub outputs: Vec<PluginSpec>,
}

impl InstanceConfig {
    /// Validates the config shape before any plugin is constructed.
    ///
    /// Plugin names must be non-empty and at least one output must be
    /// configured: with zero outputs every batch would commit vacuously and
    /// records would be discarded without anyone noticing.
    pub fn validate(&self) -> Result<(), CollectorError> {
        if self.input.name.trim().is_empty() {
            return Err(CollectorError::ValidationError(
                "input plugin name must not be empty".to_string(),
            ));
        }

        for spec in &self.processors {
            if spec.name.trim().is_empty() {
                return Err(CollectorError::ValidationError(
                    "processor plugin name must not be empty".to_string(),
                ));
            }
        }

        if self.outputs.is_empty() {
            return Err(CollectorError::ValidationError(
                "at least one output must be configured".to_string(),
            ));
        }

        for spec in &self.outputs {
            if spec.name.trim().is_empty() {
                return Err(CollectorError::ValidationError(
                    "output plugin name must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}
