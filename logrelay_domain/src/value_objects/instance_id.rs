// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Instance Identifier
//!
//! A caller-chosen, non-empty string naming one running pipeline instance.
//! Ids key the collector's instance map and the state store, so the type
//! validates at construction instead of trusting every call site.

use std::fmt;

use serde::Serialize;

use crate::error::CollectorError;

/// Validated identifier for a pipeline instance.
///
/// Uniqueness across running instances is enforced by the collector, not by
/// this type; the type only guarantees the id is non-empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    /// Creates a validated instance id.
    ///
    /// Returns `ValidationError` when the id is empty or whitespace-only.
    pub fn new(id: impl Into<String>) -> Result<Self, CollectorError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CollectorError::ValidationError(
                "instance id must be a non-empty string".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InstanceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
