// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cursor
//!
//! The cursor is the durable progress marker of an instance: an opaque byte
//! sequence produced by the input, carried alongside every batch, and
//! persisted through the [`StateStore`](crate::services::StateStore) once the
//! batch commits.
//!
//! The engine never interprets cursor contents. Only the input that produced
//! a cursor can give it meaning (a file-offset table, a pub/sub ack token, a
//! sequence number). Value semantics keep stages from sharing mutable views:
//! a cursor handed to the state stage is a copy owned by that stage.

use serde::{Deserialize, Serialize};

/// Opaque, input-defined progress marker.
///
/// An empty cursor is legal and simply means "no recorded progress"; inputs
/// receiving one fall back to their plugin-defined defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Vec<u8>);

impl Cursor {
    /// Creates a cursor from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The empty cursor (no recorded progress).
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Cursor {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Cursor {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Cursor {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}
