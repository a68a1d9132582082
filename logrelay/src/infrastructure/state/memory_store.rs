// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Memory State Store
//!
//! A process-local cursor store. Progress evaporates with the process, so
//! this is for tests and for embedders that handle durability themselves.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use logrelay_domain::{CollectorError, Cursor, InstanceId, StateStore};

/// In-memory cursor store.
#[derive(Default)]
pub struct MemoryStateStore {
    cursors: RwLock<HashMap<String, Cursor>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn save(&self, id: &InstanceId, cursor: &Cursor) -> Result<(), CollectorError> {
        self.cursors
            .write()
            .insert(id.to_string(), cursor.clone());
        Ok(())
    }

    async fn load(&self, id: &InstanceId) -> Option<Cursor> {
        self.cursors.read().get(id.as_str()).cloned()
    }
}
