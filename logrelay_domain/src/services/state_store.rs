// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # State Store Port
//!
//! Cursor persistence, keyed by instance id. The engine reads once at
//! startup (supervisor) and writes from the state stage as batches commit;
//! the store needs no locking beyond what its own backend requires.
//!
//! A missing cursor is not an error - `load` returns `None` and the input
//! falls back to its defaults. A failed `save` is reported non-critically
//! and the cursor for that batch is simply skipped; the next restart resumes
//! from the previous persisted cursor, trading a bounded window of duplicate
//! delivery for liveness.

use async_trait::async_trait;

use crate::error::CollectorError;
use crate::value_objects::{Cursor, InstanceId};

/// Cursor persistence capability.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Persists the cursor for `id`, replacing any previous value.
    async fn save(&self, id: &InstanceId, cursor: &Cursor) -> Result<(), CollectorError>;

    /// Loads the last persisted cursor for `id`, or `None` when there is no
    /// usable recorded progress.
    async fn load(&self, id: &InstanceId) -> Option<Cursor>;
}
