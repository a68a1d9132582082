// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File State Store
//!
//! Cursor blobs in flat files: `<dir>/<id>.state`. This is the store the
//! CLI wires up - one small file per instance next to (or near) its config,
//! written whole on every committed batch.

use std::path::PathBuf;

use async_trait::async_trait;

use logrelay_domain::{CollectorError, Cursor, InstanceId, StateStore};

/// Flat-file cursor store.
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn state_path(&self, id: &InstanceId) -> PathBuf {
        self.dir.join(format!("{id}.state"))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn save(&self, id: &InstanceId, cursor: &Cursor) -> Result<(), CollectorError> {
        let path = self.state_path(id);
        tokio::fs::write(&path, cursor.as_bytes())
            .await
            .map_err(|e| {
                CollectorError::StateError(format!(
                    "issue writing state file {}: {e}",
                    path.display()
                ))
            })
    }

    async fn load(&self, id: &InstanceId) -> Option<Cursor> {
        let path = self.state_path(id);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Some(Cursor::new(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(
                    instance = %id,
                    "issue reading state file {}: {err}",
                    path.display()
                );
                None
            }
        }
    }
}
