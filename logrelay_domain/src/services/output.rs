// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Output Port
//!
//! An output delivers a finished spool file to its sink (stdout, a file
//! tree, an object store, a message bus). The engine writes every batch to
//! every configured output in order and applies the retry policy when all of
//! them fail; a non-`Ok` return is what feeds that retry accounting.
//!
//! Outputs never own the spool file - they read it and return. Deletion is
//! the engine's job once the batch settles.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CollectorError;

/// The output capability.
#[async_trait]
pub trait Output: Send + Sync {
    /// Reads records from `input` and delivers them, returning the number of
    /// records successfully delivered.
    async fn write(&self, input: &Path) -> Result<u64, CollectorError>;
}

/// Constructs an output from its opaque settings document.
pub trait OutputFactory: Send + Sync {
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Output>, CollectorError>;
}

impl<F> OutputFactory for F
where
    F: Fn(&[u8]) -> Result<Arc<dyn Output>, CollectorError> + Send + Sync,
{
    fn create(&self, settings: &[u8]) -> Result<Arc<dyn Output>, CollectorError> {
        self(settings)
    }
}
