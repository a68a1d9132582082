// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Stdout Output
//!
//! Streams a spool file line-by-line to standard output. Takes no settings;
//! useful for piping into another tool and as the smallest possible sink
//! when bringing up a new instance.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use logrelay_domain::{CollectorError, Output, OutputFactory};

pub const OUTPUT_NAME: &str = "stdout";

struct StdoutOutput;

/// Builds the `stdout` output factory.
pub fn factory() -> Arc<dyn OutputFactory> {
    Arc::new(|_settings: &[u8]| -> Result<Arc<dyn Output>, CollectorError> {
        Ok(Arc::new(StdoutOutput))
    })
}

#[async_trait]
impl Output for StdoutOutput {
    async fn write(&self, input: &Path) -> Result<u64, CollectorError> {
        let file = tokio::fs::File::open(input)
            .await
            .map_err(|e| CollectorError::OutputError(format!("issue opening file: {e}")))?;

        let mut lines = BufReader::new(file).lines();
        let mut stdout = tokio::io::stdout();
        let mut count = 0u64;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| CollectorError::OutputError(format!("issue reading file: {e}")))?
        {
            stdout
                .write_all(line.as_bytes())
                .await
                .map_err(|e| CollectorError::OutputError(format!("issue writing stdout: {e}")))?;
            stdout
                .write_all(b"\n")
                .await
                .map_err(|e| CollectorError::OutputError(format!("issue writing stdout: {e}")))?;
            count += 1;
        }

        stdout
            .flush()
            .await
            .map_err(|e| CollectorError::OutputError(format!("issue flushing stdout: {e}")))?;

        Ok(count)
    }
}
