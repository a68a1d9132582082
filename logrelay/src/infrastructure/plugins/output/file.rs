// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Output
//!
//! Appends delivered records to a file tree. The configured path is a
//! template (see [`path_template`](super::path_template)) rendered at
//! delivery time, and each destination file rotates by size: when a write
//! would push it past `max_size`, the full file is renamed to
//! `<path>.<unix>.<uuid>` and a fresh one is opened.
//!
//! ## Settings
//!
//! ```json
//! { "path": "/data/logs/%year%/%month%/%day%/events.log", "max_size": 10485760 }
//! ```
//!
//! `path` is required; `max_size` is bytes, at least 1 MiB (the default).

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use logrelay_domain::{CollectorError, Output, OutputFactory};

use super::path_template;

pub const OUTPUT_NAME: &str = "file";

const MIN_MAX_SIZE: u64 = 1024 * 1024;

fn default_max_size() -> u64 {
    MIN_MAX_SIZE
}

#[derive(Debug, Clone, Deserialize)]
struct FileOutputSettings {
    path: String,

    #[serde(default = "default_max_size")]
    max_size: u64,
}

struct FileOutput {
    settings: FileOutputSettings,
}

/// Builds the `file` output factory.
pub fn factory() -> Arc<dyn OutputFactory> {
    Arc::new(|settings: &[u8]| -> Result<Arc<dyn Output>, CollectorError> {
        let settings: FileOutputSettings = serde_json::from_slice(settings).map_err(|e| {
            CollectorError::InvalidConfiguration(format!(
                "issue parsing file output settings: {e}"
            ))
        })?;

        if settings.path.trim().is_empty() {
            return Err(CollectorError::InvalidConfiguration(
                "file output requires a path".to_string(),
            ));
        }
        if settings.max_size < MIN_MAX_SIZE {
            return Err(CollectorError::InvalidConfiguration(format!(
                "file output max_size must be at least {MIN_MAX_SIZE} bytes"
            )));
        }

        Ok(Arc::new(FileOutput { settings }))
    })
}

#[async_trait]
impl Output for FileOutput {
    async fn write(&self, input: &Path) -> Result<u64, CollectorError> {
        let destination = PathBuf::from(path_template::render(
            &self.settings.path,
            chrono::Local::now(),
        ));

        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CollectorError::OutputError(format!(
                    "issue creating parent directories for {}: {e}",
                    destination.display()
                ))
            })?;
        }

        let source = File::open(input)
            .map_err(|e| CollectorError::OutputError(format!("issue opening file: {e}")))?;
        let mut writer = RotatingFileWriter::open(destination, self.settings.max_size)?;

        let mut count = 0u64;
        for line in BufReader::new(source).lines() {
            let line =
                line.map_err(|e| CollectorError::OutputError(format!("issue reading file: {e}")))?;
            writer.write_line(line.as_bytes())?;
            count += 1;
        }
        writer.flush()?;

        Ok(count)
    }
}

/// Append-only writer that rotates its file by size. Full files are renamed
/// to `<path>.<unix>.<uuid>` and writing continues at the original path.
struct RotatingFileWriter {
    path: PathBuf,
    max_size: u64,
    file: BufWriter<File>,
    size: u64,
}

impl RotatingFileWriter {
    fn open(path: PathBuf, max_size: u64) -> Result<Self, CollectorError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                CollectorError::OutputError(format!("issue opening {}: {e}", path.display()))
            })?;
        let size = file
            .metadata()
            .map_err(|e| {
                CollectorError::OutputError(format!("issue stating {}: {e}", path.display()))
            })?
            .len();

        Ok(Self {
            path,
            max_size,
            file: BufWriter::new(file),
            size,
        })
    }

    fn write_line(&mut self, line: &[u8]) -> Result<(), CollectorError> {
        let needed = line.len() as u64 + 1;
        if self.size > 0 && self.size + needed > self.max_size {
            self.rotate()?;
        }

        self.file
            .write_all(line)
            .and_then(|_| self.file.write_all(b"\n"))
            .map_err(|e| {
                CollectorError::OutputError(format!(
                    "issue writing to {}: {e}",
                    self.path.display()
                ))
            })?;
        self.size += needed;
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), CollectorError> {
        self.flush()?;

        let rotated = format!(
            "{}.{}.{}",
            self.path.display(),
            chrono::Utc::now().timestamp(),
            uuid::Uuid::new_v4()
        );
        std::fs::rename(&self.path, &rotated).map_err(|e| {
            CollectorError::OutputError(format!(
                "issue rotating {} to {rotated}: {e}",
                self.path.display()
            ))
        })?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                CollectorError::OutputError(format!(
                    "issue reopening {}: {e}",
                    self.path.display()
                ))
            })?;
        self.file = BufWriter::new(file);
        self.size = 0;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), CollectorError> {
        self.file.flush().map_err(|e| {
            CollectorError::OutputError(format!("issue flushing {}: {e}", self.path.display()))
        })
    }
}
