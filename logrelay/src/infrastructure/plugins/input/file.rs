// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Input
//!
//! Tails a glob of files on a fixed schedule. Every tick it resumes each
//! matched file from the offset recorded in its cursor, spools the complete
//! new lines, and emits one batch carrying the updated offset table as the
//! cursor. A tick with no new data emits nothing.
//!
//! ## Settings
//!
//! ```json
//! { "path": "/var/log/app/*.log", "schedule": 15, "delete": false }
//! ```
//!
//! - `path` - glob of files to tail (required)
//! - `schedule` - seconds between ticks (default 15)
//! - `delete` - remove a file once fully consumed (default false)
//!
//! ## Cursor
//!
//! A JSON offset table, owned entirely by this input:
//!
//! ```json
//! { "trackers": [ { "file_path": "/var/log/app/a.log", "file_position": 4096 } ] }
//! ```
//!
//! A file that shrinks below its recorded offset is assumed rotated and is
//! re-read from the start. A trailing line with no newline yet is left for
//! a later tick, so records are never split mid-write.

use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use logrelay_bootstrap::shutdown::CancellationToken;
use logrelay_domain::{
    Batch, CollectorError, Cursor, Input, InputContext, InputFactory,
};

use crate::infrastructure::spool::SpoolWriter;

pub const INPUT_NAME: &str = "file";

fn default_schedule() -> u64 {
    15
}

#[derive(Debug, Clone, Deserialize)]
struct FileInputSettings {
    path: String,

    #[serde(default = "default_schedule")]
    schedule: u64,

    #[serde(default)]
    delete: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct FileCursor {
    trackers: Vec<FileTracker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileTracker {
    file_path: String,
    file_position: u64,
}

impl FileCursor {
    fn parse(cursor: Option<&Cursor>) -> Self {
        cursor
            .and_then(|c| serde_json::from_slice(c.as_bytes()).ok())
            .unwrap_or_default()
    }

    fn position(&self, path: &str) -> u64 {
        self.trackers
            .iter()
            .find(|t| t.file_path == path)
            .map(|t| t.file_position)
            .unwrap_or(0)
    }

    fn set(&mut self, path: &str, position: u64) {
        match self.trackers.iter_mut().find(|t| t.file_path == path) {
            Some(tracker) => tracker.file_position = position,
            None => self.trackers.push(FileTracker {
                file_path: path.to_string(),
                file_position: position,
            }),
        }
    }

    fn remove(&mut self, path: &str) {
        self.trackers.retain(|t| t.file_path != path);
    }
}

struct FileInput {
    settings: FileInputSettings,
    token: CancellationToken,
}

/// Builds the `file` input factory.
pub fn factory() -> Arc<dyn InputFactory> {
    Arc::new(
        |settings: &[u8]| -> Result<Arc<dyn Input>, CollectorError> {
            let settings: FileInputSettings = serde_json::from_slice(settings).map_err(|e| {
                CollectorError::InvalidConfiguration(format!(
                    "issue parsing file input settings: {e}"
                ))
            })?;

            if settings.path.trim().is_empty() {
                return Err(CollectorError::InvalidConfiguration(
                    "file input requires a path glob".to_string(),
                ));
            }
            if settings.schedule == 0 {
                return Err(CollectorError::InvalidConfiguration(
                    "file input schedule must be at least 1 second".to_string(),
                ));
            }
            glob::Pattern::new(&settings.path).map_err(|e| {
                CollectorError::InvalidConfiguration(format!("invalid path glob: {e}"))
            })?;

            Ok(Arc::new(FileInput {
                settings,
                token: CancellationToken::new(),
            }))
        },
    )
}

#[async_trait]
impl Input for FileInput {
    async fn run(&self, ctx: InputContext) {
        let mut state = FileCursor::parse(ctx.cursor.as_ref());
        let interval = Duration::from_secs(self.settings.schedule);

        loop {
            tokio::select! {
                _ = self.token.cancelled() => return,
                _ = tokio::time::sleep(interval) => {}
            }

            let spool = SpoolWriter::new();
            let mut new_state = state.clone();

            for path in self.matching_files(&ctx) {
                let key = path.to_string_lossy().to_string();
                tracing::debug!(file = %key, "tailing file");

                let position = state.position(&key);
                match copy_from_position(&path, position, &spool) {
                    Ok(tail) => {
                        if self.settings.delete && tail.file_len > 0 && tail.consumed_all {
                            match std::fs::remove_file(&path) {
                                Ok(()) => new_state.remove(&key),
                                Err(err) => {
                                    (ctx.handler)(
                                        false,
                                        CollectorError::InputError(format!(
                                            "issue removing consumed file {key}: {err}"
                                        )),
                                    );
                                    new_state.set(&key, tail.offset);
                                }
                            }
                        } else {
                            new_state.set(&key, tail.offset);
                        }
                    }
                    Err(err) => (ctx.handler)(false, err),
                }
            }

            let rotated = match spool.rotate() {
                Ok(rotated) => rotated,
                Err(err) => {
                    (ctx.handler)(false, err);
                    continue;
                }
            };

            // No new data this tick
            let Some((count, spool_path)) = rotated else {
                continue;
            };

            let cursor_bytes = match serde_json::to_vec(&new_state) {
                Ok(bytes) => bytes,
                Err(err) => {
                    (ctx.handler)(
                        false,
                        CollectorError::SerializationError(format!(
                            "issue marshalling file input state: {err}"
                        )),
                    );
                    let _ = std::fs::remove_file(&spool_path);
                    continue;
                }
            };

            let batch = Batch::records(spool_path, count, Cursor::new(cursor_bytes));
            if ctx.sink.send(batch).await.is_err() {
                // Pipeline is shutting down
                return;
            }

            state = new_state;
        }
    }

    fn stop(&self) {
        self.token.cancel();
    }
}

impl FileInput {
    fn matching_files(&self, ctx: &InputContext) -> Vec<PathBuf> {
        let paths = match glob::glob(&self.settings.path) {
            Ok(paths) => paths,
            Err(err) => {
                (ctx.handler)(
                    false,
                    CollectorError::InputError(format!("issue expanding glob: {err}")),
                );
                return Vec::new();
            }
        };

        let mut files: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        files
    }
}

struct TailResult {
    offset: u64,
    consumed_all: bool,
    file_len: u64,
}

/// Copies complete lines from `position` onward into the spool, returning
/// the new offset. Only lines already terminated by a newline are consumed.
fn copy_from_position(
    path: &Path,
    position: u64,
    spool: &SpoolWriter,
) -> Result<TailResult, CollectorError> {
    let file = std::fs::File::open(path)
        .map_err(|e| CollectorError::InputError(format!("issue opening file: {e}")))?;
    let file_len = file
        .metadata()
        .map_err(|e| CollectorError::InputError(format!("issue stating file: {e}")))?
        .len();

    if file_len == 0 {
        return Ok(TailResult {
            offset: 0,
            consumed_all: true,
            file_len,
        });
    }

    // A file smaller than its recorded offset was rotated or truncated
    let start = if file_len < position { 0 } else { position };

    let mut reader = BufReader::new(file);
    reader
        .seek(SeekFrom::Start(start))
        .map_err(|e| CollectorError::InputError(format!("issue seeking in file: {e}")))?;

    let mut offset = start;
    loop {
        let mut line = Vec::new();
        let read = reader
            .read_until(b'\n', &mut line)
            .map_err(|e| CollectorError::InputError(format!("issue reading file: {e}")))?;
        if read == 0 {
            break;
        }
        if line.last() != Some(&b'\n') {
            // Incomplete trailing line; pick it up on a later tick
            break;
        }
        spool.write(&line)?;
        offset += read as u64;
    }

    Ok(TailResult {
        offset,
        consumed_all: offset >= file_len,
        file_len,
    })
}
