// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Instance Config Loader
//!
//! Reads a directory of `*.conf` JSON documents, one instance per file; the
//! file stem becomes the instance id. Parsing problems are reported per
//! entry rather than aborting the scan, so `serve` can run the healthy
//! configs while `validate` lists every broken one.

use std::path::{Path, PathBuf};

use logrelay_domain::{CollectorError, InstanceConfig};

/// One scanned config file: its derived instance id and the parse result.
pub struct ConfigEntry {
    pub id: String,
    pub path: PathBuf,
    pub config: Result<InstanceConfig, CollectorError>,
}

/// Scans `dir` for `*.conf` files.
///
/// Fails only when the directory itself cannot be scanned; per-file
/// problems land in the entry's `config` result. Entries come back sorted
/// by path so runs are deterministic.
pub fn scan_config_dir(dir: &Path) -> Result<Vec<ConfigEntry>, CollectorError> {
    let pattern = dir.join("*.conf");
    let pattern = pattern.to_str().ok_or_else(|| {
        CollectorError::InvalidConfiguration(format!(
            "config directory path is not valid UTF-8: {}",
            dir.display()
        ))
    })?;

    let paths = glob::glob(pattern).map_err(|e| {
        CollectorError::InvalidConfiguration(format!("issue scanning config directory: {e}"))
    })?;

    let mut entries = Vec::new();
    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!("skipping unreadable config path: {err}");
                continue;
            }
        };

        let id = match path.file_stem().and_then(|stem| stem.to_str()) {
            Some(stem) => stem.to_string(),
            None => {
                tracing::warn!("skipping config with unusable name: {}", path.display());
                continue;
            }
        };

        let config = read_config(&path);
        entries.push(ConfigEntry { id, path, config });
    }

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(entries)
}

fn read_config(path: &Path) -> Result<InstanceConfig, CollectorError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CollectorError::IoError(format!("issue reading file: {e}")))?;
    serde_json::from_str(&raw).map_err(|e| {
        CollectorError::InvalidConfiguration(format!("invalid config file {}: {e}", path.display()))
    })
}
