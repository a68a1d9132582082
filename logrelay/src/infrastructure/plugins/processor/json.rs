// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # JSON Processor
//!
//! Rewrites JSON log lines with declarative actions. Lines that are blank
//! or not valid JSON are dropped; everything else is transformed and
//! re-emitted in input order.
//!
//! ## Settings
//!
//! ```json
//! {
//!   "add":     [ { "key": "env", "value": "prod" } ],
//!   "remove":  [ { "key": "user.password" } ],
//!   "replace": [ { "key": "level", "value": "WARNING", "new_value": "WARN" } ]
//! }
//! ```
//!
//! Keys are dotted paths over nested objects. `add` sets a string value,
//! creating intermediate objects as needed; `remove` deletes the key if
//! present; `replace` swaps the value only when the current value equals
//! `value` exactly.

use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use logrelay_domain::{CollectorError, Processor, ProcessorFactory, RecordSink};

pub const PROCESSOR_NAME: &str = "json";

#[derive(Debug, Default, Deserialize)]
struct JsonSettings {
    #[serde(default)]
    add: Vec<AddAction>,

    #[serde(default)]
    remove: Vec<RemoveAction>,

    #[serde(default)]
    replace: Vec<ReplaceAction>,
}

#[derive(Debug, Deserialize)]
struct AddAction {
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct RemoveAction {
    key: String,
}

#[derive(Debug, Deserialize)]
struct ReplaceAction {
    key: String,
    value: Value,
    new_value: Value,
}

struct JsonProcessor {
    settings: JsonSettings,
}

/// Builds the `json` processor factory.
pub fn factory() -> Arc<dyn ProcessorFactory> {
    Arc::new(
        |settings: &[u8]| -> Result<Arc<dyn Processor>, CollectorError> {
            let settings: JsonSettings = if settings.is_empty() {
                JsonSettings::default()
            } else {
                serde_json::from_slice(settings).map_err(|e| {
                    CollectorError::InvalidConfiguration(format!(
                        "issue parsing json processor settings: {e}"
                    ))
                })?
            };
            Ok(Arc::new(JsonProcessor { settings }))
        },
    )
}

impl Processor for JsonProcessor {
    fn process(&self, input: &Path, sink: &dyn RecordSink) -> Result<(), CollectorError> {
        let file = std::fs::File::open(input)
            .map_err(|e| CollectorError::ProcessorError(format!("issue opening file: {e}")))?;

        for line in BufReader::new(file).lines() {
            let line = line
                .map_err(|e| CollectorError::ProcessorError(format!("issue reading file: {e}")))?;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let mut value: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(_) => {
                    tracing::debug!("line is not valid json, dropping");
                    continue;
                }
            };

            for action in &self.settings.add {
                set_path(&mut value, &action.key, Value::String(action.value.clone()));
            }
            for action in &self.settings.remove {
                remove_path(&mut value, &action.key);
            }
            for action in &self.settings.replace {
                if get_path(&value, &action.key) == Some(&action.value) {
                    set_path(&mut value, &action.key, action.new_value.clone());
                }
            }

            let rendered = serde_json::to_vec(&value)
                .map_err(|e| CollectorError::ProcessorError(format!("issue rendering line: {e}")))?;
            sink.append(&rendered)?;
        }

        Ok(())
    }
}

fn set_path(value: &mut Value, key: &str, new: Value) {
    match key.split_once('.') {
        None => {
            if let Some(map) = value.as_object_mut() {
                map.insert(key.to_string(), new);
            }
        }
        Some((head, rest)) => {
            let Some(map) = value.as_object_mut() else {
                return;
            };
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(serde_json::Map::new()));
            set_path(child, rest, new);
        }
    }
}

fn get_path<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match key.split_once('.') {
        None => value.as_object()?.get(key),
        Some((head, rest)) => get_path(value.as_object()?.get(head)?, rest),
    }
}

fn remove_path(value: &mut Value, key: &str) {
    match key.split_once('.') {
        None => {
            if let Some(map) = value.as_object_mut() {
                map.remove(key);
            }
        }
        Some((head, rest)) => {
            if let Some(child) = value.as_object_mut().and_then(|m| m.get_mut(head)) {
                remove_path(child, rest);
            }
        }
    }
}
