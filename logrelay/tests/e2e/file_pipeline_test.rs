// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! The builtin stack end to end: `file` input tailing a log, the `json`
//! processor scrubbing records, the `file` output appending the results,
//! and cursors landing in a `FileStateStore`.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use logrelay::{Collector, CollectorConfig, FileStateStore, PipelineTuning};
use logrelay_domain::{CollectorError, InstanceConfig, StateStore};

async fn wait_for<F: Fn() -> bool>(what: &str, condition: F) {
    let deadline = Instant::now() + Duration::from_secs(15);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

fn output_lines(path: &Path) -> Vec<serde_json::Value> {
    match std::fs::read_to_string(path) {
        Ok(contents) => contents
            .lines()
            .map(|l| serde_json::from_str(l).expect("output line is json"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_file_to_file_pipeline_with_json_scrubbing() {
    let source_dir = tempfile::tempdir().unwrap();
    let out_dir = tempfile::tempdir().unwrap();
    let state_dir = tempfile::tempdir().unwrap();

    let source = source_dir.path().join("app.log");
    std::fs::write(
        &source,
        "{\"msg\":\"alpha\",\"password\":\"hunter2\"}\n{\"msg\":\"beta\"}\n",
    )
    .unwrap();
    let destination = out_dir.path().join("events.log");

    let config: InstanceConfig = serde_json::from_value(serde_json::json!({
        "input": {
            "name": "file",
            "settings": {
                "path": source_dir.path().join("*.log").to_string_lossy(),
                "schedule": 1
            }
        },
        "processors": [
            { "name": "json", "settings": { "remove": [ { "key": "password" } ] } }
        ],
        "outputs": [
            { "name": "file", "settings": { "path": destination.to_string_lossy() } }
        ]
    }))
    .unwrap();

    let state_store = Arc::new(FileStateStore::new(state_dir.path()));
    let collector = Arc::new(
        Collector::new(CollectorConfig {
            state_store: Arc::clone(&state_store) as Arc<dyn StateStore>,
            error_handler: Arc::new(|critical, err: CollectorError| {
                panic!("unexpected pipeline error (critical={critical}): {err}");
            }),
            tuning: PipelineTuning::default(),
        })
        .unwrap(),
    );

    let runner = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.start("e2e", config).await })
    };

    // First tick: both records delivered, password scrubbed
    wait_for("first delivery", || output_lines(&destination).len() == 2).await;
    let lines = output_lines(&destination);
    assert_eq!(lines[0], serde_json::json!({ "msg": "alpha" }));
    assert_eq!(lines[1], serde_json::json!({ "msg": "beta" }));

    // The committed cursor is on disk and tracks the source offset
    let id = logrelay_domain::InstanceId::new("e2e").unwrap();
    wait_for("cursor persistence", || state_dir.path().join("e2e.state").exists()).await;
    let cursor = state_store.load(&id).await.expect("cursor saved");
    let table: serde_json::Value = serde_json::from_slice(cursor.as_bytes()).unwrap();
    let source_len = std::fs::metadata(&source).unwrap().len();
    assert_eq!(
        table["trackers"][0]["file_position"],
        serde_json::json!(source_len)
    );

    // Append: only the new record flows on a later tick
    let mut appended = std::fs::read_to_string(&source).unwrap();
    appended.push_str("{\"msg\":\"gamma\",\"password\":\"again\"}\n");
    std::fs::write(&source, appended).unwrap();

    wait_for("incremental delivery", || output_lines(&destination).len() == 3).await;
    let lines = output_lines(&destination);
    assert_eq!(lines[2], serde_json::json!({ "msg": "gamma" }));

    collector.stop("e2e").unwrap();
    tokio::time::timeout(Duration::from_secs(10), runner)
        .await
        .expect("instance should drain after stop")
        .unwrap()
        .unwrap();
    assert!(collector.list().is_empty());
}
