// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Collector surface: registration rules, instance lifecycle, duplicate and
//! not-found handling, and the supervisory snapshot APIs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::*;
use logrelay::{Collector, CollectorConfig, PipelineTuning};
use logrelay_domain::{CollectorError, Input, InstanceConfig, Output, PluginSpec, StateStore};

fn collector_with(handler_errors: bool) -> (Arc<Collector>, Arc<parking_lot::Mutex<Vec<(bool, String)>>>) {
    let (handler, errors) = error_collector();
    let collector = Collector::bare(CollectorConfig {
        state_store: RecordingStateStore::new() as Arc<dyn StateStore>,
        error_handler: if handler_errors {
            handler
        } else {
            logrelay_domain::services::error_handler::noop_error_handler()
        },
        tuning: PipelineTuning::default(),
    });
    (Arc::new(collector), errors)
}

fn input_factory_for(input: Arc<ScriptedInput>) -> Arc<dyn logrelay_domain::InputFactory> {
    Arc::new(
        move |_settings: &[u8]| -> Result<Arc<dyn Input>, CollectorError> {
            Ok(Arc::clone(&input) as Arc<dyn Input>)
        },
    )
}

fn output_factory_for(output: Arc<RecordingOutput>) -> Arc<dyn logrelay_domain::OutputFactory> {
    Arc::new(
        move |_settings: &[u8]| -> Result<Arc<dyn Output>, CollectorError> {
            Ok(Arc::clone(&output) as Arc<dyn Output>)
        },
    )
}

fn simple_config(input: &str, output: &str) -> InstanceConfig {
    InstanceConfig {
        input: PluginSpec::new(input),
        processors: Vec::new(),
        outputs: vec![PluginSpec::new(output)],
    }
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let (collector, _) = collector_with(false);
    let output = RecordingOutput::ok();

    collector
        .register_output("sink", output_factory_for(output.clone()))
        .unwrap();
    let again = collector.register_output("sink", output_factory_for(output));
    assert!(matches!(again, Err(CollectorError::AlreadyRegistered(_))));
}

#[tokio::test]
async fn test_start_with_unknown_plugin_fails_critically() {
    let (collector, errors) = collector_with(true);
    let result = collector
        .start("edge", simple_config("no-such-input", "no-such-output"))
        .await;

    assert!(matches!(result, Err(CollectorError::UnknownPlugin(_))));
    assert!(errors.lock().iter().any(|(critical, _)| *critical));
    assert!(collector.list().is_empty(), "failed start leaves no instance behind");
}

#[tokio::test]
async fn test_start_with_failing_factory_fails_critically() {
    let (collector, errors) = collector_with(true);
    collector
        .register_input(
            "broken",
            Arc::new(|_settings: &[u8]| -> Result<Arc<dyn Input>, CollectorError> {
                Err(CollectorError::InvalidConfiguration(
                    "scripted factory failure".to_string(),
                ))
            }),
        )
        .unwrap();
    collector
        .register_output("sink", output_factory_for(RecordingOutput::ok()))
        .unwrap();

    let result = collector.start("edge", simple_config("broken", "sink")).await;
    assert!(matches!(result, Err(CollectorError::InvalidConfiguration(_))));
    assert!(errors.lock().iter().any(|(critical, msg)| *critical && msg.contains("factory")));
}

#[tokio::test]
async fn test_start_requires_outputs_and_non_empty_id() {
    let (collector, _) = collector_with(false);
    collector
        .register_input("src", input_factory_for(ScriptedInput::new(Vec::new())))
        .unwrap();

    let mut config = simple_config("src", "sink");
    config.outputs.clear();
    let result = collector.start("edge", config).await;
    assert!(matches!(result, Err(CollectorError::ValidationError(_))));

    let result = collector.start("  ", simple_config("src", "sink")).await;
    assert!(matches!(result, Err(CollectorError::ValidationError(_))));
}

#[tokio::test]
async fn test_duplicate_instance_id_is_rejected_while_running() {
    let (collector, _) = collector_with(false);
    let input = ScriptedInput::holding(Vec::new());
    collector
        .register_input("src", input_factory_for(input))
        .unwrap();
    collector
        .register_output("sink", output_factory_for(RecordingOutput::ok()))
        .unwrap();

    let runner = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.start("edge", simple_config("src", "sink")).await })
    };

    // Wait until the instance is live
    let deadline = Instant::now() + Duration::from_secs(5);
    while collector.list().is_empty() {
        assert!(Instant::now() < deadline, "instance never appeared");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let duplicate = collector.start("edge", simple_config("src", "sink")).await;
    assert!(matches!(duplicate, Err(CollectorError::DuplicateInstance(_))));

    collector.stop("edge").unwrap();
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .expect("instance should stop")
        .unwrap()
        .unwrap();
    assert!(collector.list().is_empty(), "stopped instance is removed from the map");
}

#[tokio::test]
async fn test_stop_and_status_on_unknown_id() {
    let (collector, _) = collector_with(false);
    assert!(matches!(
        collector.stop("ghost"),
        Err(CollectorError::InstanceNotFound(_))
    ));
    assert!(matches!(
        collector.status("ghost"),
        Err(CollectorError::InstanceNotFound(_))
    ));
}

#[tokio::test]
async fn test_status_reflects_running_instance() {
    let (collector, _) = collector_with(false);
    let input = ScriptedInput::holding(vec![BatchSpec::records(&["r"], "c1")]);
    collector
        .register_input("src", input_factory_for(input))
        .unwrap();
    let output = RecordingOutput::ok();
    collector
        .register_output("sink", output_factory_for(output.clone()))
        .unwrap();

    let runner = {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move { collector.start("edge", simple_config("src", "sink")).await })
    };

    // Wait for the batch to commit, then inspect status
    let deadline = Instant::now() + Duration::from_secs(5);
    while output.call_count() == 0 {
        assert!(Instant::now() < deadline, "batch never delivered");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let status = collector.status("edge").unwrap();
        if status.last_success_count == 1 {
            assert!(status.running);
            break;
        }
        assert!(Instant::now() < deadline, "status never recorded the commit");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    collector.stop("edge").unwrap();
    tokio::time::timeout(Duration::from_secs(5), runner)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn test_stop_all_signals_every_instance() {
    let (collector, _) = collector_with(false);
    for name in ["a", "b", "c"] {
        let input = ScriptedInput::holding(Vec::new());
        collector
            .register_input(&format!("src-{name}"), input_factory_for(input))
            .unwrap();
    }
    collector
        .register_output("sink", output_factory_for(RecordingOutput::ok()))
        .unwrap();

    let mut runners = tokio::task::JoinSet::new();
    for name in ["a", "b", "c"] {
        let collector = Arc::clone(&collector);
        runners.spawn(async move {
            collector
                .start(name, simple_config(&format!("src-{name}"), "sink"))
                .await
        });
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while collector.list().len() < 3 {
        assert!(Instant::now() < deadline, "instances never all appeared");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let mut ids = collector.list();
    ids.sort();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(collector.list_status().len(), 3);

    collector.stop_all();
    let finished = tokio::time::timeout(Duration::from_secs(5), async {
        while runners.join_next().await.is_some() {}
    })
    .await;
    assert!(finished.is_ok(), "stop_all must end every instance");
    assert!(collector.list().is_empty());
}
