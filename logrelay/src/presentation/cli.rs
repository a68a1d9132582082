// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Operator CLI
//!
//! The thin shell over the collector API:
//!
//! - `logrelay serve --config-dir <dir>` - run every `*.conf` instance in
//!   the directory until signalled. Cursors persist as `<id>.state` files
//!   (in `--state-dir` when given, else beside the configs). The first
//!   SIGTERM/Ctrl+C stops all instances and drains; a second forces exit.
//! - `logrelay validate --config-dir <dir>` - parse and validate every
//!   config, reporting each problem; exits non-zero if any is broken.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};

use logrelay_bootstrap::exit_code::ExitCode;
use logrelay_bootstrap::{logger, signals};
use logrelay_domain::CollectorError;

use crate::application::collector::{Collector, CollectorConfig};
use crate::application::manager::PipelineTuning;
use crate::infrastructure::config::scan_config_dir;
use crate::infrastructure::state::FileStateStore;

/// Interval between status snapshot log lines while serving.
const STATUS_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Parser)]
#[command(name = "logrelay")]
#[command(about = "Pluggable log-collection engine with durable checkpointing")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every instance configured in a directory
    Serve {
        /// Directory of *.conf instance configs
        #[arg(short, long)]
        config_dir: PathBuf,

        /// Directory for cursor state files (defaults to the config dir)
        #[arg(long)]
        state_dir: Option<PathBuf>,
    },

    /// Validate the configs in a directory without running them
    Validate {
        /// Directory of *.conf instance configs
        #[arg(short, long)]
        config_dir: PathBuf,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Commands::Serve {
            config_dir,
            state_dir,
        } => serve(config_dir, state_dir).await,
        Commands::Validate { config_dir } => validate(config_dir),
    }
}

async fn serve(config_dir: PathBuf, state_dir: Option<PathBuf>) -> ExitCode {
    let entries = match scan_config_dir(&config_dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!("issue reading config directory: {err}");
            return ExitCode::NoInput;
        }
    };

    let mut configs = Vec::new();
    for entry in entries {
        match entry.config {
            Ok(config) => configs.push((entry.id, config)),
            Err(err) => tracing::error!(path = %entry.path.display(), "skipping config: {err}"),
        }
    }

    if configs.is_empty() {
        tracing::warn!(
            "no usable configs in {}, nothing to run",
            config_dir.display()
        );
        return ExitCode::Success;
    }

    let state_dir = state_dir.unwrap_or_else(|| config_dir.clone());
    let collector_config = CollectorConfig {
        state_store: Arc::new(FileStateStore::new(state_dir)),
        error_handler: Arc::new(|critical, err: CollectorError| {
            if critical {
                tracing::error!("{err}");
            } else {
                tracing::warn!("{err}");
            }
        }),
        tuning: PipelineTuning::default(),
    };

    let collector = match Collector::new(collector_config) {
        Ok(collector) => Arc::new(collector),
        Err(err) => {
            tracing::error!("issue building collector: {err}");
            return ExitCode::Software;
        }
    };

    {
        let collector = Arc::clone(&collector);
        signals::install(move || collector.stop_all());
    }

    // Periodic status snapshots, the serve-mode equivalent of polling the
    // collector's status API.
    {
        let collector = Arc::clone(&collector);
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(STATUS_INTERVAL).await;
                for (id, status) in collector.list_status() {
                    match serde_json::to_string(&status) {
                        Ok(rendered) => {
                            tracing::info!(instance = %id, "current status: {rendered}");
                        }
                        Err(err) => {
                            tracing::warn!(instance = %id, "issue rendering status: {err}");
                        }
                    }
                }
            }
        });
    }

    let mut supervisors = tokio::task::JoinSet::new();
    for (id, config) in configs {
        let collector = Arc::clone(&collector);
        supervisors.spawn(async move {
            if let Err(err) = collector.start(&id, config).await {
                tracing::error!(instance = %id, "instance failed to start: {err}");
            }
        });
    }

    while let Some(result) = supervisors.join_next().await {
        if let Err(err) = result {
            tracing::error!("instance supervisor panicked: {err}");
        }
    }

    tracing::info!("all instances stopped");
    ExitCode::Success
}

fn validate(config_dir: PathBuf) -> ExitCode {
    let entries = match scan_config_dir(&config_dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::error!("issue reading config directory: {err}");
            return ExitCode::NoInput;
        }
    };

    if entries.is_empty() {
        tracing::warn!("no *.conf files in {}", config_dir.display());
        return ExitCode::NoInput;
    }

    let mut failed = false;
    for entry in entries {
        let result = entry.config.and_then(|config| {
            config.validate()?;
            Ok(config)
        });
        match result {
            Ok(_) => tracing::info!(instance = %entry.id, "config ok: {}", entry.path.display()),
            Err(err) => {
                failed = true;
                tracing::error!(instance = %entry.id, "config invalid: {err}");
            }
        }
    }

    if failed {
        ExitCode::DataError
    } else {
        ExitCode::Success
    }
}
