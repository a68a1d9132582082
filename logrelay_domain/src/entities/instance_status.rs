// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Instance Status
//!
//! The operational health record of one running instance, owned exclusively
//! by its manager. Observers (the collector's `status` / `list_status` API)
//! receive cloned snapshots, never live references, so a reader always sees
//! a consistent state.
//!
//! ## Transitions
//!
//! - `record_success(count)` - a batch committed: stamps the success time and
//!   count, clears the error list and counter.
//! - `record_failure(err)` - any non-critical or critical failure: appends
//!   the error and bumps the since-last-success counter; success fields are
//!   untouched.
//!
//! Operators are expected to watch `errors_since_last_success` and
//! `last_success_at`: a healthy instance keeps resetting the former and
//! advancing the latter.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

use crate::error::CollectorError;

/// Health snapshot of a pipeline instance.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceStatus {
    pub running: bool,

    pub last_success_at: Option<DateTime<Utc>>,

    pub last_success_count: u64,

    #[serde(serialize_with = "serialize_errors")]
    pub errors: Vec<CollectorError>,

    pub errors_since_last_success: u64,

    pub has_errors: bool,
}

impl InstanceStatus {
    pub fn new() -> Self {
        Self {
            running: false,
            last_success_at: None,
            last_success_count: 0,
            errors: Vec::new(),
            errors_since_last_success: 0,
            has_errors: false,
        }
    }

    /// Records a committed batch. Clears all accumulated error state.
    pub fn record_success(&mut self, count: u64) {
        self.last_success_at = Some(Utc::now());
        self.last_success_count = count;
        self.errors.clear();
        self.errors_since_last_success = 0;
        self.has_errors = false;
    }

    /// Records a failure. Success fields are left unchanged.
    pub fn record_failure(&mut self, err: CollectorError) {
        self.errors.push(err);
        self.errors_since_last_success += 1;
        self.has_errors = true;
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }
}

impl Default for InstanceStatus {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_errors<S>(errors: &[CollectorError], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(errors.iter().map(|e| e.to_string()))
}
