// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Output Path Templates
//!
//! `%variable%` substitution for file-output paths, so one configured path
//! like `/data/logs/%year%/%month%/%day%/events-%uuid%.log` fans out over
//! time. Time variables render from the moment of delivery; `%uuid%` is
//! fresh on every render. Unknown tokens pass through untouched.

use chrono::{DateTime, Datelike, Local, Timelike};

/// Renders a path template against `now`.
pub fn render(template: &str, now: DateTime<Local>) -> String {
    let timezone = {
        let tz = now.format("%:z").to_string();
        if tz == "+00:00" {
            "Z".to_string()
        } else {
            format!("{tz}:00")
        }
    };

    let substitutions: [(&str, String); 12] = [
        ("%year%", format!("{:04}", now.year())),
        ("%year_short%", now.format("%y").to_string()),
        ("%month%", format!("{:02}", now.month())),
        ("%month_name%", now.format("%B").to_string()),
        ("%month_name_short%", now.format("%b").to_string()),
        ("%day%", format!("{:02}", now.day())),
        ("%hour%", format!("{:02}", now.hour())),
        ("%minute%", format!("{:02}", now.minute())),
        ("%second%", format!("{:02}", now.second())),
        ("%timezone%", timezone),
        ("%unix%", now.timestamp().to_string()),
        ("%uuid%", uuid::Uuid::new_v4().to_string()),
    ];

    let mut rendered = template.to_string();
    for (token, value) in substitutions {
        rendered = rendered.replace(token, &value);
    }
    rendered
}
