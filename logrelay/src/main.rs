// /////////////////////////////////////////////////////////////////////////////
// LogRelay
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Collector binary entry point. All behavior lives in the library; this
//! just runs the CLI and maps its result onto a process exit code.

use logrelay::presentation::cli;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    cli::run().await.into()
}
