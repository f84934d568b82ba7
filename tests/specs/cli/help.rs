// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help/usage specs: the command surface is parseable and
//! discoverable without touching a database or a live node.

use crate::prelude::*;

#[test]
fn no_args_shows_usage_and_exits_nonzero() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn help_shows_usage() {
    cli().args(["--help"]).passes().stdout_has("Usage:");
}

#[test]
fn version_shows_version() {
    cli().args(["--version"]).passes().stdout_has("harvester");
}

#[test]
fn run_help_shows_job_and_type_flags() {
    cli()
        .args(["run", "--help"])
        .passes()
        .stdout_has("--job")
        .stdout_has("--type")
        .stdout_has("--prometheus");
}

#[test]
fn storage_tasks_help_shows_subcommands() {
    cli()
        .args(["storage-tasks", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("add")
        .stdout_has("rm")
        .stdout_has("clean");
}

#[test]
fn storage_cron_help_shows_subcommands() {
    cli()
        .args(["storage-cron", "--help"])
        .passes()
        .stdout_has("list")
        .stdout_has("add")
        .stdout_has("rm");
}
