// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Argument-validation specs for `run`/`storage-tasks`/`storage-cron`
//! that fail before ever reaching for a database connection, so they
//! run without a live Postgres.

use crate::prelude::*;

#[test]
fn run_without_db_connection_fails_fast_with_config_error() {
    // Neither DB_CONNECTION nor its DB_NAME/DB_HOST/... fallback pieces
    // are set, so Settings::from_env fails before anything connects.
    cli()
        .args(["run"])
        .env("SUBSTRATE_RPC_URL", "ws://127.0.0.1:9999")
        .fails()
        .stderr_has("DB_NAME");
}

#[test]
fn run_without_substrate_rpc_url_fails_fast_with_config_error() {
    cli()
        .args(["run"])
        .env("DB_CONNECTION", "postgres://localhost/does-not-matter")
        .fails()
        .stderr_has("SUBSTRATE_RPC_URL");
}

#[test]
fn storage_tasks_add_rejects_malformed_blocks_expression_before_connecting() {
    // No DB_CONNECTION is set, so a successful parse would instead fail
    // with a connection error. The "invalid block" message proves the
    // expression is rejected before any connection attempt is made.
    cli()
        .args(["storage-tasks", "add", "System", "Events", "not-a-block-expr"])
        .env("DB_CONNECTION", "postgres://localhost/does-not-matter")
        .fails()
        .stderr_has("invalid block");
}

#[test]
fn storage_tasks_add_rejects_inverted_range() {
    cli()
        .args(["storage-tasks", "add", "System", "Events", "10-5"])
        .env("DB_CONNECTION", "postgres://localhost/does-not-matter")
        .fails()
        .stderr_has("start > end");
}

#[test]
fn storage_tasks_without_db_connection_fails_fast() {
    cli().args(["storage-tasks", "list"]).fails().stderr_has("DB_CONNECTION");
}
