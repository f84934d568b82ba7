// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn idle_has_no_running_stage() {
    let health = MetricsHealth::idle();
    assert_eq!(health.running_stage, None);
    assert_eq!(health.running_stage_label(), "-");
}

#[test]
fn running_stage_label_reflects_current_stage() {
    let health = MetricsHealth {
        running_stage: Some(Stage::Decode),
        ..MetricsHealth::idle()
    };
    assert_eq!(health.running_stage_label(), "decode");
}

#[test]
fn default_is_idle() {
    assert_eq!(MetricsHealth::default(), MetricsHealth::idle());
}
