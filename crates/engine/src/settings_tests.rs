// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use harvester_storage::HarvesterStatus;

fn row(key: &str, value: &str) -> HarvesterStatus {
    HarvesterStatus {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn master_switch_off_disables_every_stage() {
    let snapshot = SettingsSnapshot::reload(&[row(status_keys::ENABLE_HARVESTER, "false")]);
    assert!(!snapshot.stage_enabled(Stage::Blocks));
    assert!(!snapshot.stage_enabled(Stage::Decode));
}

#[test]
fn stage_flags_default_enabled_when_unset() {
    let snapshot = SettingsSnapshot::reload(&[row(status_keys::ENABLE_HARVESTER, "true")]);
    assert!(snapshot.stage_enabled(Stage::Blocks));
    assert!(snapshot.stage_enabled(Stage::State));
}

#[test]
fn an_explicitly_disabled_stage_is_skipped_even_with_master_on() {
    let snapshot = SettingsSnapshot::reload(&[
        row(status_keys::ENABLE_HARVESTER, "true"),
        row(status_keys::ENABLE_DECODE, "false"),
    ]);
    assert!(snapshot.stage_enabled(Stage::Blocks));
    assert!(!snapshot.stage_enabled(Stage::Decode));
}
