// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::str::FromStr;

#[test]
fn stage_display_matches_wire_strings() {
    assert_eq!(Stage::Blocks.to_string(), "blocks");
    assert_eq!(Stage::Etl.to_string(), "etl");
}

#[test]
fn only_state_decode_etl_require_archive() {
    assert!(!Stage::Blocks.requires_archive());
    assert!(Stage::State.requires_archive());
    assert!(Stage::Decode.requires_archive());
    assert!(!Stage::Cron.requires_archive());
    assert!(Stage::Etl.requires_archive());
}

#[test]
fn action_from_str_parses_each_stage() {
    assert_eq!(Action::from_str("blocks").unwrap(), Action::Stage(Stage::Blocks));
    assert_eq!(Action::from_str("all").unwrap(), Action::All);
    assert!(Action::from_str("bogus").is_err());
}

#[test]
fn action_all_expands_to_every_stage() {
    assert_eq!(Action::All.stages(), Stage::ALL.to_vec());
}

#[test]
fn action_stage_expands_to_single_stage() {
    assert_eq!(Action::Stage(Stage::Cron).stages(), vec![Stage::Cron]);
}

#[test]
fn node_type_display() {
    assert_eq!(NodeType::Archive.to_string(), "archive");
    assert_eq!(NodeType::Full.to_string(), "full");
}
