// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parse_single_block_number() {
    let spec = BlocksSpec::parse("5").unwrap();
    assert_eq!(spec.block_numbers(), vec![5]);
}

#[test]
fn parse_comma_separated_list() {
    let spec = BlocksSpec::parse("1,3,7").unwrap();
    assert_eq!(spec.block_numbers(), vec![1, 3, 7]);
}

#[test]
fn parse_single_range_stays_a_range() {
    let spec = BlocksSpec::parse("100-102").unwrap();
    assert_eq!(spec, BlocksSpec::Range { block_start: 100, block_end: 102 });
    assert_eq!(spec.block_numbers(), vec![100, 101, 102]);
}

#[test]
fn parse_mixed_list_and_ranges_expands_to_ids() {
    let spec = BlocksSpec::parse("1,3-5,9").unwrap();
    assert_eq!(spec.block_numbers(), vec![1, 3, 4, 5, 9]);
}

#[test]
fn parse_rejects_inverted_range() {
    assert!(BlocksSpec::parse("10-5").is_err());
}

#[test]
fn parse_rejects_empty_expression() {
    assert!(BlocksSpec::parse("").is_err());
}

#[test]
fn parse_rejects_garbage() {
    assert!(BlocksSpec::parse("abc").is_err());
}

#[test]
fn ids_spec_sorts_block_numbers() {
    let spec = BlocksSpec::Ids {
        block_ids: vec![5, 1, 3],
    };
    assert_eq!(spec.block_numbers(), vec![1, 3, 5]);
}

#[test]
fn cron_fires_at_respects_interval_and_active_flag() {
    let cron = HarvesterStorageCron {
        id: StorageCronId::new(),
        block_number_interval: 2,
        pallet: "System".into(),
        storage_name: "Events".into(),
        storage_key: None,
        active: true,
    };
    assert!(cron.fires_at(0));
    assert!(cron.fires_at(2));
    assert!(!cron.fires_at(3));

    let inactive = HarvesterStorageCron {
        active: false,
        ..cron
    };
    assert!(!inactive.fires_at(0));
}
