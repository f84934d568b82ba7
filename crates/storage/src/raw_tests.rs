// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn node_block_storage_null_data_serializes_as_json_null() {
    let row = NodeBlockStorage {
        block_hash: BlockHash::from_hex(&"00".repeat(32)).unwrap(),
        storage_key: vec![1, 2, 3],
        block_number: 5,
        data: None,
        pallet: "System".into(),
        name: "Events".into(),
        complete: true,
    };
    let json = serde_json::to_value(&row).unwrap();
    assert!(json["data"].is_null());
}

#[test]
fn node_block_header_round_trips_through_json() {
    let hash = BlockHash::from_hex(&"ab".repeat(32)).unwrap();
    let header = NodeBlockHeader {
        hash,
        parent_hash: hash,
        state_root: hash,
        extrinsics_root: hash,
        number: vec![0, 1],
        block_number: 1,
        count_extrinsics: 2,
        count_logs: 0,
    };
    let json = serde_json::to_string(&header).unwrap();
    let back: NodeBlockHeader = serde_json::from_str(&json).unwrap();
    assert_eq!(header, back);
}
