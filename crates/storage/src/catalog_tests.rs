// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn lookup_key_is_two_byte_hex() {
    assert_eq!(lookup_key(0, 0), "0x0000");
    assert_eq!(lookup_key(5, 12), "0x050c");
    assert_eq!(lookup_key(255, 255), "0xffff");
}

#[test]
fn runtime_pallet_counters_sum_into_runtime_row() {
    let pallets = vec![
        RuntimePallet {
            spec_name: "kusama".into(),
            spec_version: 9430,
            pallet_index: 0,
            pallet: "System".into(),
            count_call_functions: 3,
            count_events: 2,
            count_storage_functions: 4,
            count_constants: 1,
            count_errors: 0,
        },
        RuntimePallet {
            spec_name: "kusama".into(),
            spec_version: 9430,
            pallet_index: 1,
            pallet: "Balances".into(),
            count_call_functions: 5,
            count_events: 3,
            count_storage_functions: 2,
            count_constants: 2,
            count_errors: 1,
        },
    ];

    let runtime = Runtime {
        spec_name: "kusama".into(),
        spec_version: 9430,
        count_call_functions: pallets.iter().map(|p| p.count_call_functions).sum(),
        count_events: pallets.iter().map(|p| p.count_events).sum(),
        count_pallets: pallets.len() as i32,
        count_storage_functions: pallets.iter().map(|p| p.count_storage_functions).sum(),
        count_constants: pallets.iter().map(|p| p.count_constants).sum(),
        count_errors: pallets.iter().map(|p| p.count_errors).sum(),
    };

    assert_eq!(runtime.count_call_functions, 8);
    assert_eq!(runtime.count_events, 5);
    assert_eq!(runtime.count_pallets, 2);
    assert_eq!(runtime.count_errors, 1);
}

#[test]
fn storage_shape_round_trips_through_json() {
    let json = serde_json::to_string(&StorageShape::Map).unwrap();
    let back: StorageShape = serde_json::from_str(&json).unwrap();
    assert_eq!(back, StorageShape::Map);
}
