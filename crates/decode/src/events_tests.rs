// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::metadata::{DecodedMetadata, NormalizedExtrinsic, NormalizedPallet, NormalizedStorageEntry, StorageShapeMeta};
use harvester_core::RuntimeCoordinate;
use parity_scale_codec::Encode;
use scale_info::TypeInfo;
use std::sync::Arc;

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum Phase {
    ApplyExtrinsic(u32),
    Finalization,
    Initialization,
}

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum BalancesEvent {
    Transfer { amount: u64 },
}

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum RuntimeEvent {
    Balances(BalancesEvent),
}

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
struct EventRecord {
    phase: Phase,
    event: RuntimeEvent,
    topics: Vec<[u8; 32]>,
}

fn build_context() -> DecodeContext {
    let mut registry = scale_info::Registry::new();
    let events_type_id = registry
        .register_type(&scale_info::MetaType::new::<Vec<EventRecord>>())
        .id;

    let pallet = NormalizedPallet {
        index: 0,
        name: "System".to_string(),
        call_type_id: None,
        event_type_id: None,
        error_type_id: None,
        storage: vec![NormalizedStorageEntry {
            name: "Events".to_string(),
            shape: StorageShapeMeta::Plain,
            key_type_id: None,
            value_type_id: events_type_id,
            hashers: Vec::new(),
            default: Vec::new(),
            docs: Vec::new(),
        }],
        constants: Vec::new(),
    };

    let metadata = DecodedMetadata {
        registry: registry.into(),
        pallets: vec![pallet],
        extrinsic: NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: None,
            call_type_id: 0,
            signature_type_id: None,
            extra_type_id: None,
            signed_extensions: Vec::new(),
        },
    };

    DecodeContext::new(RuntimeCoordinate::new("test", 1), Arc::new(metadata))
}

#[test]
fn decodes_one_event_from_an_extrinsic() {
    let ctx = build_context();
    let records = vec![EventRecord {
        phase: Phase::ApplyExtrinsic(2),
        event: RuntimeEvent::Balances(BalancesEvent::Transfer { amount: 500 }),
        topics: vec![],
    }];
    let encoded = records.encode();

    let decoded = decode_events(&encoded, &ctx).expect("decode should succeed");
    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].event_idx, 0);
    assert_eq!(decoded[0].extrinsic_idx, Some(2));
    assert_eq!(decoded[0].pallet, "Balances");
    assert_eq!(decoded[0].event_name, "Transfer");
}

#[test]
fn finalization_phase_has_no_extrinsic_idx() {
    let ctx = build_context();
    let records = vec![EventRecord {
        phase: Phase::Finalization,
        event: RuntimeEvent::Balances(BalancesEvent::Transfer { amount: 1 }),
        topics: vec![],
    }];
    let encoded = records.encode();

    let decoded = decode_events(&encoded, &ctx).expect("decode should succeed");
    assert_eq!(decoded[0].extrinsic_idx, None);
}

#[test]
fn empty_events_list_decodes_to_empty_vec() {
    let ctx = build_context();
    let records: Vec<EventRecord> = vec![];
    let encoded = records.encode();

    let decoded = decode_events(&encoded, &ctx).expect("decode should succeed");
    assert!(decoded.is_empty());
}

#[test]
fn event_indices_increase_in_order() {
    let ctx = build_context();
    let records = vec![
        EventRecord {
            phase: Phase::ApplyExtrinsic(0),
            event: RuntimeEvent::Balances(BalancesEvent::Transfer { amount: 1 }),
            topics: vec![],
        },
        EventRecord {
            phase: Phase::ApplyExtrinsic(0),
            event: RuntimeEvent::Balances(BalancesEvent::Transfer { amount: 2 }),
            topics: vec![],
        },
    ];
    let encoded = records.encode();

    let decoded = decode_events(&encoded, &ctx).expect("decode should succeed");
    assert_eq!(decoded[0].event_idx, 0);
    assert_eq!(decoded[1].event_idx, 1);
}
