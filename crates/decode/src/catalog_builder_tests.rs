// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::metadata::{NormalizedExtrinsic, NormalizedPallet, NormalizedStorageEntry, StorageShapeMeta};
use harvester_storage::catalog::StorageShape;
use parity_scale_codec::Encode;
use scale_info::TypeInfo;

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum TestCall {
    /// Sends funds to an account.
    Transfer { dest: u32, amount: u64 },
    Noop,
}

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum TestEvent {
    Created { id: u32 },
}

#[derive(Encode, TypeInfo)]
#[allow(dead_code)]
enum TestError {
    NotFound,
}

fn build_metadata() -> DecodedMetadata {
    let mut registry = scale_info::Registry::new();
    let call_type_id = registry.register_type(&scale_info::MetaType::new::<TestCall>()).id;
    let event_type_id = registry.register_type(&scale_info::MetaType::new::<TestEvent>()).id;
    let error_type_id = registry.register_type(&scale_info::MetaType::new::<TestError>()).id;
    let value_type_id = registry.register_type(&scale_info::MetaType::new::<u32>()).id;
    let account_type_id = registry.register_type(&scale_info::MetaType::new::<[u8; 32]>()).id;
    let max_supply_type_id = registry.register_type(&scale_info::MetaType::new::<u64>()).id;

    let pallet = NormalizedPallet {
        index: 7,
        name: "Balances".to_string(),
        call_type_id: Some(call_type_id),
        event_type_id: Some(event_type_id),
        error_type_id: Some(error_type_id),
        storage: vec![NormalizedStorageEntry {
            name: "TotalIssuance".to_string(),
            shape: StorageShapeMeta::Plain,
            key_type_id: None,
            value_type_id,
            hashers: Vec::new(),
            default: 0u32.encode(),
            docs: vec!["Total issuance in circulation.".to_string()],
        }],
        constants: vec![
            crate::metadata::NormalizedConstant {
                name: "TreasuryAccount".to_string(),
                type_id: account_type_id,
                value: [9u8; 32].to_vec(),
                docs: Vec::new(),
            },
            crate::metadata::NormalizedConstant {
                name: "MaxSupply".to_string(),
                type_id: max_supply_type_id,
                value: 1_000u64.encode(),
                docs: Vec::new(),
            },
        ],
    };

    DecodedMetadata {
        registry: registry.into(),
        pallets: vec![pallet],
        extrinsic: NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: None,
            call_type_id,
            signature_type_id: None,
            extra_type_id: None,
            signed_extensions: Vec::new(),
        },
    }
}

#[test]
fn builds_one_call_row_per_variant_with_pallet_index_lookup() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    assert_eq!(rows.calls.len(), 2);
    let transfer = rows.calls.iter().find(|c| c.call_name == "Transfer").expect("Transfer call present");
    assert_eq!(transfer.call_lookup, lookup_key(7, 0));
    assert_eq!(transfer.lookup, transfer.call_lookup);
    assert_eq!(transfer.pallet, "Balances");
    assert_eq!(transfer.documentation.as_deref(), Some("Sends funds to an account."));

    let noop = rows.calls.iter().find(|c| c.call_name == "Noop").expect("Noop call present");
    assert_eq!(noop.call_lookup, lookup_key(7, 1));
}

#[test]
fn call_arguments_carry_declared_scale_types() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    let transfer_lookup = lookup_key(7, 0);
    let args: Vec<_> = rows
        .call_arguments
        .iter()
        .filter(|a| a.call_lookup == transfer_lookup)
        .collect();
    assert_eq!(args.len(), 2);
    assert_eq!(args[0].name, "dest");
    assert_eq!(args[0].scale_type, "u32");
    assert_eq!(args[1].name, "amount");
    assert_eq!(args[1].scale_type, "u64");
}

#[test]
fn events_and_attributes_mirror_the_call_shape() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    assert_eq!(rows.events.len(), 1);
    let created = &rows.events[0];
    assert_eq!(created.event_name, "Created");
    assert_eq!(created.event_lookup, lookup_key(7, 0));

    assert_eq!(rows.event_attributes.len(), 1);
    assert_eq!(rows.event_attributes[0].name, "id");
    assert_eq!(rows.event_attributes[0].scale_type, "u32");
}

#[test]
fn errors_enumerate_every_variant() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    assert_eq!(rows.errors.len(), 1);
    assert_eq!(rows.errors[0].error_name, "NotFound");
    assert_eq!(rows.errors[0].pallet, "Balances");
}

#[test]
fn storage_row_carries_shape_and_default_bytes() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    assert_eq!(rows.storage.len(), 1);
    let entry = &rows.storage[0];
    assert_eq!(entry.storage_name, "TotalIssuance");
    assert_eq!(entry.shape, StorageShape::Plain);
    assert_eq!(entry.key_scale_type, None);
    assert_eq!(entry.value_scale_type, "u32");
    assert_eq!(entry.default_value, 0u32.encode());
    assert_eq!(entry.documentation.as_deref(), Some("Total issuance in circulation."));
}

#[test]
fn byte_array_constants_hex_encode_instead_of_json_arraying() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    let treasury = rows
        .constants
        .iter()
        .find(|c| c.constant_name == "TreasuryAccount")
        .expect("TreasuryAccount constant present");
    assert_eq!(treasury.value, serde_json::Value::String(format!("0x{}", "09".repeat(32))));
}

#[test]
fn scalar_constants_decode_to_json_numbers() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    let max_supply = rows
        .constants
        .iter()
        .find(|c| c.constant_name == "MaxSupply")
        .expect("MaxSupply constant present");
    assert_eq!(max_supply.value, serde_json::json!(1_000));
}

#[test]
fn runtime_row_aggregates_counts_across_pallets() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    let runtime = rows.runtime.expect("runtime row built");
    assert_eq!(runtime.spec_name, "test-runtime");
    assert_eq!(runtime.spec_version, 3);
    assert_eq!(runtime.count_pallets, 1);
    assert_eq!(runtime.count_call_functions, 2);
    assert_eq!(runtime.count_events, 1);
    assert_eq!(runtime.count_storage_functions, 1);
    assert_eq!(runtime.count_constants, 2);
    assert_eq!(runtime.count_errors, 1);

    assert_eq!(rows.pallets.len(), 1);
    let pallet_row = &rows.pallets[0];
    assert_eq!(pallet_row.pallet_index, 7);
    assert_eq!(pallet_row.count_call_functions, 2);
}

#[test]
fn type_table_includes_every_registered_type() {
    let metadata = build_metadata();
    let coord = RuntimeCoordinate::new("test-runtime", 3);
    let rows = build_catalog(&coord, &metadata);

    assert_eq!(rows.types.len(), metadata.registry.types.len());
    assert!(rows.types.iter().any(|t| t.scale_type == "u32" && t.is_primitive));
    assert!(rows.types.iter().any(|t| t.decoder_class == "variant" && t.scale_type.contains("TestCall")));
}
