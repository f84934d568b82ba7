// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn sample_registry() -> (u32, PortableRegistry) {
    #[derive(scale_info::TypeInfo)]
    #[allow(dead_code)]
    enum SampleCall {
        DoThing { amount: u64 },
    }

    let meta = scale_info::MetaType::new::<SampleCall>();
    let mut registry = scale_info::Registry::new();
    let id = registry.register_type(&meta);
    (id.id, registry.into())
}

fn sample_pallet(call_type_id: u32) -> NormalizedPallet {
    NormalizedPallet {
        index: 3,
        name: "Balances".to_string(),
        call_type_id: Some(call_type_id),
        event_type_id: None,
        error_type_id: None,
        storage: vec![NormalizedStorageEntry {
            name: "TotalIssuance".to_string(),
            shape: StorageShapeMeta::Plain,
            key_type_id: None,
            value_type_id: call_type_id,
            hashers: Vec::new(),
            default: vec![0],
            docs: vec!["Total issuance".to_string()],
        }],
        constants: vec![NormalizedConstant {
            name: "ExistentialDeposit".to_string(),
            type_id: call_type_id,
            value: vec![1, 0, 0, 0],
            docs: Vec::new(),
        }],
    }
}

fn sample_metadata() -> DecodedMetadata {
    let (call_type_id, registry) = sample_registry();
    DecodedMetadata {
        registry,
        pallets: vec![sample_pallet(call_type_id)],
        extrinsic: NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: Some(call_type_id),
            call_type_id,
            signature_type_id: Some(call_type_id),
            extra_type_id: Some(call_type_id),
            signed_extensions: Vec::new(),
        },
    }
}

#[test]
fn pallet_lookup_by_name_and_index() {
    let metadata = sample_metadata();
    assert_eq!(metadata.pallet_by_name("Balances").unwrap().index, 3);
    assert_eq!(metadata.pallet_by_index(3).unwrap().name, "Balances");
    assert!(metadata.pallet_by_name("NoSuchPallet").is_none());
    assert!(metadata.pallet_by_index(99).is_none());
}

#[test]
fn resolve_finds_registered_type() {
    let metadata = sample_metadata();
    let call_type_id = metadata.pallets[0].call_type_id.unwrap();
    let resolved = metadata.resolve(call_type_id).expect("type should resolve");
    assert!(matches!(resolved.type_def, scale_info::TypeDef::Variant(_)));
}

#[test]
fn resolve_returns_none_for_unknown_id() {
    let metadata = sample_metadata();
    assert!(metadata.resolve(u32::MAX).is_none());
}

#[test]
fn storage_hasher_names_cover_all_variants() {
    use frame_metadata::v14::StorageHasher::*;
    assert_eq!(normalize_storage_hasher_v14(&Blake2_128), "Blake2_128");
    assert_eq!(normalize_storage_hasher_v14(&Blake2_256), "Blake2_256");
    assert_eq!(normalize_storage_hasher_v14(&Blake2_128Concat), "Blake2_128Concat");
    assert_eq!(normalize_storage_hasher_v14(&Twox128), "Twox128");
    assert_eq!(normalize_storage_hasher_v14(&Twox256), "Twox256");
    assert_eq!(normalize_storage_hasher_v14(&Twox64Concat), "Twox64Concat");
    assert_eq!(normalize_storage_hasher_v14(&Identity), "Identity");
}

#[test]
fn dangling_type_id_error_message_names_pallet_and_id() {
    let err = MetadataError::DanglingTypeId {
        pallet: "Balances".to_string(),
        type_id: 42,
    };
    let msg = err.to_string();
    assert!(msg.contains("Balances"));
    assert!(msg.contains("42"));
}

#[test]
fn unsupported_version_error_has_stable_message() {
    let err = MetadataError::UnsupportedVersion;
    assert_eq!(
        err.to_string(),
        "unsupported or deprecated runtime metadata version"
    );
}

#[test]
fn from_bytes_rejects_garbage() {
    let err = DecodedMetadata::from_bytes(&[1, 2, 3]).unwrap_err();
    assert!(matches!(err, MetadataError::Decode(_)));
}
