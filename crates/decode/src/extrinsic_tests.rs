// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::context::DecodeContext;
use crate::metadata::{DecodedMetadata, NormalizedExtrinsic};
use harvester_core::RuntimeCoordinate;
use parity_scale_codec::Encode;
use std::sync::Arc;

#[derive(Encode, scale_info::TypeInfo)]
#[allow(dead_code)]
enum Call {
    DoThing { amount: u32 },
}

fn context_with(call_type_id: u32, registry: scale_info::PortableRegistry, extrinsic: NormalizedExtrinsic) -> DecodeContext {
    let metadata = DecodedMetadata {
        registry,
        pallets: Vec::new(),
        extrinsic,
    };
    let _ = call_type_id;
    DecodeContext::new(RuntimeCoordinate::new("test", 1), Arc::new(metadata))
}

fn build_registry() -> (u32, u32, scale_info::PortableRegistry) {
    let mut registry = scale_info::Registry::new();
    let call_id = registry.register_type(&scale_info::MetaType::new::<Call>()).id;
    let unit_id = registry.register_type(&scale_info::MetaType::new::<()>()).id;
    (call_id, unit_id, registry.into())
}

#[test]
fn decodes_unsigned_extrinsic() {
    let (call_id, _unit_id, registry) = build_registry();
    let ctx = context_with(
        call_id,
        registry,
        NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: None,
            call_type_id: call_id,
            signature_type_id: None,
            extra_type_id: None,
            signed_extensions: Vec::new(),
        },
    );

    let mut bytes = vec![4u8]; // version 4, unsigned (top bit clear)
    bytes.extend(Call::DoThing { amount: 7 }.encode());

    let decoded = decode_extrinsic(&bytes, &ctx).expect("decode should succeed");
    assert_eq!(decoded["version"], json!(4));
    assert_eq!(decoded["signed"], json!(false));
    assert!(decoded["address"].is_null());
}

#[test]
fn decodes_signed_extrinsic_with_unit_fields() {
    let (call_id, unit_id, registry) = build_registry();
    let ctx = context_with(
        call_id,
        registry,
        NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: Some(unit_id),
            call_type_id: call_id,
            signature_type_id: Some(unit_id),
            extra_type_id: Some(unit_id),
            signed_extensions: Vec::new(),
        },
    );

    let mut bytes = vec![4u8 | SIGNED_MASK];
    bytes.extend(Call::DoThing { amount: 99 }.encode());

    let decoded = decode_extrinsic(&bytes, &ctx).expect("decode should succeed");
    assert_eq!(decoded["signed"], json!(true));
    assert!(!decoded["address"].is_null());
}

#[test]
fn rejects_empty_bytes() {
    let (call_id, _unit_id, registry) = build_registry();
    let ctx = context_with(
        call_id,
        registry,
        NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: None,
            call_type_id: call_id,
            signature_type_id: None,
            extra_type_id: None,
            signed_extensions: Vec::new(),
        },
    );
    let err = decode_extrinsic(&[], &ctx).unwrap_err();
    assert!(matches!(err, ExtrinsicDecodeError::Empty));
}

#[test]
fn signed_extrinsic_without_address_type_errors() {
    let (call_id, _unit_id, registry) = build_registry();
    let ctx = context_with(
        call_id,
        registry,
        NormalizedExtrinsic {
            versions: vec![4],
            address_type_id: None,
            call_type_id: call_id,
            signature_type_id: None,
            extra_type_id: None,
            signed_extensions: Vec::new(),
        },
    );
    let bytes = vec![4u8 | SIGNED_MASK];
    let err = decode_extrinsic(&bytes, &ctx).unwrap_err();
    assert!(matches!(err, ExtrinsicDecodeError::MissingSignedTypeId("Address")));
}
