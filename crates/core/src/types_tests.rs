// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn block_hash_hex_round_trip() {
    let hex_str = format!("0x{}", "ab".repeat(32));
    let hash = BlockHash::from_hex(&hex_str).unwrap();
    assert_eq!(hash.to_hex(), hex_str);
}

#[test]
fn block_hash_accepts_without_0x_prefix() {
    let hex_str = "cd".repeat(32);
    let hash = BlockHash::from_hex(&hex_str).unwrap();
    assert_eq!(hash.to_hex(), format!("0x{}", hex_str));
}

#[test]
fn block_hash_rejects_bad_length() {
    assert!(BlockHash::from_hex("0xabcd").is_err());
}

#[test]
fn block_hash_serde_round_trip() {
    let hex_str = format!("0x{}", "11".repeat(32));
    let hash = BlockHash::from_hex(&hex_str).unwrap();
    let json = serde_json::to_string(&hash).unwrap();
    let back: BlockHash = serde_json::from_str(&json).unwrap();
    assert_eq!(hash, back);
}

#[test]
fn runtime_coordinate_display() {
    let coord = RuntimeCoordinate::new("kusama", 9430);
    assert_eq!(coord.to_string(), "kusama#9430");
}

#[test]
fn runtime_coordinate_equality_is_structural() {
    let a = RuntimeCoordinate::new("kusama", 9430);
    let b = RuntimeCoordinate::new("kusama", 9430);
    let c = RuntimeCoordinate::new("kusama", 9431);
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn scale_type_from_str() {
    let t: ScaleType = "Extrinsic".into();
    assert_eq!(t.as_str(), "Extrinsic");
    assert_eq!(t.to_string(), "Extrinsic");
}
