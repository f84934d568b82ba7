// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn extrinsic_hash_is_stable_and_covers_both_inputs() {
    let a = extrinsic_hash(&[0x04], &[0xab, 0xcd]);
    let b = extrinsic_hash(&[0x04], &[0xab, 0xcd]);
    assert_eq!(a, b);

    let different = extrinsic_hash(&[0x08], &[0xab, 0xcd]);
    assert_ne!(a, different);
}

#[test]
fn storage_key_prefix_is_32_bytes_and_stable() {
    let key = storage_key_prefix("System", "Events");
    assert_eq!(key.len(), 32);
    assert_eq!(key, storage_key_prefix("System", "Events"));
}

#[test]
fn storage_events_key_matches_compile_time_constant() {
    let key = storage_key_prefix("System", "Events");
    let full = format!("0x{}", hex::encode(&key));
    assert_eq!(full, crate::STORAGE_KEY_EVENTS);
}
