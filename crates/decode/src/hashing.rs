// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The two hashes the harvester computes itself rather than asking the
//! node for: an extrinsic's blake2b-256 identity, and a storage map's
//! two-part `twox128(pallet) || twox128(name)` key prefix.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use harvester_core::BlockHash;

type Blake2b256 = Blake2b<U32>;

/// blake2b-256 over `length_bytes || data`, per §4.2 step 4.
pub fn extrinsic_hash(length_bytes: &[u8], data: &[u8]) -> BlockHash {
    let mut hasher = Blake2b256::new();
    hasher.update(length_bytes);
    hasher.update(data);
    let digest = hasher.finalize();
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&digest);
    BlockHash(buf)
}

/// The two-part storage prefix `twox128(pallet) || twox128(name)` that
/// addresses a pallet's `Plain`/`Map` storage entry, per §4.3 step 2.
pub fn storage_key_prefix(pallet: &str, name: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(32);
    key.extend_from_slice(&sp_crypto_hashing::twox_128(pallet.as_bytes()));
    key.extend_from_slice(&sp_crypto_hashing::twox_128(name.as_bytes()));
    key
}

#[cfg(test)]
#[path = "hashing_tests.rs"]
mod tests;
