// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw (node) layer: rows copied verbatim from the live node, append-only
//! once written. Every table here is keyed so that a block's primary key
//! is reused unchanged by its [`crate::codec`] counterpart.

use harvester_core::{BlockHash, BlockNumber};
use serde::{Deserialize, Serialize};

/// key = hash. `block_number` is unique; `block_number -> hash` is 1:1
/// within the persisted range.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeBlockHeader {
    pub hash: BlockHash,
    pub parent_hash: BlockHash,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    /// Compact-encoded block number bytes, as received from the node.
    pub number: Vec<u8>,
    pub block_number: BlockNumber,
    pub count_extrinsics: i32,
    pub count_logs: i32,
}

/// key = (block_hash, extrinsic_idx).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeBlockExtrinsic {
    pub block_hash: BlockHash,
    pub extrinsic_idx: i32,
    pub block_number: BlockNumber,
    /// Compact<u32> length prefix, exactly as encoded.
    pub length_bytes: Vec<u8>,
    pub data: Vec<u8>,
    /// blake2b-256 over `length_bytes || data`.
    pub hash: BlockHash,
}

/// key = (block_hash, log_idx).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeBlockHeaderDigestLog {
    pub block_hash: BlockHash,
    pub log_idx: i32,
    pub block_number: BlockNumber,
    pub data: Vec<u8>,
}

/// key = (block_hash, storage_key). `data` is `None` when the key was
/// absent at this block — this is a normal outcome, not
/// [`harvester_core::HarvesterError::StorageMissing`]; that variant is
/// reserved for lookups where an explicit decode path requires a value.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeBlockStorage {
    pub block_hash: BlockHash,
    pub storage_key: Vec<u8>,
    pub block_number: BlockNumber,
    pub data: Option<Vec<u8>>,
    pub pallet: String,
    pub name: String,
    pub complete: bool,
}

/// key = hash.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeBlockRuntime {
    pub hash: BlockHash,
    pub block_number: BlockNumber,
    pub spec_name: String,
    pub spec_version: i32,
}

/// key = (impl_name, impl_version, spec_name, spec_version, authoring_version).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeRuntime {
    pub impl_name: String,
    pub impl_version: i32,
    pub spec_name: String,
    pub spec_version: i32,
    pub authoring_version: i32,
    pub apis: serde_json::Value,
    pub code: Option<Vec<u8>>,
}

/// key = (spec_name, spec_version). Raw metadata blob as returned by
/// `state_getMetadata`, captured at whichever block hash first needed it.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub spec_name: String,
    pub spec_version: i32,
    pub block_hash: BlockHash,
    pub data: Vec<u8>,
}

#[cfg(test)]
#[path = "raw_tests.rs"]
mod tests;
