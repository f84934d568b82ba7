// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result payload shapes for the method set in [`crate::methods`]. Param
//! shapes are simple enough (a block hash, a block number) to pass as
//! bare `serde_json::Value` arrays at the call site; only results that
//! the caller destructures get a named type here.

use harvester_core::BlockHash;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockResult {
    pub block: BlockBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockBody {
    pub header: HeaderResult,
    pub extrinsics: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderResult {
    pub parent_hash: BlockHash,
    #[serde(rename = "number")]
    pub number_hex: String,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    pub digest: DigestResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestResult {
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeVersionResult {
    pub spec_name: String,
    pub impl_name: String,
    pub authoring_version: u32,
    pub spec_version: u32,
    pub impl_version: u32,
    #[serde(default)]
    pub apis: Vec<(String, u32)>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageKeysPagedResult(pub Vec<String>);

impl HeaderResult {
    /// Parses the hex-encoded `number` field into a plain block number.
    /// The node returns this as a `0x`-prefixed hex string of the raw
    /// big-endian number, not the Compact-SCALE-encoded bytes stored
    /// alongside it in `NodeBlockHeader::number`.
    pub fn block_number(&self) -> Result<i64, std::num::ParseIntError> {
        let s = self.number_hex.strip_prefix("0x").unwrap_or(&self.number_hex);
        i64::from_str_radix(s, 16)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
