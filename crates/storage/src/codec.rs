// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Codec (decoded) layer: mirrors [`crate::raw`] using the same primary
//! keys, plus the decoded value tree and the [`DecodeState`] lifecycle.

use harvester_core::{BlockHash, BlockNumber, DecodeState, ScaleType};
use serde::{Deserialize, Serialize};

/// key = (block_hash, extrinsic_idx), same as [`crate::raw::NodeBlockExtrinsic`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodecBlockExtrinsic {
    pub block_hash: BlockHash,
    pub extrinsic_idx: i32,
    pub block_number: BlockNumber,
    pub scale_type: String,
    pub data: serde_json::Value,
    pub state: DecodeState,
    pub attempts: i32,
}

/// key = (block_hash, log_idx), same as [`crate::raw::NodeBlockHeaderDigestLog`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodecBlockHeaderDigestLog {
    pub block_hash: BlockHash,
    pub log_idx: i32,
    pub block_number: BlockNumber,
    pub scale_type: String,
    pub data: serde_json::Value,
    pub state: DecodeState,
    pub attempts: i32,
}

/// key = (block_hash, storage_key), same as [`crate::raw::NodeBlockStorage`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodecBlockStorage {
    pub block_hash: BlockHash,
    pub storage_key: Vec<u8>,
    pub block_number: BlockNumber,
    pub scale_type: String,
    pub data: serde_json::Value,
    pub state: DecodeState,
    pub attempts: i32,
}

/// key = (block_hash, event_idx). Derived by fanning out the decoded
/// `System.Events` storage value; `event_idx` is rendered as a
/// `0x`-prefixed 4-hex-character string to match the wire convention
/// used for extrinsic/call indices elsewhere in the catalog.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodecBlockEvent {
    pub block_hash: BlockHash,
    pub event_idx: String,
    pub block_number: BlockNumber,
    pub extrinsic_idx: Option<i32>,
    pub pallet: String,
    pub event_name: String,
    pub data: serde_json::Value,
}

impl CodecBlockEvent {
    pub fn format_event_idx(idx: u16) -> String {
        format!("0x{:04x}", idx)
    }
}

/// key = (spec_name, spec_version), same as [`crate::raw::NodeMetadata`].
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct CodecMetadata {
    pub spec_name: String,
    pub spec_version: i32,
    pub data: serde_json::Value,
}

/// Helper shared by the decode runtime when translating a
/// [`harvester_core::ScaleType`] into a stored `scale_type` column.
pub fn scale_type_column(ty: &ScaleType) -> String {
    ty.as_str().to_string()
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
