// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decodes a storage value given the pallet and storage item name that
//! produced it. The storage *key* is never decoded here: callers already
//! know which pallet/item they asked for (from a [`harvester_storage`]
//! cron or task row), and the hashed key components aren't needed to make
//! sense of the value bytes.

use thiserror::Error;

use crate::context::DecodeContext;
use crate::metadata::{NormalizedStorageEntry, StorageShapeMeta};
use crate::value::{decode_to_json, ValueError};

#[derive(Debug, Error)]
pub enum StorageDecodeError {
    #[error("pallet '{0}' not found in this runtime's metadata")]
    PalletNotFound(String),
    #[error("storage item '{pallet}.{name}' not found in this runtime's metadata")]
    EntryNotFound { pallet: String, name: String },
    #[error(transparent)]
    Value(#[from] ValueError),
}

pub fn find_entry<'a>(
    ctx: &'a DecodeContext,
    pallet: &str,
    name: &str,
) -> Result<&'a NormalizedStorageEntry, StorageDecodeError> {
    let pallet_meta = ctx
        .metadata
        .pallet_by_name(pallet)
        .ok_or_else(|| StorageDecodeError::PalletNotFound(pallet.to_string()))?;
    pallet_meta
        .storage
        .iter()
        .find(|entry| entry.name == name)
        .ok_or_else(|| StorageDecodeError::EntryNotFound {
            pallet: pallet.to_string(),
            name: name.to_string(),
        })
}

/// Decodes a present storage value. Absent ("storage missing") values are
/// a harvester-engine concern, not a decode concern, and never reach here.
pub fn decode_storage_value(
    bytes: &[u8],
    pallet: &str,
    name: &str,
    ctx: &DecodeContext,
) -> Result<serde_json::Value, StorageDecodeError> {
    let entry = find_entry(ctx, pallet, name)?;
    Ok(decode_to_json(bytes, entry.value_type_id, ctx.registry())?)
}

pub fn is_map(entry: &NormalizedStorageEntry) -> bool {
    matches!(entry.shape, StorageShapeMeta::Map)
}

#[cfg(test)]
#[path = "storage_entry_tests.rs"]
mod tests;
