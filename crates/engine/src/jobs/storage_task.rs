// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage-Task Worker (§4.8): consumes the oldest incomplete
//! [`HarvesterStorageTask`], resolves its block list, and persists raw
//! and decoded storage rows for either a single key or a paged
//! key-prefix scan.

use std::sync::Arc;

use harvester_core::{BlockHash, DecodeState, HarvesterError, HarvesterResult, Interrupt, RuntimeCoordinate};
use harvester_decode::events::decode_events;
use harvester_decode::storage_entry::decode_storage_value;
use harvester_decode::{DecodeContext, MetadataCache, STORAGE_KEY_EVENTS};
use harvester_rpc::NodeRpc;
use harvester_storage::codec::{CodecBlockEvent, CodecBlockStorage};
use harvester_storage::control::{BlocksSpec, HarvesterStorageTask};
use harvester_storage::raw::NodeBlockStorage;
use harvester_storage::Store;
use tracing::{info, warn};

/// Keys requested per `state_getKeysPaged` call, per §4.8/§6.
pub const PAGE_SIZE: u32 = 1000;

/// Drains at most one queued storage task per call, per §4.1's
/// one-stage-per-iteration supervisor loop.
pub async fn run(store: &Arc<dyn Store>, rpc: &Arc<dyn NodeRpc>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    let Some(task) = store.next_storage_task().await? else {
        return Ok(());
    };

    let blocks: BlocksSpec = serde_json::from_value(task.blocks.clone()).map_err(|e| HarvesterError::Config(e.to_string()))?;

    for block_number in blocks.block_numbers() {
        if interrupt.is_set() {
            info!(task_id = task.id.as_str(), block_number, "interrupt observed mid-task, leaving task incomplete");
            return Ok(());
        }
        let block_hash_hex = rpc.chain_get_block_hash(block_number).await?;
        let block_hash = BlockHash::from_hex(&block_hash_hex).map_err(|e| HarvesterError::Config(e.to_string()))?;

        if let Some(key) = &task.storage_key {
            scan_one_key(store, rpc, cache, block_hash, &block_hash_hex, block_number, key, &task).await?;
        } else if let Some(prefix) = &task.storage_key_prefix {
            scan_prefix(store, rpc, cache, block_hash, &block_hash_hex, block_number, prefix, &task).await?;
        }
        store.commit().await?;
    }

    store.complete_storage_task(task.id.as_str()).await?;
    store.commit().await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn scan_one_key(
    store: &Arc<dyn Store>,
    rpc: &Arc<dyn NodeRpc>,
    cache: &MetadataCache,
    block_hash: BlockHash,
    block_hash_hex: &str,
    block_number: i64,
    key: &[u8],
    task: &HarvesterStorageTask,
) -> HarvesterResult<()> {
    let value_hex = rpc.state_get_storage_at(&format!("0x{}", hex::encode(key)), block_hash_hex).await?;
    persist_storage_row(store, cache, block_hash, block_number, key.to_vec(), value_hex, task).await
}

#[allow(clippy::too_many_arguments)]
async fn scan_prefix(
    store: &Arc<dyn Store>,
    rpc: &Arc<dyn NodeRpc>,
    cache: &MetadataCache,
    block_hash: BlockHash,
    block_hash_hex: &str,
    block_number: i64,
    prefix: &[u8],
    task: &HarvesterStorageTask,
) -> HarvesterResult<()> {
    let prefix_hex = format!("0x{}", hex::encode(prefix));
    let mut start_key = prefix_hex.clone();

    loop {
        let keys = rpc.state_get_keys_paged(&prefix_hex, PAGE_SIZE, &start_key, block_hash_hex).await?;
        if keys.is_empty() {
            break;
        }
        for key_hex in &keys {
            let key = hex::decode(key_hex.trim_start_matches("0x")).map_err(|e| HarvesterError::Config(e.to_string()))?;
            let value_hex = rpc.state_get_storage_at(key_hex, block_hash_hex).await?;
            persist_storage_row(store, cache, block_hash, block_number, key, value_hex, task).await?;
        }
        if (keys.len() as u32) < PAGE_SIZE {
            break;
        }
        let Some(last) = keys.last() else {
            break;
        };
        start_key = last.clone();
    }
    Ok(())
}

async fn persist_storage_row(
    store: &Arc<dyn Store>,
    cache: &MetadataCache,
    block_hash: BlockHash,
    block_number: i64,
    key: Vec<u8>,
    value_hex: Option<String>,
    task: &HarvesterStorageTask,
) -> HarvesterResult<()> {
    let data = value_hex.map(|v| hex::decode(v.trim_start_matches("0x"))).transpose().map_err(|e| HarvesterError::Config(e.to_string()))?;
    let is_events_key = key == events_key();
    let pallet = task.storage_pallet.clone();
    let name = task.storage_name.clone();

    store
        .insert_block_storage(&NodeBlockStorage {
            block_hash,
            storage_key: key.clone(),
            block_number,
            data: data.clone(),
            pallet: pallet.clone(),
            name: name.clone(),
            complete: true,
        })
        .await?;

    if is_events_key {
        if let Some(bytes) = &data {
            fan_out_events(store, cache, block_hash, block_number, bytes).await?;
        }
    }

    if !pallet.is_empty() && !name.is_empty() {
        decode_and_persist_storage(store, cache, block_hash, block_number, key, &pallet, &name, data).await?;
    }

    Ok(())
}

fn events_key() -> Vec<u8> {
    hex::decode(STORAGE_KEY_EVENTS.trim_start_matches("0x")).unwrap_or_default()
}

/// Loads the [`DecodeContext`] for the runtime active at `block_hash`,
/// parsing and caching its metadata on first use. `Ok(None)` means the
/// runtime/metadata rows aren't available yet — callers skip decode
/// work for this block rather than treat it as fatal.
async fn context_for_block(store: &Arc<dyn Store>, cache: &MetadataCache, block_hash: BlockHash, block_number: i64) -> HarvesterResult<Option<DecodeContext>> {
    let Some(runtime) = store.get_block_runtime(block_hash).await? else {
        return Ok(None);
    };
    let coord = RuntimeCoordinate::new(runtime.spec_name.clone(), runtime.spec_version as u32);
    let raw = if cache.contains(&coord) {
        Vec::new()
    } else {
        match store.get_metadata(&coord).await? {
            Some(row) => row.data,
            None => return Ok(None),
        }
    };
    match cache.get_or_insert(coord, &raw) {
        Ok(ctx) => Ok(Some(ctx)),
        Err(e) => {
            warn!(block_number, error = %e, "metadata failed to parse, skipping decode");
            Ok(None)
        }
    }
}

async fn fan_out_events(store: &Arc<dyn Store>, cache: &MetadataCache, block_hash: BlockHash, block_number: i64, bytes: &[u8]) -> HarvesterResult<()> {
    let Some(ctx) = context_for_block(store, cache, block_hash, block_number).await? else {
        return Ok(());
    };

    let events = match decode_events(bytes, &ctx) {
        Ok(events) => events,
        Err(e) => {
            warn!(block_number, error = %e, "events fan-out skipped, decode failed");
            return Ok(());
        }
    };

    let rows: Vec<CodecBlockEvent> = events
        .into_iter()
        .map(|e| CodecBlockEvent {
            block_hash,
            event_idx: CodecBlockEvent::format_event_idx(e.event_idx),
            block_number,
            extrinsic_idx: e.extrinsic_idx,
            pallet: e.pallet,
            event_name: e.event_name,
            data: e.data,
        })
        .collect();
    store.insert_codec_events(&rows).await
}

/// Decodes a discovered key's value against the task's declared
/// `(pallet, storage_name)` and persists it as a [`CodecBlockStorage`]
/// row, mirroring the ScaleDecode job's per-row decode (§4.5/§4.6) so a
/// storage task's output is queryable the same way as a cron capture's.
async fn decode_and_persist_storage(
    store: &Arc<dyn Store>,
    cache: &MetadataCache,
    block_hash: BlockHash,
    block_number: i64,
    key: Vec<u8>,
    pallet: &str,
    name: &str,
    data: Option<Vec<u8>>,
) -> HarvesterResult<()> {
    let scale_type = format!("{pallet}.{name}");

    let (value, success) = match &data {
        None => (serde_json::Value::Null, true),
        Some(bytes) => {
            let Some(ctx) = context_for_block(store, cache, block_hash, block_number).await? else {
                return Ok(());
            };
            match decode_storage_value(bytes, pallet, name, &ctx) {
                Ok(value) => (value, true),
                Err(e) => {
                    warn!(block_number, error = %e, "storage decode failed, flagged for retry");
                    (serde_json::Value::Null, false)
                }
            }
        }
    };
    let (state, attempts) = DecodeState::Fresh.advance(0, success);

    store
        .upsert_codec_storage(&CodecBlockStorage {
            block_hash,
            storage_key: key,
            block_number,
            scale_type,
            data: value,
            state,
            attempts: attempts as i32,
        })
        .await
}

#[cfg(test)]
#[path = "storage_task_tests.rs"]
mod tests;
