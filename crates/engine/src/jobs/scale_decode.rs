// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ScaleDecode job (§4.6): batch-decodes raw rows into codec rows across
//! three independent kinds (extrinsics, logs, storage), each windowed to
//! `yield_per` blocks per run.

use std::sync::Arc;

use harvester_core::{BlockHash, BlockNumber, DecodeState, HarvesterError, HarvesterResult, Interrupt, RuntimeCoordinate};
use harvester_decode::events::decode_events;
use harvester_decode::extrinsic::decode_extrinsic;
use harvester_decode::digest::decode_digest_log;
use harvester_decode::storage_entry::decode_storage_value;
use harvester_decode::{DecodeContext, MetadataCache, STORAGE_KEY_EVENTS};
use harvester_storage::codec::{CodecBlockEvent, CodecBlockExtrinsic, CodecBlockHeaderDigestLog, CodecBlockStorage};
use harvester_storage::status_keys;
use harvester_storage::Store;
use tracing::warn;

/// Per-run batch size for each of the three kinds, carried verbatim from
/// the Python implementation's `yield_per` constant (§9).
pub const YIELD_PER: i64 = 1000;

/// Runs one pass of the ScaleDecode job over all three row kinds.
pub async fn run(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    let extrinsics_end = decode_extrinsics(store, cache, interrupt).await?;
    if interrupt.is_set() {
        return Ok(());
    }
    let logs_end = decode_logs(store, cache, interrupt).await?;
    if interrupt.is_set() {
        return Ok(());
    }
    let storage_end = decode_storage(store, cache, interrupt).await?;

    // §9: a kind that processed no rows this cycle contributes `None`
    // to the watermark; if all three are `None` nothing is written.
    let candidates: Vec<BlockNumber> = [extrinsics_end, logs_end, storage_end].into_iter().flatten().collect();
    if let Some(watermark) = candidates.into_iter().min() {
        store
            .set_status(status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER, &watermark.to_string())
            .await?;
        store.commit().await?;
    }

    Ok(())
}

/// Computes `(min, max)` for one kind's decode window: `min` is the next
/// unprocessed block number, `max` is bounded by both the raw layer's
/// high watermark and `min + YIELD_PER`. Returns `None` when there is
/// nothing to do (`max < min`).
/// A fresh decode attempt's `(state, attempts)` pair, per
/// [`DecodeState::advance`].
fn fresh_state(success: bool) -> (DecodeState, i32) {
    let (state, attempts) = DecodeState::Fresh.advance(0, success);
    (state, attempts as i32)
}

fn window(codec_max: Option<BlockNumber>, raw_max: Option<BlockNumber>) -> Option<(BlockNumber, BlockNumber)> {
    let min = codec_max.map(|n| n + 1).unwrap_or(0);
    let raw_max = raw_max?;
    let max = raw_max.min(min + YIELD_PER - 1);
    if max < min {
        return None;
    }
    Some((min, max))
}

/// Looks up the runtime active at `block_hash` and hands back a decode
/// context for it, parsing metadata at most once per runtime coordinate
/// via `cache`. Returns `None` if the Retrieve-Runtime-State job has not
/// yet captured this block's runtime (decode has outrun state capture).
async fn decode_context_for(store: &Arc<dyn Store>, cache: &MetadataCache, block_hash: BlockHash) -> HarvesterResult<Option<DecodeContext>> {
    let Some(runtime) = store.get_block_runtime(block_hash).await? else {
        return Ok(None);
    };
    let coord = RuntimeCoordinate::new(runtime.spec_name.clone(), runtime.spec_version as u32);

    // `get_or_insert` only touches `raw` on a cache miss, so it is safe
    // to fetch the metadata row eagerly and let the cache decide.
    let raw = if cache.contains(&coord) {
        Vec::new()
    } else {
        match store.get_metadata(&coord).await? {
            Some(row) => row.data,
            None => return Ok(None),
        }
    };

    let ctx = cache
        .get_or_insert(coord.clone(), &raw)
        .map_err(|e| HarvesterError::StorageMissing(format!("metadata for {coord:?} failed to parse: {e}")))?;
    Ok(Some(ctx))
}

async fn decode_extrinsics(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<Option<BlockNumber>> {
    let Some((min, max)) = window(store.max_codec_extrinsic_block_number().await?, store.max_header_block_number().await?) else {
        return Ok(None);
    };

    let mut last_processed = None;
    for block_number in min..=max {
        if interrupt.is_set() {
            break;
        }
        let Some(header) = store.get_block_header_by_number(block_number).await? else {
            continue;
        };
        let Some(ctx) = decode_context_for(store, cache, header.hash).await? else {
            break;
        };

        for extrinsic in store.list_block_extrinsics(header.hash).await? {
            let (data, success) = match decode_extrinsic(&extrinsic.data, &ctx) {
                Ok(data) => (data, true),
                Err(e) => {
                    warn!(block_number, extrinsic_idx = extrinsic.extrinsic_idx, error = %e, "extrinsic decode failed, flagged for retry");
                    (serde_json::Value::Null, false)
                }
            };
            let (state, attempts) = fresh_state(success);
            store
                .upsert_codec_extrinsic(&CodecBlockExtrinsic {
                    block_hash: extrinsic.block_hash,
                    extrinsic_idx: extrinsic.extrinsic_idx,
                    block_number,
                    scale_type: "Extrinsic".to_string(),
                    data,
                    state,
                    attempts,
                })
                .await?;
        }

        if ctx.metadata.pallet_by_name("System").is_some() {
            if let Some(events_storage) = store.get_block_storage(header.hash, &events_key()).await? {
                if let Some(bytes) = events_storage.data {
                    if let Ok(decoded) = decode_events(&bytes, &ctx) {
                        persist_events(store, header.hash, block_number, decoded).await?;
                    }
                }
            }
        }

        store.commit().await?;
        last_processed = Some(block_number);
    }
    Ok(last_processed)
}

fn events_key() -> Vec<u8> {
    hex::decode(STORAGE_KEY_EVENTS.trim_start_matches("0x")).unwrap_or_default()
}

async fn persist_events(store: &Arc<dyn Store>, block_hash: BlockHash, block_number: BlockNumber, events: Vec<harvester_decode::events::DecodedEvent>) -> HarvesterResult<()> {
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

async fn decode_logs(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<Option<BlockNumber>> {
    let Some((min, max)) = window(store.max_codec_log_block_number().await?, store.max_header_block_number().await?) else {
        return Ok(None);
    };

    let mut last_processed = None;
    for block_number in min..=max {
        if interrupt.is_set() {
            break;
        }
        let Some(header) = store.get_block_header_by_number(block_number).await? else {
            continue;
        };
        let Some(ctx) = decode_context_for(store, cache, header.hash).await? else {
            break;
        };

        for log in store.list_block_logs(header.hash).await? {
            let (data, success) = match decode_digest_log(&log.data, &ctx) {
                Ok(data) => (data, true),
                Err(e) => {
                    warn!(block_number, log_idx = log.log_idx, error = %e, "digest log decode failed, flagged for retry");
                    (serde_json::Value::Null, false)
                }
            };
            let (state, attempts) = fresh_state(success);
            store
                .upsert_codec_log(&CodecBlockHeaderDigestLog {
                    block_hash: log.block_hash,
                    log_idx: log.log_idx,
                    block_number,
                    scale_type: "sp_runtime::generic::digest::DigestItem".to_string(),
                    data,
                    state,
                    attempts,
                })
                .await?;
        }
        store.commit().await?;
        last_processed = Some(block_number);
    }
    Ok(last_processed)
}

async fn decode_storage(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<Option<BlockNumber>> {
    let Some((min, max)) = window(store.max_codec_storage_block_number().await?, store.max_header_block_number().await?) else {
        return Ok(None);
    };

    let mut last_processed = None;
    for block_number in min..=max {
        if interrupt.is_set() {
            break;
        }
        let Some(header) = store.get_block_header_by_number(block_number).await? else {
            continue;
        };
        let Some(ctx) = decode_context_for(store, cache, header.hash).await? else {
            break;
        };

        for node_row in store.list_block_storage(header.hash).await? {
            let row = decode_one_storage_row(&ctx, node_row, block_number);
            store.upsert_codec_storage(&row).await?;
        }
        store.commit().await?;
        last_processed = Some(block_number);
    }
    Ok(last_processed)
}

fn decode_one_storage_row(ctx: &DecodeContext, node_row: harvester_storage::raw::NodeBlockStorage, block_number: BlockNumber) -> CodecBlockStorage {
    let scale_type = format!("{}.{}", node_row.pallet, node_row.name);

    // An absent value (deleted/never-set storage) decodes to `null` and
    // is always considered complete: there is nothing more to retry.
    let (data, success) = match &node_row.data {
        None => (serde_json::Value::Null, true),
        Some(bytes) => match decode_storage_value(bytes, &node_row.pallet, &node_row.name, ctx) {
            Ok(data) => (data, true),
            Err(e) => {
                warn!(block_number, error = %e, "storage decode failed, flagged for retry");
                (serde_json::Value::Null, false)
            }
        },
    };
    let (state, attempts) = fresh_state(success);

    CodecBlockStorage {
        block_hash: node_row.block_hash,
        storage_key: node_row.storage_key,
        block_number,
        scale_type,
        data,
        state,
        attempts,
    }
}

#[cfg(test)]
#[path = "scale_decode_tests.rs"]
mod tests;
