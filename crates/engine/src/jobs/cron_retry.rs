// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cron-Retry job (§4.7): re-attempts codec rows left in [`DecodeState::Retry`]
//! by the ScaleDecode job, up to [`RETRY_LIMIT`] rows per kind per pass.
//! A row that fails again past [`harvester_core::MAX_DECODE_ATTEMPTS`]
//! transitions to [`DecodeState::FailedExhausted`] and is never retried again.

use std::sync::Arc;

use harvester_core::{BlockHash, HarvesterError, HarvesterResult, Interrupt, RuntimeCoordinate};
use harvester_decode::digest::decode_digest_log;
use harvester_decode::extrinsic::decode_extrinsic;
use harvester_decode::storage_entry::decode_storage_value;
use harvester_decode::{DecodeContext, MetadataCache};
use harvester_storage::codec::{CodecBlockExtrinsic, CodecBlockHeaderDigestLog, CodecBlockStorage};
use harvester_storage::Store;
use tracing::warn;

/// Maximum rows re-attempted per kind per pass, per §4.7.
pub const RETRY_LIMIT: i64 = 1000;

/// Runs one pass of the Cron-Retry job across all three kinds.
pub async fn run(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    retry_extrinsics(store, cache, interrupt).await?;
    if interrupt.is_set() {
        return Ok(());
    }
    retry_logs(store, cache, interrupt).await?;
    if interrupt.is_set() {
        return Ok(());
    }
    retry_storage(store, cache, interrupt).await?;
    Ok(())
}

async fn decode_context_for(store: &Arc<dyn Store>, cache: &MetadataCache, block_hash: BlockHash) -> HarvesterResult<Option<DecodeContext>> {
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
    let ctx = cache
        .get_or_insert(coord.clone(), &raw)
        .map_err(|e| HarvesterError::StorageMissing(format!("metadata for {coord:?} failed to parse: {e}")))?;
    Ok(Some(ctx))
}

async fn retry_extrinsics(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    for row in store.retry_codec_extrinsics(RETRY_LIMIT).await? {
        if interrupt.is_set() {
            return Ok(());
        }
        let Some(ctx) = decode_context_for(store, cache, row.block_hash).await? else {
            continue;
        };
        let Some(raw) = store
            .list_block_extrinsics(row.block_hash)
            .await?
            .into_iter()
            .find(|e| e.extrinsic_idx == row.extrinsic_idx)
        else {
            continue;
        };

        let (data, success) = match decode_extrinsic(&raw.data, &ctx) {
            Ok(data) => (data, true),
            Err(e) => {
                warn!(block_hash = %row.block_hash, extrinsic_idx = row.extrinsic_idx, error = %e, "extrinsic retry failed");
                (row.data, false)
            }
        };
        let (state, attempts) = row.state.advance_retry(row.attempts as u32, success);
        store
            .upsert_codec_extrinsic(&CodecBlockExtrinsic {
                data,
                state,
                attempts: attempts as i32,
                ..row
            })
            .await?;
        store.commit().await?;
    }
    Ok(())
}

async fn retry_logs(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    for row in store.retry_codec_logs(RETRY_LIMIT).await? {
        if interrupt.is_set() {
            return Ok(());
        }
        let Some(ctx) = decode_context_for(store, cache, row.block_hash).await? else {
            continue;
        };
        let Some(raw) = store
            .list_block_logs(row.block_hash)
            .await?
            .into_iter()
            .find(|l| l.log_idx == row.log_idx)
        else {
            continue;
        };

        let (data, success) = match decode_digest_log(&raw.data, &ctx) {
            Ok(data) => (data, true),
            Err(e) => {
                warn!(block_hash = %row.block_hash, log_idx = row.log_idx, error = %e, "digest log retry failed");
                (row.data, false)
            }
        };
        let (state, attempts) = row.state.advance_retry(row.attempts as u32, success);
        store
            .upsert_codec_log(&CodecBlockHeaderDigestLog {
                data,
                state,
                attempts: attempts as i32,
                ..row
            })
            .await?;
        store.commit().await?;
    }
    Ok(())
}

async fn retry_storage(store: &Arc<dyn Store>, cache: &MetadataCache, interrupt: &Interrupt) -> HarvesterResult<()> {
    for row in store.retry_codec_storage(RETRY_LIMIT).await? {
        if interrupt.is_set() {
            return Ok(());
        }
        let Some(ctx) = decode_context_for(store, cache, row.block_hash).await? else {
            continue;
        };
        let Some(raw) = store.get_block_storage(row.block_hash, &row.storage_key).await? else {
            continue;
        };
        let Some(bytes) = &raw.data else {
            continue;
        };

        let (data, success) = match decode_storage_value(bytes, &raw.pallet, &raw.name, &ctx) {
            Ok(data) => (data, true),
            Err(e) => {
                warn!(block_hash = %row.block_hash, error = %e, "storage retry failed");
                (row.data, false)
            }
        };
        let (state, attempts) = row.state.advance_retry(row.attempts as u32, success);
        store
            .upsert_codec_storage(&CodecBlockStorage {
                data,
                state,
                attempts: attempts as i32,
                ..row
            })
            .await?;
        store.commit().await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "cron_retry_tests.rs"]
mod tests;
