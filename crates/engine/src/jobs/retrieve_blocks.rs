// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrieve-Blocks job (§4.2): mirrors headers/extrinsics/digest logs
//! from the live node into the raw layer, up to the finalized head.

use std::sync::Arc;

use harvester_core::{BlockHash, HarvesterError, HarvesterResult, Interrupt};
use harvester_decode::extrinsic_hash;
use harvester_rpc::NodeRpc;
use harvester_storage::raw::{NodeBlockExtrinsic, NodeBlockHeader, NodeBlockHeaderDigestLog};
use harvester_storage::{status_keys, Store};
use parity_scale_codec::{Compact, Decode, Encode};
use tracing::{info, warn};

use crate::metrics::Metrics;

/// Runs one pass of the Retrieve-Blocks job: ingests every block from
/// the next unprocessed number up to the finalized head, committing and
/// checking `interrupt` after each block.
pub async fn run(
    store: &Arc<dyn Store>,
    rpc: &Arc<dyn NodeRpc>,
    interrupt: &Interrupt,
    metrics: Option<&Metrics>,
) -> HarvesterResult<()> {
    let finalized_hex = rpc.chain_get_finalised_head().await?;
    let finalized_hash = BlockHash::from_hex(&finalized_hex).map_err(|e| HarvesterError::Config(e.to_string()))?;
    let finalized_header = rpc.chain_get_header(&finalized_hex).await?;
    let finalized_block = finalized_header
        .block_number()
        .map_err(|e| HarvesterError::Config(format!("unparseable finalized header number: {e}")))?;

    store.set_status(status_keys::CHAIN_FINALIZED_HEAD, &finalized_hash.to_hex()).await?;

    let next = match store.max_header_block_number().await? {
        Some(n) => n + 1,
        None => 0,
    };

    for block_number in next..=finalized_block {
        if interrupt.is_set() {
            info!(block_number, "interrupt observed, stopping retrieve-blocks");
            return Ok(());
        }

        let started = std::time::Instant::now();
        ingest_block(store, rpc, block_number).await?;
        if let Some(metrics) = metrics {
            metrics.observe_block_latency_ms(started.elapsed().as_secs_f64() * 1000.0);
        }

        store
            .set_status(status_keys::PROCESS_BLOCKS_MAX_BLOCKNUMBER, &block_number.to_string())
            .await?;
        store.commit().await?;
    }

    Ok(())
}

async fn ingest_block(store: &Arc<dyn Store>, rpc: &Arc<dyn NodeRpc>, block_number: i64) -> HarvesterResult<()> {
    let block_hash_hex = rpc.chain_get_block_hash(block_number).await?;
    let block_hash = BlockHash::from_hex(&block_hash_hex).map_err(|e| HarvesterError::Config(e.to_string()))?;
    let block = rpc.chain_get_block(&block_hash_hex).await?;

    let number = Compact(block_number as u32).encode();

    store
        .insert_block_header(&NodeBlockHeader {
            hash: block_hash,
            parent_hash: block.block.header.parent_hash,
            state_root: block.block.header.state_root,
            extrinsics_root: block.block.header.extrinsics_root,
            number,
            block_number,
            count_extrinsics: block.block.extrinsics.len() as i32,
            count_logs: block.block.header.digest.logs.len() as i32,
        })
        .await?;

    let mut extrinsics = Vec::with_capacity(block.block.extrinsics.len());
    for (idx, hex_str) in block.block.extrinsics.iter().enumerate() {
        let raw = hex::decode(hex_str.trim_start_matches("0x")).map_err(|e| HarvesterError::Config(e.to_string()))?;
        let (length_bytes, data) = split_compact_length_prefix(&raw)?;
        let hash = extrinsic_hash(&length_bytes, &data);
        extrinsics.push(NodeBlockExtrinsic {
            block_hash,
            extrinsic_idx: idx as i32,
            block_number,
            length_bytes,
            data,
            hash,
        });
    }
    store.insert_block_extrinsics(&extrinsics).await?;

    let logs = block
        .block
        .header
        .digest
        .logs
        .iter()
        .enumerate()
        .map(|(idx, hex_str)| {
            let data = hex::decode(hex_str.trim_start_matches("0x")).map_err(|e| HarvesterError::Config(e.to_string()))?;
            Ok(NodeBlockHeaderDigestLog {
                block_hash,
                log_idx: idx as i32,
                block_number,
                data,
            })
        })
        .collect::<HarvesterResult<Vec<_>>>()?;
    store.insert_block_logs(&logs).await?;

    Ok(())
}

/// Splits `length || payload` by decoding the leading `Compact<u32>`
/// length prefix and returning the exact bytes it occupied alongside the
/// remaining payload, per §4.2 step 4.
fn split_compact_length_prefix(raw: &[u8]) -> HarvesterResult<(Vec<u8>, Vec<u8>)> {
    let mut cursor = raw;
    let before = cursor.len();
    Compact::<u32>::decode(&mut cursor).map_err(|e| HarvesterError::Config(format!("malformed extrinsic length prefix: {e}")))?;
    let consumed = before - cursor.len();
    if consumed > raw.len() {
        warn!(consumed, len = raw.len(), "compact length prefix longer than extrinsic body");
    }
    Ok((raw[..consumed].to_vec(), raw[consumed..].to_vec()))
}

#[cfg(test)]
#[path = "retrieve_blocks_tests.rs"]
mod tests;
