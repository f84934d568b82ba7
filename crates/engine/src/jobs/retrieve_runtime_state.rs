// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retrieve-Runtime-State job (§4.3): per-block runtime version capture,
//! cron-scheduled storage snapshots, and first-sight metadata/catalog
//! ingestion. Archive-only, per §4.1/§5.

use std::sync::Arc;

use harvester_core::{HarvesterError, HarvesterResult, Interrupt, RuntimeCoordinate};
use harvester_decode::catalog_builder::build_catalog;
use harvester_decode::{storage_key_prefix, DecodedMetadata, MetadataCache};
use harvester_rpc::NodeRpc;
use harvester_storage::raw::{NodeBlockRuntime, NodeBlockStorage, NodeMetadata, NodeRuntime};
use harvester_storage::{status_keys, Store};
use tracing::info;

/// Runs one pass of the Retrieve-Runtime-State job. `cache` is shared
/// with the ScaleDecode/Cron-Retry jobs so a metadata blob is parsed
/// exactly once across the whole process.
pub async fn run(
    store: &Arc<dyn Store>,
    rpc: &Arc<dyn NodeRpc>,
    cache: &MetadataCache,
    interrupt: &Interrupt,
) -> HarvesterResult<()> {
    let next = match store.max_runtime_block_number().await? {
        Some(n) => n + 1,
        None => 0,
    };
    let max_header = match store.max_header_block_number().await? {
        Some(n) => n,
        None => return Ok(()),
    };

    let crons = store.list_active_storage_crons().await?;

    for block_number in next..=max_header {
        if interrupt.is_set() {
            info!(block_number, "interrupt observed, stopping retrieve-runtime-state");
            return Ok(());
        }

        let Some(header) = store.get_block_header_by_number(block_number).await? else {
            break;
        };
        let block_hash_hex = header.hash.to_hex();

        let version = rpc.chain_get_runtime_version(&block_hash_hex).await?;
        store
            .insert_block_runtime(&NodeBlockRuntime {
                hash: header.hash,
                block_number,
                spec_name: version.spec_name.clone(),
                spec_version: version.spec_version as i32,
            })
            .await?;

        for cron in &crons {
            if !cron.fires_at(block_number) {
                continue;
            }
            let prefix = match &cron.storage_key {
                Some(key) => key.clone(),
                None => {
                    let key = storage_key_prefix(&cron.pallet, &cron.storage_name);
                    store.cache_storage_cron_key(cron.id.as_str(), &key).await?;
                    key
                }
            };
            let value_hex = rpc
                .state_get_storage_at(&format!("0x{}", hex::encode(&prefix)), &block_hash_hex)
                .await?;
            let data = value_hex
                .map(|hex_str| hex::decode(hex_str.trim_start_matches("0x")))
                .transpose()
                .map_err(|e| HarvesterError::Config(e.to_string()))?;
            store
                .insert_block_storage(&NodeBlockStorage {
                    block_hash: header.hash,
                    storage_key: prefix,
                    block_number,
                    data,
                    pallet: cron.pallet.clone(),
                    name: cron.storage_name.clone(),
                    complete: true,
                })
                .await?;
        }

        store
            .upsert_runtime(&NodeRuntime {
                impl_name: version.impl_name.clone(),
                impl_version: version.impl_version as i32,
                spec_name: version.spec_name.clone(),
                spec_version: version.spec_version as i32,
                authoring_version: version.authoring_version as i32,
                apis: serde_json::to_value(&version.apis).unwrap_or(serde_json::Value::Null),
                code: None,
            })
            .await?;

        let coord = RuntimeCoordinate::new(version.spec_name.clone(), version.spec_version);
        if store.get_metadata(&coord).await?.is_none() {
            let metadata_hex = rpc.state_get_metadata(&block_hash_hex).await?;
            let raw = hex::decode(metadata_hex.trim_start_matches("0x")).map_err(|e| HarvesterError::Config(e.to_string()))?;
            store
                .insert_metadata(&NodeMetadata {
                    spec_name: coord.spec_name.clone(),
                    spec_version: coord.spec_version as i32,
                    block_hash: header.hash,
                    data: raw.clone(),
                })
                .await?;

            let decode_ctx = cache
                .get_or_insert(coord.clone(), &raw)
                .map_err(|e| HarvesterError::BlockDecode {
                    block_number,
                    source: anyhow::anyhow!(e),
                })?;

            if !store.runtime_catalog_exists(&coord).await? {
                persist_catalog(store, &coord, &decode_ctx.metadata).await?;
            }
        }

        store
            .set_status(status_keys::PROCESS_STATE_MAX_BLOCKNUMBER, &block_number.to_string())
            .await?;
        store.commit().await?;
    }

    Ok(())
}

async fn persist_catalog(store: &Arc<dyn Store>, coord: &RuntimeCoordinate, metadata: &DecodedMetadata) -> HarvesterResult<()> {
    let rows = build_catalog(coord, metadata);
    if let Some(runtime) = rows.runtime {
        store.insert_runtime(&runtime).await?;
    }
    store.insert_runtime_pallets(&rows.pallets).await?;
    store.insert_runtime_calls(&rows.calls).await?;
    store.insert_runtime_call_arguments(&rows.call_arguments).await?;
    store.insert_runtime_events(&rows.events).await?;
    store.insert_runtime_event_attributes(&rows.event_attributes).await?;
    store.insert_runtime_storage(&rows.storage).await?;
    store.insert_runtime_constants(&rows.constants).await?;
    store.insert_runtime_errors(&rows.errors).await?;
    store.insert_runtime_types(&rows.types).await?;
    Ok(())
}

#[cfg(test)]
#[path = "retrieve_runtime_state_tests.rs"]
mod tests;
