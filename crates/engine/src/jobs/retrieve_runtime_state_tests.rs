// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use harvester_core::Interrupt;
use harvester_rpc::FakeRpcClient;
use harvester_storage::raw::NodeBlockHeader;
use harvester_storage::MemStore;
use harvester_wire::RuntimeVersionResult;

use super::*;

fn hash(byte: u8) -> BlockHash {
    BlockHash([byte; 32])
}

fn version() -> RuntimeVersionResult {
    RuntimeVersionResult {
        spec_name: "test-chain".to_string(),
        impl_name: "test-chain-impl".to_string(),
        authoring_version: 1,
        spec_version: 7,
        impl_version: 1,
        apis: vec![],
    }
}

async fn seed_headers(store: &Arc<dyn Store>, count: i64) {
    for n in 0..count {
        store
            .insert_block_header(&NodeBlockHeader {
                hash: hash(n as u8 + 1),
                parent_hash: hash(n as u8),
                state_root: hash(0x10),
                extrinsics_root: hash(0x11),
                number: vec![n as u8],
                block_number: n,
                count_extrinsics: 0,
                count_logs: 0,
            })
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn captures_runtime_version_for_every_unprocessed_header() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    seed_headers(&store, 3).await;
    // Pre-seed metadata so the catalog-build branch (needing real SCALE
    // bytes) is skipped; this job only needs to exercise version/cron capture.
    store
        .insert_metadata(&harvester_storage::raw::NodeMetadata {
            spec_name: "test-chain".to_string(),
            spec_version: 7,
            block_hash: hash(1),
            data: vec![0x00],
        })
        .await
        .unwrap();

    let rpc: Arc<dyn NodeRpc> = Arc::new(
        FakeRpcClient::new()
            .with_runtime_version(hash(1).to_hex(), version())
            .with_runtime_version(hash(2).to_hex(), version())
            .with_runtime_version(hash(3).to_hex(), version()),
    );

    let cache = MetadataCache::new();
    run(&store, &rpc, &cache, &Interrupt::new()).await.unwrap();

    assert_eq!(store.max_runtime_block_number().await.unwrap(), Some(2));
    let runtime_row = store.get_block_runtime(hash(1)).await.unwrap().unwrap();
    assert_eq!(runtime_row.spec_version, 7);
    assert_eq!(
        store.get_status(status_keys::PROCESS_STATE_MAX_BLOCKNUMBER).await.unwrap(),
        Some("2".to_string())
    );
}

#[tokio::test]
async fn cron_fires_only_at_the_declared_interval() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    seed_headers(&store, 4).await;
    store
        .insert_metadata(&harvester_storage::raw::NodeMetadata {
            spec_name: "test-chain".to_string(),
            spec_version: 7,
            block_hash: hash(1),
            data: vec![0x00],
        })
        .await
        .unwrap();
    store
        .add_storage_cron(&harvester_storage::HarvesterStorageCron {
            id: harvester_storage::StorageCronId::new(),
            block_number_interval: 2,
            pallet: "System".to_string(),
            storage_name: "Events".to_string(),
            storage_key: None,
            active: true,
        })
        .await
        .unwrap();

    let rpc: Arc<dyn NodeRpc> = Arc::new(
        FakeRpcClient::new()
            .with_runtime_version(hash(1).to_hex(), version())
            .with_runtime_version(hash(2).to_hex(), version())
            .with_runtime_version(hash(3).to_hex(), version())
            .with_runtime_version(hash(4).to_hex(), version())
            .with_storage_at(
                format!("0x{}", hex::encode(storage_key_prefix("System", "Events"))),
                hash(1).to_hex(),
                Some("0xcafe".to_string()),
            )
            .with_storage_at(
                format!("0x{}", hex::encode(storage_key_prefix("System", "Events"))),
                hash(3).to_hex(),
                Some("0xbeef".to_string()),
            ),
    );

    let cache = MetadataCache::new();
    run(&store, &rpc, &cache, &Interrupt::new()).await.unwrap();

    let key = storage_key_prefix("System", "Events");
    assert!(store.get_block_storage(hash(1), &key).await.unwrap().is_some());
    assert!(store.get_block_storage(hash(2), &key).await.unwrap().is_none());
    assert!(store.get_block_storage(hash(3), &key).await.unwrap().is_some());
}
