// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use harvester_core::Interrupt;
use harvester_rpc::FakeRpcClient;
use harvester_storage::control::{HarvesterStorageTask, StorageTaskId};
use harvester_storage::MemStore;

use super::*;

fn hash(byte: u8) -> BlockHash {
    BlockHash([byte; 32])
}

#[tokio::test]
async fn single_key_task_persists_one_row_and_completes() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    let key = vec![0xaa, 0xbb];
    store
        .add_storage_task(&HarvesterStorageTask {
            id: StorageTaskId::new(),
            blocks: serde_json::json!({"block_ids": [5]}),
            storage_pallet: String::new(),
            storage_name: String::new(),
            storage_key: Some(key.clone()),
            storage_key_prefix: None,
            complete: false,
        })
        .await
        .unwrap();

    let rpc: Arc<dyn NodeRpc> = Arc::new(
        FakeRpcClient::new()
            .with_block_hash(5, hash(1).to_hex())
            .with_storage_at(format!("0x{}", hex::encode(&key)), hash(1).to_hex(), Some("0xdeadbeef".to_string())),
    );
    let cache = MetadataCache::new();

    run(&store, &rpc, &cache, &Interrupt::new()).await.unwrap();

    let row = store.get_block_storage(hash(1), &key).await.unwrap().unwrap();
    assert_eq!(row.data, Some(vec![0xde, 0xad, 0xbe, 0xef]));
    assert!(store.list_storage_tasks().await.unwrap().into_iter().all(|t| t.complete));
}

#[tokio::test]
async fn prefix_task_pages_through_keys_until_a_short_page() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    let prefix = vec![0x11, 0x22];
    let prefix_hex = format!("0x{}", hex::encode(&prefix));
    let key_a = format!("{prefix_hex}aa");
    let key_b = format!("{prefix_hex}bb");

    store
        .add_storage_task(&HarvesterStorageTask {
            id: StorageTaskId::new(),
            blocks: serde_json::json!({"block_ids": [1]}),
            storage_pallet: String::new(),
            storage_name: String::new(),
            storage_key: None,
            storage_key_prefix: Some(prefix.clone()),
            complete: false,
        })
        .await
        .unwrap();

    let rpc: Arc<dyn NodeRpc> = Arc::new(
        FakeRpcClient::new()
            .with_block_hash(1, hash(9).to_hex())
            .with_keys_paged(&prefix_hex, PAGE_SIZE, &prefix_hex, hash(9).to_hex(), vec![key_a.clone(), key_b.clone()])
            .with_storage_at(&key_a, hash(9).to_hex(), Some("0x01".to_string()))
            .with_storage_at(&key_b, hash(9).to_hex(), Some("0x02".to_string())),
    );
    let cache = MetadataCache::new();

    run(&store, &rpc, &cache, &Interrupt::new()).await.unwrap();

    let key_a_bytes = hex::decode(key_a.trim_start_matches("0x")).unwrap();
    let key_b_bytes = hex::decode(key_b.trim_start_matches("0x")).unwrap();
    assert_eq!(store.get_block_storage(hash(9), &key_a_bytes).await.unwrap().unwrap().data, Some(vec![0x01]));
    assert_eq!(store.get_block_storage(hash(9), &key_b_bytes).await.unwrap().unwrap().data, Some(vec![0x02]));
}

#[tokio::test]
async fn no_task_queued_is_a_no_op() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    let rpc: Arc<dyn NodeRpc> = Arc::new(FakeRpcClient::new());
    let cache = MetadataCache::new();

    run(&store, &rpc, &cache, &Interrupt::new()).await.unwrap();
    assert!(store.list_storage_tasks().await.unwrap().is_empty());
}
