// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::control::BlocksSpec;
use harvester_core::DecodeState;

fn hash(byte: u8) -> BlockHash {
    BlockHash([byte; 32])
}

#[tokio::test]
async fn max_header_block_number_tracks_inserted_headers() {
    let store = MemStore::new();
    assert_eq!(store.max_header_block_number().await.unwrap(), None);

    store
        .insert_block_header(&NodeBlockHeader {
            hash: hash(1),
            parent_hash: hash(0),
            state_root: hash(2),
            extrinsics_root: hash(3),
            number: vec![1],
            block_number: 10,
            count_extrinsics: 0,
            count_logs: 0,
        })
        .await
        .unwrap();
    store
        .insert_block_header(&NodeBlockHeader {
            hash: hash(2),
            parent_hash: hash(1),
            state_root: hash(4),
            extrinsics_root: hash(5),
            number: vec![2],
            block_number: 11,
            count_extrinsics: 0,
            count_logs: 0,
        })
        .await
        .unwrap();

    assert_eq!(store.max_header_block_number().await.unwrap(), Some(11));
    assert_eq!(store.get_block_header_by_number(10).await.unwrap().unwrap().hash, hash(1));
}

#[tokio::test]
async fn retry_queries_exclude_terminal_rows() {
    let store = MemStore::new();
    store
        .upsert_codec_extrinsic(&CodecBlockExtrinsic {
            block_hash: hash(1),
            extrinsic_idx: 0,
            block_number: 1,
            scale_type: "Extrinsic".to_string(),
            data: serde_json::Value::Null,
            state: DecodeState::Retry,
            attempts: 1,
        })
        .await
        .unwrap();
    store
        .upsert_codec_extrinsic(&CodecBlockExtrinsic {
            block_hash: hash(2),
            extrinsic_idx: 0,
            block_number: 2,
            scale_type: "Extrinsic".to_string(),
            data: serde_json::Value::Null,
            state: DecodeState::Complete,
            attempts: 1,
        })
        .await
        .unwrap();

    let retryable = store.retry_codec_extrinsics(10).await.unwrap();
    assert_eq!(retryable.len(), 1);
    assert_eq!(retryable[0].block_hash, hash(1));
}

#[tokio::test]
async fn storage_task_fifo_and_completion() {
    let store = MemStore::new();
    let first = HarvesterStorageTask {
        id: StorageTaskId::new(),
        blocks: serde_json::to_value(BlocksSpec::Range {
            block_start: 1,
            block_end: 5,
        })
        .unwrap(),
        storage_pallet: String::new(),
        storage_name: String::new(),
        storage_key: None,
        storage_key_prefix: Some(b"prefix".to_vec()),
        complete: false,
    };
    let second = HarvesterStorageTask {
        id: StorageTaskId::new(),
        blocks: serde_json::to_value(BlocksSpec::Ids { block_ids: vec![9] }).unwrap(),
        storage_pallet: String::new(),
        storage_name: String::new(),
        storage_key: None,
        storage_key_prefix: Some(b"prefix".to_vec()),
        complete: false,
    };

    store.add_storage_task(&first).await.unwrap();
    store.add_storage_task(&second).await.unwrap();

    assert_eq!(store.list_storage_tasks().await.unwrap().len(), 2);

    let next = store.next_storage_task().await.unwrap().expect("a task should be pending");
    assert_eq!(next.id, first.id);

    store.complete_storage_task(first.id.as_str()).await.unwrap();
    let next = store.next_storage_task().await.unwrap().expect("second task should be pending");
    assert_eq!(next.id, second.id);

    store.remove_storage_task(second.id.as_str()).await.unwrap();
    assert_eq!(store.next_storage_task().await.unwrap(), None);
}

#[tokio::test]
async fn storage_cron_key_caching() {
    let store = MemStore::new();
    let cron = HarvesterStorageCron {
        id: StorageCronId::new(),
        block_number_interval: 100,
        pallet: "System".to_string(),
        storage_name: "Events".to_string(),
        storage_key: None,
        active: true,
    };
    store.add_storage_cron(&cron).await.unwrap();
    assert_eq!(store.list_active_storage_crons().await.unwrap().len(), 1);

    store.cache_storage_cron_key(cron.id.as_str(), b"deadbeef").await.unwrap();
    let crons = store.list_active_storage_crons().await.unwrap();
    assert_eq!(crons[0].storage_key.as_deref(), Some(b"deadbeef".as_slice()));

    store.remove_storage_cron(cron.id.as_str()).await.unwrap();
    assert!(store.list_active_storage_crons().await.unwrap().is_empty());
}

#[tokio::test]
async fn status_flags_round_trip() {
    let store = MemStore::new();
    assert_eq!(store.get_status("ENABLE_HARVESTER").await.unwrap(), None);

    store.set_status("ENABLE_HARVESTER", "true").await.unwrap();
    assert_eq!(store.get_status("ENABLE_HARVESTER").await.unwrap(), Some("true".to_string()));
    assert_eq!(store.list_status().await.unwrap().len(), 1);
}
