// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use harvester_storage::MemStore;

use super::*;

#[tokio::test]
async fn no_installed_databases_is_a_no_op() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    run(&store, &[]).await.unwrap();
    assert!(store.get_status(status_keys::PROCESS_ETL).await.unwrap().is_none());
}

#[tokio::test]
async fn calls_etl_range_for_the_span_since_the_last_run() {
    let mem = Arc::new(MemStore::new());
    let store: Arc<dyn Store> = mem.clone();
    store.set_status(status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER, "10").await.unwrap();

    run(&store, &["analytics".to_string()]).await.unwrap();

    assert_eq!(mem.etl_calls(), vec![("analytics".to_string(), 0, 10)]);
    assert_eq!(store.get_status(status_keys::PROCESS_ETL).await.unwrap(), Some("10".to_string()));

    store.set_status(status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER, "15").await.unwrap();
    run(&store, &["analytics".to_string()]).await.unwrap();
    assert_eq!(mem.etl_calls(), vec![("analytics".to_string(), 0, 10), ("analytics".to_string(), 11, 15)]);
}

#[tokio::test]
async fn does_nothing_when_decode_has_not_advanced_past_the_last_run() {
    let mem = Arc::new(MemStore::new());
    let store: Arc<dyn Store> = mem.clone();
    store.set_status(status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER, "5").await.unwrap();
    store.set_status(status_keys::PROCESS_ETL, "5").await.unwrap();

    run(&store, &["analytics".to_string()]).await.unwrap();

    assert!(mem.etl_calls().is_empty());
}

#[tokio::test]
async fn rejects_a_database_name_that_is_not_a_plain_identifier() {
    let store: Arc<dyn Store> = Arc::new(MemStore::new());
    store.set_status(status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER, "1").await.unwrap();

    let err = run(&store, &["bad;drop table".to_string()]).await.unwrap_err();
    assert!(matches!(err, harvester_core::HarvesterError::Config(_)));
}
