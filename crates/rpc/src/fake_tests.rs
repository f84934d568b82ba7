// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use harvester_wire::{BlockBody, DigestResult};

fn header() -> HeaderResult {
    HeaderResult {
        parent_hash: harvester_core::BlockHash([0; 32]),
        number_hex: "0x2a".to_string(),
        state_root: harvester_core::BlockHash([1; 32]),
        extrinsics_root: harvester_core::BlockHash([2; 32]),
        digest: DigestResult { logs: vec![] },
    }
}

#[tokio::test]
async fn scripted_calls_answer_and_are_recorded() {
    let fake = FakeRpcClient::new()
        .with_block_hash(42, "0xaaaa")
        .with_header("0xaaaa", header())
        .with_finalised_head("0xaaaa");

    assert_eq!(fake.chain_get_block_hash(42).await.unwrap(), "0xaaaa");
    assert_eq!(fake.chain_get_header("0xaaaa").await.unwrap().number_hex, "0x2a");
    assert_eq!(fake.chain_get_finalised_head().await.unwrap(), "0xaaaa");

    assert_eq!(
        fake.calls(),
        vec!["chain_getBlockHash", "chain_getHeader", "chain_getFinalisedHead"]
    );
}

#[tokio::test]
async fn unscripted_calls_fail_with_storage_missing() {
    let fake = FakeRpcClient::new();
    let err = fake.chain_get_block_hash(1).await.unwrap_err();
    assert!(matches!(err, HarvesterError::StorageMissing(_)));
}

#[tokio::test]
async fn block_and_storage_scripts_round_trip() {
    let fake = FakeRpcClient::new()
        .with_block(
            "0xaaaa",
            BlockResult {
                block: BlockBody {
                    header: header(),
                    extrinsics: vec!["0x0102".to_string()],
                },
            },
        )
        .with_storage_at("0xkey", "0xaaaa", Some("0xvalue".to_string()))
        .with_keys_paged("0xprefix", 10, "0x", "0xaaaa", vec!["0xkey1".to_string()]);

    let block = fake.chain_get_block("0xaaaa").await.unwrap();
    assert_eq!(block.block.extrinsics, vec!["0x0102".to_string()]);

    let storage = fake.state_get_storage_at("0xkey", "0xaaaa").await.unwrap();
    assert_eq!(storage, Some("0xvalue".to_string()));

    let keys = fake.state_get_keys_paged("0xprefix", 10, "0x", "0xaaaa").await.unwrap();
    assert_eq!(keys, vec!["0xkey1".to_string()]);
}
