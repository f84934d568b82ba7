// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory [`NodeRpc`] double for engine-crate job tests that need
//! a live node's answers without a websocket connection.
//!
//! Responses are scripted ahead of time with the `with_*` builders; any
//! call not covered by a script returns [`HarvesterError::StorageMissing`].

use std::collections::HashMap;

use async_trait::async_trait;
use harvester_core::{HarvesterError, HarvesterResult};
use harvester_wire::{BlockResult, HeaderResult, RuntimeVersionResult};
use parking_lot::Mutex;

use crate::client::NodeRpc;

#[derive(Default)]
struct Scripts {
    block_hashes: HashMap<i64, String>,
    blocks: HashMap<String, BlockResult>,
    finalised_head: Option<String>,
    headers: HashMap<String, HeaderResult>,
    runtime_versions: HashMap<String, RuntimeVersionResult>,
    metadata: HashMap<String, String>,
    storage: HashMap<(String, String), Option<String>>,
    keys_paged: HashMap<(String, u32, String, String), Vec<String>>,
}

/// A scripted [`NodeRpc`] double. Cheap to clone the `Arc` around; the
/// scripts themselves are fixed at construction time.
#[derive(Default)]
pub struct FakeRpcClient {
    scripts: Mutex<Scripts>,
    calls: Mutex<Vec<String>>,
}

impl FakeRpcClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_block_hash(self, block_number: i64, block_hash: impl Into<String>) -> Self {
        self.scripts.lock().block_hashes.insert(block_number, block_hash.into());
        self
    }

    pub fn with_block(self, block_hash: impl Into<String>, block: BlockResult) -> Self {
        self.scripts.lock().blocks.insert(block_hash.into(), block);
        self
    }

    pub fn with_finalised_head(self, block_hash: impl Into<String>) -> Self {
        self.scripts.lock().finalised_head = Some(block_hash.into());
        self
    }

    pub fn with_header(self, block_hash: impl Into<String>, header: HeaderResult) -> Self {
        self.scripts.lock().headers.insert(block_hash.into(), header);
        self
    }

    pub fn with_runtime_version(self, block_hash: impl Into<String>, version: RuntimeVersionResult) -> Self {
        self.scripts.lock().runtime_versions.insert(block_hash.into(), version);
        self
    }

    pub fn with_metadata(self, block_hash: impl Into<String>, metadata_hex: impl Into<String>) -> Self {
        self.scripts.lock().metadata.insert(block_hash.into(), metadata_hex.into());
        self
    }

    pub fn with_storage_at(
        self,
        storage_key: impl Into<String>,
        block_hash: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        self.scripts.lock().storage.insert((storage_key.into(), block_hash.into()), value);
        self
    }

    pub fn with_keys_paged(
        self,
        prefix: impl Into<String>,
        count: u32,
        start_key: impl Into<String>,
        block_hash: impl Into<String>,
        keys: Vec<String>,
    ) -> Self {
        self.scripts
            .lock()
            .keys_paged
            .insert((prefix.into(), count, start_key.into(), block_hash.into()), keys);
        self
    }

    /// Methods called so far, in order, for asserting on retry/backoff
    /// behaviour in job tests.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, method: &str) {
        self.calls.lock().push(method.to_string());
    }

    fn missing(method: &str, key: impl std::fmt::Display) -> HarvesterError {
        HarvesterError::StorageMissing(format!("no scripted {method} response for {key}"))
    }
}

#[async_trait]
impl NodeRpc for FakeRpcClient {
    async fn chain_get_block_hash(&self, block_number: i64) -> HarvesterResult<String> {
        self.record("chain_getBlockHash");
        self.scripts
            .lock()
            .block_hashes
            .get(&block_number)
            .cloned()
            .ok_or_else(|| Self::missing("chain_getBlockHash", block_number))
    }

    async fn chain_get_block(&self, block_hash: &str) -> HarvesterResult<BlockResult> {
        self.record("chain_getBlock");
        self.scripts
            .lock()
            .blocks
            .get(block_hash)
            .cloned()
            .ok_or_else(|| Self::missing("chain_getBlock", block_hash))
    }

    async fn chain_get_finalised_head(&self) -> HarvesterResult<String> {
        self.record("chain_getFinalisedHead");
        self.scripts
            .lock()
            .finalised_head
            .clone()
            .ok_or_else(|| Self::missing("chain_getFinalisedHead", "<none scripted>"))
    }

    async fn chain_get_header(&self, block_hash: &str) -> HarvesterResult<HeaderResult> {
        self.record("chain_getHeader");
        self.scripts
            .lock()
            .headers
            .get(block_hash)
            .cloned()
            .ok_or_else(|| Self::missing("chain_getHeader", block_hash))
    }

    async fn chain_get_runtime_version(&self, block_hash: &str) -> HarvesterResult<RuntimeVersionResult> {
        self.record("chain_getRuntimeVersion");
        self.scripts
            .lock()
            .runtime_versions
            .get(block_hash)
            .cloned()
            .ok_or_else(|| Self::missing("chain_getRuntimeVersion", block_hash))
    }

    async fn state_get_metadata(&self, block_hash: &str) -> HarvesterResult<String> {
        self.record("state_getMetadata");
        self.scripts
            .lock()
            .metadata
            .get(block_hash)
            .cloned()
            .ok_or_else(|| Self::missing("state_getMetadata", block_hash))
    }

    async fn state_get_storage_at(&self, storage_key: &str, block_hash: &str) -> HarvesterResult<Option<String>> {
        self.record("state_getStorage");
        self.scripts
            .lock()
            .storage
            .get(&(storage_key.to_string(), block_hash.to_string()))
            .cloned()
            .ok_or_else(|| Self::missing("state_getStorage", storage_key))
    }

    async fn state_get_keys_paged(
        &self,
        prefix: &str,
        count: u32,
        start_key: &str,
        block_hash: &str,
    ) -> HarvesterResult<Vec<String>> {
        self.record("state_getKeysPaged");
        self.scripts
            .lock()
            .keys_paged
            .get(&(prefix.to_string(), count, start_key.to_string(), block_hash.to_string()))
            .cloned()
            .ok_or_else(|| Self::missing("state_getKeysPaged", prefix))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
