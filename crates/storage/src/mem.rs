// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`Store`] for unit tests elsewhere in the workspace, gated
//! behind `test-support` the same way [`harvester_core`]'s test builders
//! are. Never used outside `#[cfg(test)]` code: no migrations, no
//! transactions, no concurrency beyond a single [`parking_lot::Mutex`].

use std::collections::HashMap;

use async_trait::async_trait;
use harvester_core::{BlockHash, BlockNumber, HarvesterResult, RuntimeCoordinate};
use parking_lot::Mutex;

use crate::catalog::{
    Runtime, RuntimeCall, RuntimeCallArgument, RuntimeConstant, RuntimeErrorMessage, RuntimeEvent,
    RuntimeEventAttribute, RuntimePallet, RuntimeStorage, RuntimeType,
};
use crate::codec::{CodecBlockEvent, CodecBlockExtrinsic, CodecBlockHeaderDigestLog, CodecBlockStorage, CodecMetadata};
use crate::control::{HarvesterStatus, HarvesterStorageCron, HarvesterStorageTask, StorageCronId, StorageTaskId};
use crate::raw::{
    NodeBlockExtrinsic, NodeBlockHeader, NodeBlockHeaderDigestLog, NodeBlockRuntime, NodeBlockStorage, NodeMetadata,
    NodeRuntime,
};
use crate::store::Store;

#[derive(Default)]
struct Inner {
    headers: HashMap<BlockHash, NodeBlockHeader>,
    header_by_number: HashMap<BlockNumber, BlockHash>,
    extrinsics: HashMap<(BlockHash, i32), NodeBlockExtrinsic>,
    logs: HashMap<(BlockHash, i32), NodeBlockHeaderDigestLog>,
    block_runtimes: HashMap<BlockHash, NodeBlockRuntime>,
    runtimes: Vec<NodeRuntime>,
    block_storage: HashMap<(BlockHash, Vec<u8>), NodeBlockStorage>,
    metadata: HashMap<(String, i32), NodeMetadata>,

    codec_extrinsics: HashMap<(BlockHash, i32), CodecBlockExtrinsic>,
    codec_logs: HashMap<(BlockHash, i32), CodecBlockHeaderDigestLog>,
    codec_storage: HashMap<(BlockHash, Vec<u8>), CodecBlockStorage>,
    codec_events: Vec<CodecBlockEvent>,
    codec_metadata: HashMap<(String, i32), CodecMetadata>,

    runtime_rows: HashMap<(String, i32), Runtime>,
    pallets: Vec<RuntimePallet>,
    calls: Vec<RuntimeCall>,
    call_arguments: Vec<RuntimeCallArgument>,
    events: Vec<RuntimeEvent>,
    event_attributes: Vec<RuntimeEventAttribute>,
    storage_entries: Vec<RuntimeStorage>,
    constants: Vec<RuntimeConstant>,
    errors: Vec<RuntimeErrorMessage>,
    types: Vec<RuntimeType>,

    status: HashMap<String, String>,
    storage_crons: HashMap<StorageCronId, HarvesterStorageCron>,
    storage_tasks: HashMap<StorageTaskId, HarvesterStorageTask>,
    storage_task_order: Vec<StorageTaskId>,
    etl_calls: Vec<(String, BlockNumber, BlockNumber)>,
}

/// An in-memory [`Store`]. Every method takes an immediate lock and
/// returns owned clones, so tests can run several jobs against the same
/// store without any async contention beyond the mutex itself.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(database, start, end)` triples recorded by [`Store::call_etl_range`],
    /// for asserting on ETL invocation in job tests.
    pub fn etl_calls(&self) -> Vec<(String, BlockNumber, BlockNumber)> {
        self.inner.lock().etl_calls.clone()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn max_header_block_number(&self) -> HarvesterResult<Option<BlockNumber>> {
        Ok(self.inner.lock().headers.values().map(|h| h.block_number).max())
    }

    async fn insert_block_header(&self, header: &NodeBlockHeader) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        inner.header_by_number.insert(header.block_number, header.hash);
        inner.headers.insert(header.hash, header.clone());
        Ok(())
    }

    async fn insert_block_extrinsics(&self, rows: &[NodeBlockExtrinsic]) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        for row in rows {
            inner.extrinsics.insert((row.block_hash, row.extrinsic_idx), row.clone());
        }
        Ok(())
    }

    async fn insert_block_logs(&self, rows: &[NodeBlockHeaderDigestLog]) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        for row in rows {
            inner.logs.insert((row.block_hash, row.log_idx), row.clone());
        }
        Ok(())
    }

    async fn get_block_header(&self, hash: BlockHash) -> HarvesterResult<Option<NodeBlockHeader>> {
        Ok(self.inner.lock().headers.get(&hash).cloned())
    }

    async fn get_block_header_by_number(&self, block_number: BlockNumber) -> HarvesterResult<Option<NodeBlockHeader>> {
        let inner = self.inner.lock();
        Ok(inner.header_by_number.get(&block_number).and_then(|h| inner.headers.get(h)).cloned())
    }

    async fn list_block_extrinsics(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockExtrinsic>> {
        let mut rows: Vec<_> = self
            .inner
            .lock()
            .extrinsics
            .values()
            .filter(|e| e.block_hash == hash)
            .cloned()
            .collect();
        rows.sort_by_key(|e| e.extrinsic_idx);
        Ok(rows)
    }

    async fn list_block_logs(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockHeaderDigestLog>> {
        let mut rows: Vec<_> = self.inner.lock().logs.values().filter(|l| l.block_hash == hash).cloned().collect();
        rows.sort_by_key(|l| l.log_idx);
        Ok(rows)
    }

    async fn max_runtime_block_number(&self) -> HarvesterResult<Option<BlockNumber>> {
        Ok(self.inner.lock().block_runtimes.values().map(|r| r.block_number).max())
    }

    async fn insert_block_runtime(&self, row: &NodeBlockRuntime) -> HarvesterResult<()> {
        self.inner.lock().block_runtimes.insert(row.hash, row.clone());
        Ok(())
    }

    async fn get_block_runtime(&self, hash: BlockHash) -> HarvesterResult<Option<NodeBlockRuntime>> {
        Ok(self.inner.lock().block_runtimes.get(&hash).cloned())
    }

    async fn upsert_runtime(&self, row: &NodeRuntime) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        let key = |r: &NodeRuntime| {
            (
                r.impl_name.clone(),
                r.impl_version,
                r.spec_name.clone(),
                r.spec_version,
                r.authoring_version,
            )
        };
        if let Some(existing) = inner.runtimes.iter_mut().find(|r| key(r) == key(row)) {
            *existing = row.clone();
        } else {
            inner.runtimes.push(row.clone());
        }
        Ok(())
    }

    async fn insert_block_storage(&self, row: &NodeBlockStorage) -> HarvesterResult<()> {
        self.inner.lock().block_storage.insert((row.block_hash, row.storage_key.clone()), row.clone());
        Ok(())
    }

    async fn get_block_storage(&self, hash: BlockHash, storage_key: &[u8]) -> HarvesterResult<Option<NodeBlockStorage>> {
        Ok(self.inner.lock().block_storage.get(&(hash, storage_key.to_vec())).cloned())
    }

    async fn list_block_storage(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockStorage>> {
        Ok(self
            .inner
            .lock()
            .block_storage
            .iter()
            .filter(|((h, _), _)| *h == hash)
            .map(|(_, row)| row.clone())
            .collect())
    }

    async fn get_metadata(&self, coord: &RuntimeCoordinate) -> HarvesterResult<Option<NodeMetadata>> {
        Ok(self.inner.lock().metadata.get(&(coord.spec_name.clone(), coord.spec_version as i32)).cloned())
    }

    async fn insert_metadata(&self, row: &NodeMetadata) -> HarvesterResult<()> {
        self.inner.lock().metadata.insert((row.spec_name.clone(), row.spec_version), row.clone());
        Ok(())
    }

    async fn max_codec_extrinsic_block_number(&self) -> HarvesterResult<Option<BlockNumber>> {
        Ok(self.inner.lock().codec_extrinsics.values().map(|r| r.block_number).max())
    }

    async fn max_codec_log_block_number(&self) -> HarvesterResult<Option<BlockNumber>> {
        Ok(self.inner.lock().codec_logs.values().map(|r| r.block_number).max())
    }

    async fn max_codec_storage_block_number(&self) -> HarvesterResult<Option<BlockNumber>> {
        Ok(self.inner.lock().codec_storage.values().map(|r| r.block_number).max())
    }

    async fn upsert_codec_extrinsic(&self, row: &CodecBlockExtrinsic) -> HarvesterResult<()> {
        self.inner.lock().codec_extrinsics.insert((row.block_hash, row.extrinsic_idx), row.clone());
        Ok(())
    }

    async fn upsert_codec_log(&self, row: &CodecBlockHeaderDigestLog) -> HarvesterResult<()> {
        self.inner.lock().codec_logs.insert((row.block_hash, row.log_idx), row.clone());
        Ok(())
    }

    async fn upsert_codec_storage(&self, row: &CodecBlockStorage) -> HarvesterResult<()> {
        self.inner.lock().codec_storage.insert((row.block_hash, row.storage_key.clone()), row.clone());
        Ok(())
    }

    async fn insert_codec_events(&self, rows: &[CodecBlockEvent]) -> HarvesterResult<()> {
        self.inner.lock().codec_events.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_codec_metadata(&self, row: &CodecMetadata) -> HarvesterResult<()> {
        self.inner.lock().codec_metadata.insert((row.spec_name.clone(), row.spec_version), row.clone());
        Ok(())
    }

    async fn retry_codec_extrinsics(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockExtrinsic>> {
        let inner = self.inner.lock();
        let mut rows: Vec<_> = inner
            .codec_extrinsics
            .values()
            .filter(|r| !r.state.is_terminal())
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.block_number, r.extrinsic_idx));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn retry_codec_logs(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockHeaderDigestLog>> {
        let inner = self.inner.lock();
        let mut rows: Vec<_> = inner.codec_logs.values().filter(|r| !r.state.is_terminal()).cloned().collect();
        rows.sort_by_key(|r| (r.block_number, r.log_idx));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn retry_codec_storage(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockStorage>> {
        let inner = self.inner.lock();
        let mut rows: Vec<_> = inner.codec_storage.values().filter(|r| !r.state.is_terminal()).cloned().collect();
        rows.sort_by_key(|r| r.block_number);
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }

    async fn runtime_catalog_exists(&self, coord: &RuntimeCoordinate) -> HarvesterResult<bool> {
        Ok(self
            .inner
            .lock()
            .runtime_rows
            .contains_key(&(coord.spec_name.clone(), coord.spec_version as i32)))
    }

    async fn insert_runtime(&self, row: &Runtime) -> HarvesterResult<()> {
        self.inner.lock().runtime_rows.insert((row.spec_name.clone(), row.spec_version), row.clone());
        Ok(())
    }

    async fn insert_runtime_pallets(&self, rows: &[RuntimePallet]) -> HarvesterResult<()> {
        self.inner.lock().pallets.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_calls(&self, rows: &[RuntimeCall]) -> HarvesterResult<()> {
        self.inner.lock().calls.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_call_arguments(&self, rows: &[RuntimeCallArgument]) -> HarvesterResult<()> {
        self.inner.lock().call_arguments.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_events(&self, rows: &[RuntimeEvent]) -> HarvesterResult<()> {
        self.inner.lock().events.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_event_attributes(&self, rows: &[RuntimeEventAttribute]) -> HarvesterResult<()> {
        self.inner.lock().event_attributes.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_storage(&self, rows: &[RuntimeStorage]) -> HarvesterResult<()> {
        self.inner.lock().storage_entries.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_constants(&self, rows: &[RuntimeConstant]) -> HarvesterResult<()> {
        self.inner.lock().constants.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_errors(&self, rows: &[RuntimeErrorMessage]) -> HarvesterResult<()> {
        self.inner.lock().errors.extend_from_slice(rows);
        Ok(())
    }

    async fn insert_runtime_types(&self, rows: &[RuntimeType]) -> HarvesterResult<()> {
        self.inner.lock().types.extend_from_slice(rows);
        Ok(())
    }

    async fn get_runtime_storage_entry(
        &self,
        coord: &RuntimeCoordinate,
        pallet: &str,
        storage_name: &str,
    ) -> HarvesterResult<Option<RuntimeStorage>> {
        Ok(self
            .inner
            .lock()
            .storage_entries
            .iter()
            .find(|s| {
                s.spec_name == coord.spec_name
                    && s.spec_version == coord.spec_version as i32
                    && s.pallet == pallet
                    && s.storage_name == storage_name
            })
            .cloned())
    }

    async fn get_status(&self, key: &str) -> HarvesterResult<Option<String>> {
        Ok(self.inner.lock().status.get(key).cloned())
    }

    async fn set_status(&self, key: &str, value: &str) -> HarvesterResult<()> {
        self.inner.lock().status.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn list_status(&self) -> HarvesterResult<Vec<HarvesterStatus>> {
        let mut rows: Vec<_> = self
            .inner
            .lock()
            .status
            .iter()
            .map(|(key, value)| HarvesterStatus {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        rows.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(rows)
    }

    async fn list_active_storage_crons(&self) -> HarvesterResult<Vec<HarvesterStorageCron>> {
        Ok(self.inner.lock().storage_crons.values().filter(|c| c.active).cloned().collect())
    }

    async fn cache_storage_cron_key(&self, id_: &str, storage_key: &[u8]) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        if let Some(cron) = inner.storage_crons.values_mut().find(|c| c.id.as_str() == id_) {
            cron.storage_key = Some(storage_key.to_vec());
        }
        Ok(())
    }

    async fn next_storage_task(&self) -> HarvesterResult<Option<HarvesterStorageTask>> {
        let inner = self.inner.lock();
        Ok(inner
            .storage_task_order
            .iter()
            .filter_map(|id| inner.storage_tasks.get(id))
            .find(|t| !t.complete)
            .cloned())
    }

    async fn complete_storage_task(&self, id_: &str) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        if let Some(task) = inner.storage_tasks.values_mut().find(|t| t.id.as_str() == id_) {
            task.complete = true;
        }
        Ok(())
    }

    async fn list_storage_tasks(&self) -> HarvesterResult<Vec<HarvesterStorageTask>> {
        let inner = self.inner.lock();
        Ok(inner.storage_task_order.iter().filter_map(|id| inner.storage_tasks.get(id)).cloned().collect())
    }

    async fn add_storage_task(&self, task: &HarvesterStorageTask) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        inner.storage_task_order.push(task.id.clone());
        inner.storage_tasks.insert(task.id.clone(), task.clone());
        Ok(())
    }

    async fn remove_storage_task(&self, id_: &str) -> HarvesterResult<()> {
        let mut inner = self.inner.lock();
        inner.storage_task_order.retain(|id| id.as_str() != id_);
        inner.storage_tasks.retain(|id, _| id.as_str() != id_);
        Ok(())
    }

    async fn add_storage_cron(&self, cron: &HarvesterStorageCron) -> HarvesterResult<()> {
        self.inner.lock().storage_crons.insert(cron.id.clone(), cron.clone());
        Ok(())
    }

    async fn remove_storage_cron(&self, id_: &str) -> HarvesterResult<()> {
        self.inner.lock().storage_crons.retain(|id, _| id.as_str() != id_);
        Ok(())
    }

    async fn commit(&self) -> HarvesterResult<()> {
        Ok(())
    }

    async fn call_etl_range(&self, database: &str, start: BlockNumber, end: BlockNumber) -> HarvesterResult<()> {
        self.inner.lock().etl_calls.push((database.to_string(), start, end));
        Ok(())
    }
}

#[cfg(test)]
#[path = "mem_tests.rs"]
mod tests;
