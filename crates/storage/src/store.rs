// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The [`Store`] trait: the single interface every job and the decode
//! runtime use to reach the database. Jobs never hold a raw connection
//! pool directly, mirroring the teacher's pattern of depending on a
//! narrow accessor interface rather than poking at a global structure.

use async_trait::async_trait;
use harvester_core::{BlockHash, BlockNumber, HarvesterResult, RuntimeCoordinate};

use crate::catalog::{
    Runtime, RuntimeCall, RuntimeCallArgument, RuntimeConstant, RuntimeErrorMessage, RuntimeEvent,
    RuntimeEventAttribute, RuntimePallet, RuntimeStorage, RuntimeType,
};
use crate::codec::{CodecBlockEvent, CodecBlockExtrinsic, CodecBlockHeaderDigestLog, CodecBlockStorage, CodecMetadata};
use crate::control::{HarvesterStorageCron, HarvesterStorageTask, HarvesterStatus};
use crate::raw::{NodeBlockExtrinsic, NodeBlockHeader, NodeBlockHeaderDigestLog, NodeBlockRuntime, NodeBlockStorage, NodeMetadata, NodeRuntime};

/// Persistence interface for every raw/codec/catalog/control table.
/// Implementations are expected to commit each method call (or a small
/// batch of writes within a `*_for_block` call) as one transaction, so
/// the supervisor's "commit per block" semantics hold regardless of the
/// backing database.
#[async_trait]
pub trait Store: Send + Sync {
    // --- raw layer reads/writes ---

    async fn max_header_block_number(&self) -> HarvesterResult<Option<BlockNumber>>;
    async fn insert_block_header(&self, header: &NodeBlockHeader) -> HarvesterResult<()>;
    async fn insert_block_extrinsics(&self, rows: &[NodeBlockExtrinsic]) -> HarvesterResult<()>;
    async fn insert_block_logs(&self, rows: &[NodeBlockHeaderDigestLog]) -> HarvesterResult<()>;
    async fn get_block_header(&self, hash: BlockHash) -> HarvesterResult<Option<NodeBlockHeader>>;
    async fn get_block_header_by_number(
        &self,
        block_number: BlockNumber,
    ) -> HarvesterResult<Option<NodeBlockHeader>>;
    async fn list_block_extrinsics(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockExtrinsic>>;
    async fn list_block_logs(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockHeaderDigestLog>>;

    async fn max_runtime_block_number(&self) -> HarvesterResult<Option<BlockNumber>>;
    async fn insert_block_runtime(&self, row: &NodeBlockRuntime) -> HarvesterResult<()>;
    async fn get_block_runtime(&self, hash: BlockHash) -> HarvesterResult<Option<NodeBlockRuntime>>;
    async fn upsert_runtime(&self, row: &NodeRuntime) -> HarvesterResult<()>;

    async fn insert_block_storage(&self, row: &NodeBlockStorage) -> HarvesterResult<()>;
    async fn get_block_storage(
        &self,
        hash: BlockHash,
        storage_key: &[u8],
    ) -> HarvesterResult<Option<NodeBlockStorage>>;
    async fn list_block_storage(&self, hash: BlockHash) -> HarvesterResult<Vec<NodeBlockStorage>>;

    async fn get_metadata(&self, coord: &RuntimeCoordinate) -> HarvesterResult<Option<NodeMetadata>>;
    async fn insert_metadata(&self, row: &NodeMetadata) -> HarvesterResult<()>;

    // --- codec layer reads/writes ---

    async fn max_codec_extrinsic_block_number(&self) -> HarvesterResult<Option<BlockNumber>>;
    async fn max_codec_log_block_number(&self) -> HarvesterResult<Option<BlockNumber>>;
    async fn max_codec_storage_block_number(&self) -> HarvesterResult<Option<BlockNumber>>;
    async fn upsert_codec_extrinsic(&self, row: &CodecBlockExtrinsic) -> HarvesterResult<()>;
    async fn upsert_codec_log(&self, row: &CodecBlockHeaderDigestLog) -> HarvesterResult<()>;
    async fn upsert_codec_storage(&self, row: &CodecBlockStorage) -> HarvesterResult<()>;
    async fn insert_codec_events(&self, rows: &[CodecBlockEvent]) -> HarvesterResult<()>;
    async fn insert_codec_metadata(&self, row: &CodecMetadata) -> HarvesterResult<()>;

    async fn retry_codec_extrinsics(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockExtrinsic>>;
    async fn retry_codec_logs(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockHeaderDigestLog>>;
    async fn retry_codec_storage(&self, limit: i64) -> HarvesterResult<Vec<CodecBlockStorage>>;

    // --- runtime catalog writes ---

    async fn runtime_catalog_exists(&self, coord: &RuntimeCoordinate) -> HarvesterResult<bool>;
    async fn insert_runtime(&self, row: &Runtime) -> HarvesterResult<()>;
    async fn insert_runtime_pallets(&self, rows: &[RuntimePallet]) -> HarvesterResult<()>;
    async fn insert_runtime_calls(&self, rows: &[RuntimeCall]) -> HarvesterResult<()>;
    async fn insert_runtime_call_arguments(&self, rows: &[RuntimeCallArgument]) -> HarvesterResult<()>;
    async fn insert_runtime_events(&self, rows: &[RuntimeEvent]) -> HarvesterResult<()>;
    async fn insert_runtime_event_attributes(&self, rows: &[RuntimeEventAttribute]) -> HarvesterResult<()>;
    async fn insert_runtime_storage(&self, rows: &[RuntimeStorage]) -> HarvesterResult<()>;
    async fn insert_runtime_constants(&self, rows: &[RuntimeConstant]) -> HarvesterResult<()>;
    async fn insert_runtime_errors(&self, rows: &[RuntimeErrorMessage]) -> HarvesterResult<()>;
    async fn insert_runtime_types(&self, rows: &[RuntimeType]) -> HarvesterResult<()>;
    async fn get_runtime_storage_entry(
        &self,
        coord: &RuntimeCoordinate,
        pallet: &str,
        storage_name: &str,
    ) -> HarvesterResult<Option<RuntimeStorage>>;

    // --- control layer ---

    async fn get_status(&self, key: &str) -> HarvesterResult<Option<String>>;
    async fn set_status(&self, key: &str, value: &str) -> HarvesterResult<()>;
    async fn list_status(&self) -> HarvesterResult<Vec<HarvesterStatus>>;

    async fn list_active_storage_crons(&self) -> HarvesterResult<Vec<HarvesterStorageCron>>;
    async fn cache_storage_cron_key(&self, id_: &str, storage_key: &[u8]) -> HarvesterResult<()>;

    async fn next_storage_task(&self) -> HarvesterResult<Option<HarvesterStorageTask>>;
    async fn complete_storage_task(&self, id_: &str) -> HarvesterResult<()>;
    async fn list_storage_tasks(&self) -> HarvesterResult<Vec<HarvesterStorageTask>>;
    async fn add_storage_task(&self, task: &HarvesterStorageTask) -> HarvesterResult<()>;
    async fn remove_storage_task(&self, id_: &str) -> HarvesterResult<()>;
    async fn add_storage_cron(&self, cron: &HarvesterStorageCron) -> HarvesterResult<()>;
    async fn remove_storage_cron(&self, id_: &str) -> HarvesterResult<()>;

    /// Commits any writes buffered since the last commit.
    ///
    /// Implementations backed by a single-statement-per-call pool may
    /// make this a no-op; implementations that batch several writes per
    /// block inside one transaction use it as the real commit point.
    async fn commit(&self) -> HarvesterResult<()>;

    /// Invokes the `<database>.etl_range(start, end, 1)` stored procedure
    /// installed in one of `INSTALLED_ETL_DATABASES` (§6). `database` is
    /// validated by the caller as a plain identifier before reaching
    /// here, since it is interpolated directly into the `CALL` statement.
    async fn call_etl_range(&self, database: &str, start: BlockNumber, end: BlockNumber) -> HarvesterResult<()>;
}
