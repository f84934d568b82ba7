// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Control layer: operator-facing flags, recurring storage captures, and
//! ad-hoc storage scan tasks. These rows are mutated by the CLI and read
//! by the supervisor/jobs — everything else in this crate is pipeline
//! output.

use harvester_core::{define_id, BlockNumber};
use serde::{Deserialize, Serialize};

define_id! {
    /// Identifies a queued [`HarvesterStorageTask`].
    pub struct StorageTaskId("stsk");
}

define_id! {
    /// Identifies a recurring [`HarvesterStorageCron`] capture.
    pub struct StorageCronId("stcr");
}

/// Flag/watermark keys read and written under the `HarvesterStatus`
/// key-value store. Kept as string constants (rather than an enum) since
/// operators can set arbitrary chain-identity keys the pipeline never
/// reads back.
pub mod status_keys {
    pub const ENABLE_HARVESTER: &str = "ENABLE_HARVESTER";
    pub const ENABLE_BLOCKS: &str = "ENABLE_BLOCKS";
    pub const ENABLE_STATE: &str = "ENABLE_STATE";
    pub const ENABLE_DECODE: &str = "ENABLE_DECODE";
    pub const ENABLE_CRON: &str = "ENABLE_CRON";
    pub const ENABLE_ETL: &str = "ENABLE_ETL";
    pub const PROCESS_BLOCKS_MAX_BLOCKNUMBER: &str = "PROCESS_BLOCKS_MAX_BLOCKNUMBER";
    pub const PROCESS_STATE_MAX_BLOCKNUMBER: &str = "PROCESS_STATE_MAX_BLOCKNUMBER";
    pub const PROCESS_DECODER_MAX_BLOCKNUMBER: &str = "PROCESS_DECODER_MAX_BLOCKNUMBER";
    pub const PROCESS_ETL: &str = "PROCESS_ETL";
    pub const SYSTEM_CHAIN: &str = "SYSTEM_CHAIN";
    pub const CHAIN_FINALIZED_HEAD: &str = "CHAIN_FINALIZED_HEAD";
    pub const CHAIN_TIP: &str = "CHAIN_TIP";
}

/// A single `HarvesterStatus` row: a flat key-value store for flags and
/// watermarks, enable switches, and chain identity strings.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct HarvesterStatus {
    pub key: String,
    pub value: String,
}

/// Recurring `(block_number_interval, pallet, storage_name)` capture.
/// `storage_key` is lazily computed on first use and cached here so
/// later iterations skip the xxh128 hashing.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct HarvesterStorageCron {
    pub id: StorageCronId,
    pub block_number_interval: i32,
    pub pallet: String,
    pub storage_name: String,
    pub storage_key: Option<Vec<u8>>,
    pub active: bool,
}

impl HarvesterStorageCron {
    /// Whether this cron fires at the given block number.
    pub fn fires_at(&self, block_number: BlockNumber) -> bool {
        self.active
            && self.block_number_interval > 0
            && block_number % self.block_number_interval as BlockNumber == 0
    }
}

/// A user-queued storage scan, normalized into either an explicit id
/// list or an inclusive range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlocksSpec {
    Ids { block_ids: Vec<BlockNumber> },
    Range {
        block_start: BlockNumber,
        block_end: BlockNumber,
    },
}

impl BlocksSpec {
    /// Materializes the block numbers this spec covers, in ascending order.
    pub fn block_numbers(&self) -> Vec<BlockNumber> {
        match self {
            BlocksSpec::Ids { block_ids } => {
                let mut ids = block_ids.clone();
                ids.sort_unstable();
                ids
            }
            BlocksSpec::Range {
                block_start,
                block_end,
            } => (*block_start..=*block_end).collect(),
        }
    }

    /// Parses the `storage-tasks add` blocks expression: a comma-separated
    /// list of either single block numbers (`N`) or inclusive ranges
    /// (`N-M`). Carried over from the original CLI's blocks-expression
    /// grammar since the wire shape it produces is in scope even though
    /// the interactive prompt loop is not.
    pub fn parse(expr: &str) -> Result<Self, String> {
        let mut ids = Vec::new();
        for part in expr.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Some((start, end)) = part.split_once('-') {
                let start: BlockNumber = start
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid block range: {part:?}"))?;
                let end: BlockNumber = end
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid block range: {part:?}"))?;
                if start > end {
                    return Err(format!("invalid block range (start > end): {part:?}"));
                }
                if ids.is_empty() && expr.split(',').count() == 1 {
                    return Ok(BlocksSpec::Range {
                        block_start: start,
                        block_end: end,
                    });
                }
                ids.extend(start..=end);
            } else {
                let n: BlockNumber = part
                    .parse()
                    .map_err(|_| format!("invalid block number: {part:?}"))?;
                ids.push(n);
            }
        }
        if ids.is_empty() {
            return Err("blocks expression yielded no block numbers".to_string());
        }
        Ok(BlocksSpec::Ids { block_ids: ids })
    }
}

/// A queued scan job: resolve each block in `blocks`, fetch a key set,
/// and persist [`crate::raw::NodeBlockStorage`]/[`crate::codec::CodecBlockStorage`]
/// rows for it. `storage_pallet`/`storage_name` are carried alongside the
/// already-hashed `storage_key`/`storage_key_prefix` so the worker can
/// stamp every discovered row with the pallet/item that produced it and
/// decode the value against that runtime's metadata.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct HarvesterStorageTask {
    pub id: StorageTaskId,
    pub blocks: serde_json::Value,
    pub storage_pallet: String,
    pub storage_name: String,
    pub storage_key: Option<Vec<u8>>,
    pub storage_key_prefix: Option<Vec<u8>>,
    pub complete: bool,
}

#[cfg(test)]
#[path = "control_tests.rs"]
mod tests;
