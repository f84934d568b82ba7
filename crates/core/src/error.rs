// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crate-wide error taxonomy shared by every harvester stage.
//!
//! Jobs classify failures into [`HarvesterError`] variants so the
//! supervisor can decide whether to retry, park for cron retry, or shut
//! down. [`HarvesterError::is_transient`] is the single source of truth
//! for that decision — new variants must update it.

/// Errors that can surface from any harvester job or adapter.
#[derive(Debug, thiserror::Error)]
pub enum HarvesterError {
    /// Node connection dropped, timed out, or refused — retry with backoff.
    #[error("transient connection failure: {0}")]
    TransientConnection(String),

    /// A block's extrinsics/events failed to decode against the runtime
    /// metadata active at that block.
    #[error("block {block_number} failed to decode: {source}")]
    BlockDecode {
        block_number: i64,
        #[source]
        source: anyhow::Error,
    },

    /// A single catalog/codec record failed to decode independently of
    /// the rest of the block.
    #[error("record {record_id} failed to decode: {source}")]
    DecodeRecord {
        record_id: String,
        #[source]
        source: anyhow::Error,
    },

    /// Storage read returned no row where one was required by invariant.
    #[error("storage missing: {0}")]
    StorageMissing(String),

    /// Interrupt token was observed; the caller should unwind cleanly.
    #[error("shutdown requested")]
    Shutdown,

    /// Misconfiguration discovered at startup or reload.
    #[error("configuration error: {0}")]
    Config(String),

    /// A persistence-layer failure not classified as transient.
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl HarvesterError {
    /// Whether this error should trigger a retry-with-backoff rather than
    /// parking the block/task for cron retry or aborting the job.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientConnection(_))
    }

    /// Whether this error should cause the current job iteration to stop
    /// and the supervisor to begin shutdown.
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Self::Shutdown)
    }
}

pub type HarvesterResult<T> = Result<T, HarvesterError>;
