// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ETL invocation (§6, ambient addition): calls each installed ETL
//! database's `etl_range(start, end, 1)` stored procedure over the span
//! of newly decoded blocks since the last run.

use std::sync::Arc;

use harvester_core::{BlockNumber, HarvesterError, HarvesterResult};
use harvester_storage::{status_keys, Store};
use tracing::info;

/// A bare identifier: letters, digits, underscore, not starting with a
/// digit. `database` is spliced directly into a `CALL` statement, so
/// anything else is rejected rather than escaped.
fn validate_database_name(name: &str) -> HarvesterResult<()> {
    let mut chars = name.chars();
    let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if name.is_empty() || !valid_start || !valid_rest {
        return Err(HarvesterError::Config(format!("invalid ETL database name: {name:?}")));
    }
    Ok(())
}

/// Runs one pass: calls `etl_range` on every installed database for the
/// `(last_etl_end + 1)..=decoder_watermark` span, then advances the
/// `PROCESS_ETL` watermark. A no-op if decode has not advanced past the
/// last ETL run.
pub async fn run(store: &Arc<dyn Store>, installed_databases: &[String]) -> HarvesterResult<()> {
    if installed_databases.is_empty() {
        return Ok(());
    }

    let Some(decoder_max) = watermark(store, status_keys::PROCESS_DECODER_MAX_BLOCKNUMBER).await? else {
        return Ok(());
    };
    let last_etl = watermark(store, status_keys::PROCESS_ETL).await?;
    let start = last_etl.map(|n| n + 1).unwrap_or(0);
    if decoder_max < start {
        return Ok(());
    }

    for database in installed_databases {
        validate_database_name(database)?;
        info!(database, start, end = decoder_max, "invoking etl_range");
        store.call_etl_range(database, start, decoder_max).await?;
    }

    store.set_status(status_keys::PROCESS_ETL, &decoder_max.to_string()).await?;
    store.commit().await?;
    Ok(())
}

async fn watermark(store: &Arc<dyn Store>, key: &str) -> HarvesterResult<Option<BlockNumber>> {
    store.get_status(key).await?.map(|v| v.parse::<BlockNumber>().map_err(|e| HarvesterError::Config(e.to_string()))).transpose()
}

#[cfg(test)]
#[path = "etl_tests.rs"]
mod tests;
