// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-start settings read once from the environment, and the
//! per-iteration [`SettingsSnapshot`] the supervisor reloads from
//! [`harvester_storage::HarvesterStatus`] at the top of every loop.
//!
//! Deliberately thin: no file-based layering, no hot-reload of the
//! static half. Only the dynamic half (enable flags) is reloaded, and
//! that reload happens once per iteration and is then passed by value
//! into every stage rather than re-queried mid-stage.

use std::collections::HashMap;

use harvester_core::{BlockNumber, HarvesterError, HarvesterResult, NodeType, Stage};
use harvester_storage::status_keys;

/// Static configuration read once at process start from environment
/// variables. Fails fast if a required variable is missing or malformed.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_connection: String,
    pub substrate_rpc_url: String,
    pub substrate_ss58_format: u32,
    pub node_type: NodeType,
    pub type_registry: String,
    pub installed_etl_databases: Vec<String>,
    pub block_start: Option<BlockNumber>,
    pub block_end: Option<BlockNumber>,
    pub debug: bool,
    pub prometheus: bool,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn required(name: &str) -> HarvesterResult<String> {
    env_var(name).ok_or_else(|| HarvesterError::Config(format!("{name} is required but not set")))
}

impl Settings {
    /// Builds the connection string from `DB_CONNECTION`, or assembles one
    /// from `DB_NAME`/`DB_HOST`/`DB_PORT`/`DB_USERNAME`/`DB_PASSWORD`.
    fn db_connection_from_env() -> HarvesterResult<String> {
        if let Some(url) = env_var("DB_CONNECTION") {
            return Ok(url);
        }
        let name = required("DB_NAME")?;
        let host = env_var("DB_HOST").unwrap_or_else(|| "localhost".to_string());
        let port = env_var("DB_PORT").unwrap_or_else(|| "5432".to_string());
        let user = env_var("DB_USERNAME").unwrap_or_else(|| "postgres".to_string());
        let password = env_var("DB_PASSWORD").unwrap_or_default();
        Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
    }

    pub fn from_env() -> HarvesterResult<Self> {
        let db_connection = Self::db_connection_from_env()?;
        let substrate_rpc_url = required("SUBSTRATE_RPC_URL")?;
        let substrate_ss58_format = env_var("SUBSTRATE_SS58_FORMAT")
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| HarvesterError::Config(format!("SUBSTRATE_SS58_FORMAT must be an integer: {e}")))?
            .unwrap_or(42);
        let node_type = match env_var("NODE_TYPE").as_deref() {
            Some("archive") | None => NodeType::Archive,
            Some("full") | Some("light") => NodeType::Full,
            Some(other) => {
                return Err(HarvesterError::Config(format!(
                    "NODE_TYPE must be one of archive|full|light, got {other:?}"
                )))
            }
        };
        let type_registry = env_var("TYPE_REGISTRY").unwrap_or_else(|| "default".to_string());
        let installed_etl_databases = env_var("INSTALLED_ETL_DATABASES")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();
        let block_start = env_var("BLOCK_START")
            .map(|v| v.parse::<BlockNumber>())
            .transpose()
            .map_err(|e| HarvesterError::Config(format!("BLOCK_START must be an integer: {e}")))?;
        let block_end = env_var("BLOCK_END")
            .map(|v| v.parse::<BlockNumber>())
            .transpose()
            .map_err(|e| HarvesterError::Config(format!("BLOCK_END must be an integer: {e}")))?;
        let debug = env_var("DEBUG").is_some();
        let prometheus = env_var("PROMETHEUS").is_some();

        Ok(Self {
            db_connection,
            substrate_rpc_url,
            substrate_ss58_format,
            node_type,
            type_registry,
            installed_etl_databases,
            block_start,
            block_end,
            debug,
            prometheus,
        })
    }
}

/// The mutable half: enable flags reloaded from [`harvester_storage::HarvesterStatus`]
/// at the top of every supervisor iteration. Every stage reads the value
/// handed to it rather than reaching back into the store mid-iteration.
#[derive(Debug, Clone, Default)]
pub struct SettingsSnapshot {
    pub harvester_enabled: bool,
    stage_enabled: HashMap<Stage, bool>,
}

impl SettingsSnapshot {
    /// Reloads from the flat `key -> value` status rows. Per-stage flags
    /// default to enabled when unset, so a fresh install runs every stage
    /// rather than silently doing nothing until an operator opts in.
    pub fn reload(rows: &[harvester_storage::HarvesterStatus]) -> Self {
        let lookup: HashMap<&str, &str> = rows.iter().map(|r| (r.key.as_str(), r.value.as_str())).collect();
        let is_true = |key: &str| lookup.get(key).map(|v| *v == "true").unwrap_or(true);

        let harvester_enabled = lookup.get(status_keys::ENABLE_HARVESTER).map(|v| *v == "true").unwrap_or(false);
        let stage_enabled = Stage::ALL
            .iter()
            .map(|stage| (*stage, is_true(enable_key(*stage))))
            .collect();

        Self {
            harvester_enabled,
            stage_enabled,
        }
    }

    /// Whether `stage` should run this iteration, honoring both the
    /// master switch and the per-stage switch.
    pub fn stage_enabled(&self, stage: Stage) -> bool {
        self.harvester_enabled && self.stage_enabled.get(&stage).copied().unwrap_or(true)
    }
}

/// Maps a [`Stage`] onto its `HarvesterStatus` enable-flag key.
fn enable_key(stage: Stage) -> &'static str {
    match stage {
        Stage::Blocks => status_keys::ENABLE_BLOCKS,
        Stage::State => status_keys::ENABLE_STATE,
        Stage::Decode => status_keys::ENABLE_DECODE,
        Stage::Cron => status_keys::ENABLE_CRON,
        Stage::Etl => status_keys::ENABLE_ETL,
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
