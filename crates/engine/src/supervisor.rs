// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The outer loop (§4.1): reloads settings, runs the pipeline in order,
//! reconnects on transient RPC failure, and exits cleanly on shutdown.
//!
//! Single-threaded and cooperative, per §5 — stages are `.await`ed in
//! turn rather than spawned, so there is never more than one in-flight
//! write to the current-runtime pointer or the decoder's metadata cache.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use harvester_core::{Action, HarvesterError, HarvesterResult, Interrupt, NodeType, Stage};
use harvester_decode::MetadataCache;
use harvester_rpc::{NodeRpc, RpcClient};
use harvester_storage::Store;
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::jobs;
use crate::metrics::Metrics;
use crate::settings::{Settings, SettingsSnapshot};

/// Between iterations: commit, bump the iteration counter, sleep. Per §4.1.
const ITERATION_SLEEP: Duration = Duration::from_secs(3);

/// Backoff between reconnect attempts on a transient-connection error,
/// matching [`harvester_rpc::client`]'s own connect-retry backoff.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(27);

/// Produces a connected [`NodeRpc`] handle. The supervisor reconnects
/// through this rather than owning a concrete [`RpcClient`] directly, so
/// tests can hand it a connector that reconnects to a [`harvester_rpc::FakeRpcClient`].
#[async_trait]
pub trait RpcConnector: Send + Sync {
    async fn connect(&self) -> HarvesterResult<Arc<dyn NodeRpc>>;
}

/// Connects to the live node websocket named by `SUBSTRATE_RPC_URL`.
pub struct LiveRpcConnector {
    pub url: String,
}

#[async_trait]
impl RpcConnector for LiveRpcConnector {
    async fn connect(&self) -> HarvesterResult<Arc<dyn NodeRpc>> {
        let client = RpcClient::connect(self.url.as_str()).await?;
        Ok(Arc::new(client) as Arc<dyn NodeRpc>)
    }
}

/// Pipeline order per §2's control-flow line: storage_tasks → cron →
/// retrieve_blocks → retrieve_runtime_state → scale_decode → etl. The
/// storage-task step isn't a [`Stage`] and is gated/invoked separately in
/// [`run_iteration`]; this covers the other five.
const PIPELINE_ORDER: [Stage; 5] = [Stage::Cron, Stage::Blocks, Stage::State, Stage::Decode, Stage::Etl];

fn ordered_stages(action: Action) -> Vec<Stage> {
    let requested = action.stages();
    PIPELINE_ORDER.into_iter().filter(|s| requested.contains(s)).collect()
}

/// What a loop iteration should do once a step has failed.
enum LoopSignal {
    /// Stop running further steps this iteration and fall through to the
    /// usual commit/sleep — next iteration starts fresh.
    Restart,
    /// Commit and return from [`run`] entirely.
    Exit,
}

/// Runs one pass of the pipeline for `action`, honoring `snapshot`'s
/// enable flags and `settings.node_type`'s archive gating.
#[allow(clippy::too_many_arguments)]
async fn run_iteration(
    action: Action,
    settings: &Settings,
    snapshot: &SettingsSnapshot,
    store: &Arc<dyn Store>,
    connector: &Arc<dyn RpcConnector>,
    rpc_cell: &Mutex<Arc<dyn NodeRpc>>,
    cache: &MetadataCache,
    interrupt: &Interrupt,
    metrics: &Metrics,
) -> Result<(), LoopSignal> {
    // The storage-task worker drains alongside the cron job, per §4.1's
    // `action in {cron, all}` gate, not on every iteration.
    if action.stages().contains(&Stage::Cron) {
        let rpc = rpc_cell.lock().clone();
        run_step(
            "storage_task",
            jobs::storage_task::run(store, &rpc, cache, interrupt),
            connector,
            rpc_cell,
            interrupt,
        )
        .await?;
    }

    for stage in ordered_stages(action) {
        if stage.requires_archive() && settings.node_type != NodeType::Archive {
            continue;
        }
        if !snapshot.stage_enabled(stage) {
            continue;
        }
        if interrupt.is_set() {
            return Err(LoopSignal::Exit);
        }

        metrics.set_current_stage(Some(stage));
        let rpc = rpc_cell.lock().clone();
        let outcome = run_step(
            stage,
            run_stage(stage, store, &rpc, cache, interrupt, settings, metrics),
            connector,
            rpc_cell,
            interrupt,
        )
        .await;
        metrics.set_current_stage(None);
        outcome?;
    }

    Ok(())
}

/// Dispatches a single stage to its job. `Stage::Etl` doesn't need `rpc`
/// or `cache`; `Stage::Decode`/`Stage::Cron` don't need `rpc`.
async fn run_stage(
    stage: Stage,
    store: &Arc<dyn Store>,
    rpc: &Arc<dyn NodeRpc>,
    cache: &MetadataCache,
    interrupt: &Interrupt,
    settings: &Settings,
    metrics: &Metrics,
) -> HarvesterResult<()> {
    match stage {
        Stage::Blocks => jobs::retrieve_blocks::run(store, rpc, interrupt, Some(metrics)).await,
        Stage::State => jobs::retrieve_runtime_state::run(store, rpc, cache, interrupt).await,
        Stage::Decode => jobs::scale_decode::run(store, cache, interrupt).await,
        Stage::Cron => jobs::cron_retry::run(store, cache, interrupt).await,
        Stage::Etl => jobs::etl::run(store, &settings.installed_etl_databases).await,
    }
}

/// Runs `fut` and classifies the result per §7: shuts down cleanly,
/// reconnects and restarts the iteration on a transient failure, or logs
/// and restarts on anything else (a single record's decode failure is
/// caught inside its job and never reaches here as an `Err`).
async fn run_step<Fut>(
    label: impl std::fmt::Display,
    fut: Fut,
    connector: &Arc<dyn RpcConnector>,
    rpc_cell: &Mutex<Arc<dyn NodeRpc>>,
    interrupt: &Interrupt,
) -> Result<(), LoopSignal>
where
    Fut: Future<Output = HarvesterResult<()>>,
{
    match fut.await {
        Ok(()) => Ok(()),
        Err(e) if e.is_shutdown() => {
            info!(%label, "shutdown requested");
            Err(LoopSignal::Exit)
        }
        Err(e) if e.is_transient() => {
            warn!(%label, error = %e, "transient connection failure, reconnecting");
            match connect_with_backoff(connector, interrupt).await {
                Some(new_rpc) => {
                    *rpc_cell.lock() = new_rpc;
                    Err(LoopSignal::Restart)
                }
                None => Err(LoopSignal::Exit),
            }
        }
        Err(e) => {
            error!(%label, error = %e, "step failed, continuing next iteration");
            Err(LoopSignal::Restart)
        }
    }
}

/// Reconnects with [`RECONNECT_BACKOFF`] between attempts until one
/// succeeds or `interrupt` is observed, in which case `None` is returned
/// so the caller can unwind instead of retrying forever past a shutdown.
async fn connect_with_backoff(connector: &Arc<dyn RpcConnector>, interrupt: &Interrupt) -> Option<Arc<dyn NodeRpc>> {
    loop {
        if interrupt.is_set() {
            return None;
        }
        match connector.connect().await {
            Ok(rpc) => return Some(rpc),
            Err(e) => {
                warn!(error = %e, "reconnect attempt failed, backing off");
                tokio::time::sleep(RECONNECT_BACKOFF).await;
            }
        }
    }
}

/// The public supervisor contract: `run(action)`. Loops until `interrupt`
/// is observed or a step returns [`HarvesterError::Shutdown`].
pub async fn run(
    action: Action,
    settings: &Settings,
    store: Arc<dyn Store>,
    connector: Arc<dyn RpcConnector>,
    cache: MetadataCache,
    interrupt: Interrupt,
    metrics: Arc<Metrics>,
) -> HarvesterResult<()> {
    let Some(initial_rpc) = connect_with_backoff(&connector, &interrupt).await else {
        return Ok(());
    };
    let rpc_cell = Mutex::new(initial_rpc);

    loop {
        if interrupt.is_set() {
            return Ok(());
        }

        let snapshot = SettingsSnapshot::reload(&store.list_status().await?);

        if snapshot.harvester_enabled {
            match run_iteration(action, settings, &snapshot, &store, &connector, &rpc_cell, &cache, &interrupt, &metrics).await {
                Ok(()) | Err(LoopSignal::Restart) => {}
                Err(LoopSignal::Exit) => {
                    store.commit().await?;
                    return Ok(());
                }
            }
        }

        store.commit().await?;
        metrics.inc_job_count();
        tokio::time::sleep(ITERATION_SLEEP).await;
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
