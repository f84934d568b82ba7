// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `harvester run` — starts the supervisor loop (§4.1) against a live
//! node and database, per the explicit arguments given on the command
//! line rather than the environment alone.

use std::sync::Arc;

use clap::{Args, ValueEnum};
use harvester_core::{Action, BlockNumber, HarvesterResult, Interrupt, NodeType, Stage};
use harvester_engine::supervisor::LiveRpcConnector;
use harvester_engine::{Metrics, Settings};
use harvester_storage::PgStore;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NodeTypeArg {
    Archive,
    Full,
    Light,
}

impl From<NodeTypeArg> for NodeType {
    fn from(arg: NodeTypeArg) -> Self {
        match arg {
            NodeTypeArg::Archive => NodeType::Archive,
            NodeTypeArg::Full | NodeTypeArg::Light => NodeType::Full,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum JobArg {
    Blocks,
    State,
    Decode,
    Cron,
    Etl,
    All,
}

impl From<JobArg> for Action {
    fn from(arg: JobArg) -> Self {
        match arg {
            JobArg::Blocks => Action::Stage(Stage::Blocks),
            JobArg::State => Action::Stage(Stage::State),
            JobArg::Decode => Action::Stage(Stage::Decode),
            JobArg::Cron => Action::Stage(Stage::Cron),
            JobArg::Etl => Action::Stage(Stage::Etl),
            JobArg::All => Action::All,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Verbose logging (DEBUG level instead of INFO).
    #[arg(long)]
    pub verbose: bool,

    /// Start the Prometheus metrics endpoint on port 9616.
    #[arg(long)]
    pub prometheus: bool,

    /// Run even if ENABLE_HARVESTER is currently false in the database.
    #[arg(long)]
    pub force_start: bool,

    /// Node connectivity mode; overrides NODE_TYPE.
    #[arg(long = "type", value_enum)]
    pub r#type: Option<NodeTypeArg>,

    /// Restrict this run to a single pipeline stage instead of the full pipeline.
    #[arg(long, value_enum, default_value = "all")]
    pub job: JobArg,

    /// Lower bound on blocks to retrieve; overrides BLOCK_START.
    #[arg(long)]
    pub block_start: Option<BlockNumber>,

    /// Upper bound on blocks to retrieve; overrides BLOCK_END.
    #[arg(long)]
    pub block_end: Option<BlockNumber>,
}

pub async fn run(args: RunArgs) -> HarvesterResult<()> {
    let mut settings = Settings::from_env()?;
    if let Some(node_type) = args.r#type {
        settings.node_type = node_type.into();
    }
    if args.block_start.is_some() {
        settings.block_start = args.block_start;
    }
    if args.block_end.is_some() {
        settings.block_end = args.block_end;
    }
    if args.prometheus {
        settings.prometheus = true;
    }
    if args.verbose {
        settings.debug = true;
    }

    let store = Arc::new(PgStore::connect(&settings.db_connection).await?);
    if args.force_start {
        store
            .set_status(harvester_storage::status_keys::ENABLE_HARVESTER, "true")
            .await?;
        store.commit().await?;
    }

    let interrupt = Interrupt::new();
    spawn_signal_handler(interrupt.clone());

    let metrics = Arc::new(Metrics::new());
    if settings.prometheus {
        let metrics_for_server = metrics.clone();
        tokio::spawn(async move {
            if let Err(e) = harvester_engine::metrics::serve(metrics_for_server).await {
                tracing::error!(error = %e, "metrics endpoint exited");
            }
        });
    }

    let connector = Arc::new(LiveRpcConnector {
        url: settings.substrate_rpc_url.clone(),
    });
    let cache = harvester_decode::MetadataCache::new();
    let action: Action = args.job.into();

    info!(?action, node_type = %settings.node_type, "starting supervisor");
    harvester_engine::run(action, &settings, store, connector, cache, interrupt, metrics).await
}

#[cfg(unix)]
fn spawn_signal_handler(interrupt: Interrupt) {
    tokio::spawn(async move {
        let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
        info!("shutdown signal received");
        interrupt.trigger();
    });
}

#[cfg(not(unix))]
fn spawn_signal_handler(interrupt: Interrupt) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.trigger();
        }
    });
}
