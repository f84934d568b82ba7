// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `harvester` — the command-line entry point: `run` starts the
//! supervisor loop; `storage-tasks`/`storage-cron` manage the control
//! tables an operator would otherwise have to edit by hand.

mod commands;
mod exit_error;
mod output;

use clap::{Parser, Subcommand};
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "harvester", version, about = "Substrate block harvester")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the supervisor loop.
    Run(commands::run::RunArgs),
    /// Manage queued ad-hoc storage scans.
    StorageTasks(commands::storage_tasks::StorageTasksArgs),
    /// Manage recurring storage captures.
    StorageCron(commands::storage_cron::StorageCronArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let verbose = matches!(&cli.command, Command::Run(args) if args.verbose) || std::env::var("DEBUG").is_ok();
    init_tracing(verbose);

    let result = dispatch(cli).await;
    if let Err(e) = result {
        tracing::error!(error = %e, "harvester exited with an error");
        eprintln!("error: {e}");
        std::process::exit(e.code);
    }
}

async fn dispatch(cli: Cli) -> Result<(), ExitError> {
    match cli.command {
        Command::Run(args) => commands::run::run(args).await.map_err(ExitError::from),
        Command::StorageTasks(args) => {
            let db_connection = resolve_db_connection()?;
            commands::storage_tasks::run(args, &db_connection).await.map_err(ExitError::from)
        }
        Command::StorageCron(args) => {
            let db_connection = resolve_db_connection()?;
            commands::storage_cron::run(args, &db_connection).await.map_err(ExitError::from)
        }
    }
}

/// `storage-tasks`/`storage-cron` only need the database, so they read
/// just `DB_CONNECTION` rather than the full [`harvester_engine::Settings`]
/// (which also requires `SUBSTRATE_RPC_URL`).
fn resolve_db_connection() -> Result<String, ExitError> {
    std::env::var("DB_CONNECTION")
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ExitError::new(1, "DB_CONNECTION is required but not set"))
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
