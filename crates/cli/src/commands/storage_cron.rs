// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `harvester storage-cron` — manages recurring [`HarvesterStorageCron`]
//! captures consulted by the Retrieve-Runtime-State job (§4.3/§4.9).

use std::sync::Arc;

use clap::{Args, Subcommand};
use harvester_core::HarvesterResult;
use harvester_storage::control::HarvesterStorageCron;
use harvester_storage::{PgStore, StorageCronId, Store};

use crate::output::{print_list, OutputFormat};

#[derive(Args, Debug)]
pub struct StorageCronArgs {
    #[command(subcommand)]
    pub command: StorageCronCommand,
}

#[derive(Subcommand, Debug)]
pub enum StorageCronCommand {
    /// List recurring storage captures.
    List {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Add a recurring capture.
    Add {
        /// Capture on every block number divisible by this interval.
        interval: i32,
        /// Pallet name, e.g. "System".
        pallet: String,
        /// Storage item name, e.g. "Events".
        storage: String,
    },
    /// Remove a recurring capture by id.
    Rm { id: String },
}

pub async fn run(args: StorageCronArgs, db_connection: &str) -> HarvesterResult<()> {
    match args.command {
        StorageCronCommand::Add { interval, pallet, storage } => {
            let cron = HarvesterStorageCron {
                id: StorageCronId::new(),
                block_number_interval: interval,
                pallet,
                storage_name: storage,
                storage_key: None,
                active: true,
            };

            let store = connect(db_connection).await?;
            store.add_storage_cron(&cron).await?;
            store.commit().await?;
            println!("added storage cron {}", cron.id);
            Ok(())
        }
        StorageCronCommand::Rm { id } => {
            let store = connect(db_connection).await?;
            store.remove_storage_cron(&id).await?;
            store.commit().await?;
            println!("removed storage cron {id}");
            Ok(())
        }
        StorageCronCommand::List { format } => {
            let store = connect(db_connection).await?;
            let crons = store.list_active_storage_crons().await?;
            print_list(format, &crons, "no storage crons configured", |crons| {
                for cron in crons {
                    println!(
                        "{}  every {} blocks  {}.{}",
                        cron.id, cron.block_number_interval, cron.pallet, cron.storage_name
                    );
                }
            });
            Ok(())
        }
    }
}

async fn connect(db_connection: &str) -> HarvesterResult<Arc<dyn Store>> {
    Ok(Arc::new(PgStore::connect(db_connection).await?))
}
