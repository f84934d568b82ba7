// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `harvester storage-tasks` — queues and inspects ad-hoc
//! [`HarvesterStorageTask`] scans (§4.8).

use std::sync::Arc;

use clap::{Args, Subcommand};
use harvester_core::HarvesterResult;
use harvester_decode::storage_key_prefix;
use harvester_storage::control::{BlocksSpec, HarvesterStorageTask};
use harvester_storage::{PgStore, StorageTaskId, Store};

use crate::output::{print_list, OutputFormat};

#[derive(Args, Debug)]
pub struct StorageTasksArgs {
    #[command(subcommand)]
    pub command: StorageTasksCommand,
}

#[derive(Subcommand, Debug)]
pub enum StorageTasksCommand {
    /// List queued storage tasks.
    List {
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Remove every completed task.
    Clean,
    /// Queue a new storage scan.
    Add {
        /// Pallet name, e.g. "System".
        pallet: String,
        /// Storage item name, e.g. "Events".
        storage: String,
        /// Blocks expression: `N`, `N,M,...`, or `N-M`.
        blocks: String,
        /// Scan the full key-prefix (a map) rather than a single key.
        #[arg(long)]
        prefix: bool,
    },
    /// Remove a queued task by id.
    Rm { id: String },
}

pub async fn run(args: StorageTasksArgs, db_connection: &str) -> HarvesterResult<()> {
    match args.command {
        StorageTasksCommand::Add { pallet, storage, blocks, prefix } => {
            let spec = BlocksSpec::parse(&blocks).map_err(harvester_core::HarvesterError::Config)?;
            let key = storage_key_prefix(&pallet, &storage);
            #[allow(clippy::expect_used)]
            let blocks_value = serde_json::to_value(&spec).expect("BlocksSpec always serializes");
            let task = HarvesterStorageTask {
                id: StorageTaskId::new(),
                blocks: blocks_value,
                storage_pallet: pallet,
                storage_name: storage,
                storage_key: if prefix { None } else { Some(key.clone()) },
                storage_key_prefix: if prefix { Some(key) } else { None },
                complete: false,
            };

            let store = connect(db_connection).await?;
            store.add_storage_task(&task).await?;
            store.commit().await?;
            println!("queued storage task {}", task.id);
            Ok(())
        }
        StorageTasksCommand::Rm { id } => {
            let store = connect(db_connection).await?;
            store.remove_storage_task(&id).await?;
            store.commit().await?;
            println!("removed storage task {id}");
            Ok(())
        }
        StorageTasksCommand::Clean => {
            let store = connect(db_connection).await?;
            let tasks = store.list_storage_tasks().await?;
            let mut removed = 0;
            for task in tasks.iter().filter(|t| t.complete) {
                store.remove_storage_task(task.id.as_str()).await?;
                removed += 1;
            }
            store.commit().await?;
            println!("removed {removed} completed task(s)");
            Ok(())
        }
        StorageTasksCommand::List { format } => {
            let store = connect(db_connection).await?;
            let tasks = store.list_storage_tasks().await?;
            print_list(format, &tasks, "no storage tasks queued", |tasks| {
                for task in tasks {
                    println!("{}  complete={}  blocks={}", task.id, task.complete, task.blocks);
                }
            });
            Ok(())
        }
    }
}

async fn connect(db_connection: &str) -> HarvesterResult<Arc<dyn Store>> {
    Ok(Arc::new(PgStore::connect(db_connection).await?))
}
