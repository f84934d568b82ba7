// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting shared by the `storage-tasks`/`storage-cron` list
//! commands: plain text or newline-delimited JSON, selected per-command
//! with `--format`.

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Renders `items` via `json` (one array) when `format` is [`OutputFormat::Json`],
/// otherwise calls `text` to print the human-readable form.
pub fn print_list<T: Serialize>(format: OutputFormat, items: &[T], empty_message: &str, text: impl FnOnce(&[T])) {
    match format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{rendered}");
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{empty_message}");
            } else {
                text(items);
            }
        }
    }
}
