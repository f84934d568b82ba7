// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Snapshot of supervisor health exposed over the Prometheus endpoint
//! and used by the facade's `system_*` methods. The `prometheus` crate
//! owns the actual histogram/gauge/counter registration in `oj-engine`;
//! this struct is the plain-data view shared with `oj-wire`/`oj-cli`.

use crate::stage::Stage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsHealth {
    /// The stage currently executing, or `None` when the loop is idle
    /// between iterations.
    pub running_stage: Option<Stage>,
    /// Total supervisor loop iterations completed since process start.
    pub iterations: u64,
    /// Most recent per-block retrieval latency observed, in milliseconds.
    pub last_block_latency_ms: Option<f64>,
}

impl MetricsHealth {
    pub fn idle() -> Self {
        Self {
            running_stage: None,
            iterations: 0,
            last_block_latency_ms: None,
        }
    }

    /// The gauge string rendering: stage name, or `-` when idle.
    pub fn running_stage_label(&self) -> String {
        match self.running_stage {
            Some(stage) => stage.to_string(),
            None => "-".to_string(),
        }
    }
}

impl Default for MetricsHealth {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
