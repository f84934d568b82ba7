// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Prometheus gauges/histogram/counter the supervisor updates every
//! iteration, and the axum HTTP endpoint that exposes them on port
//! 9616 in text format, per §4.1/§6.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use harvester_core::Stage;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGaugeVec, Opts, Registry, TextEncoder};
use tracing::info;

/// The port the metrics endpoint listens on, per §6.
pub const METRICS_PORT: u16 = 9616;

const ALL_STAGE_LABELS: [&str; 5] = ["blocks", "state", "decode", "cron", "etl"];

/// Owns the process's Prometheus registry and the three series named in
/// §4.1/§6: a per-block retrieval latency histogram, an enum gauge for
/// the currently running stage, and a completed-iterations counter.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    block_process_speed: Histogram,
    current_job: IntGaugeVec,
    job_count: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        // Static metric configuration (names, help text, label sets) — infallible.
        #[allow(clippy::expect_used)]
        let block_process_speed =
            Histogram::with_opts(HistogramOpts::new("block_process_speed", "per-block retrieval latency in milliseconds"))
                .expect("static histogram config is valid");
        #[allow(clippy::expect_used)]
        registry
            .register(Box::new(block_process_speed.clone()))
            .expect("unique metric name");

        #[allow(clippy::expect_used)]
        let current_job = IntGaugeVec::new(Opts::new("current_job", "the pipeline stage currently executing"), &["stage"])
            .expect("static gauge config is valid");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(current_job.clone())).expect("unique metric name");
        for label in ALL_STAGE_LABELS {
            current_job.with_label_values(&[label]).set(0);
        }

        #[allow(clippy::expect_used)]
        let job_count = IntCounter::new("job_count", "completed supervisor loop iterations").expect("static counter config is valid");
        #[allow(clippy::expect_used)]
        registry.register(Box::new(job_count.clone())).expect("unique metric name");

        Self {
            registry,
            block_process_speed,
            current_job,
            job_count,
        }
    }

    pub fn observe_block_latency_ms(&self, ms: f64) {
        self.block_process_speed.observe(ms);
    }

    /// Sets the enum gauge: the active stage's label reads 1, every
    /// other label reads 0. `None` clears every label to 0 (the "-"
    /// idle state described in §4.1).
    pub fn set_current_stage(&self, stage: Option<Stage>) {
        let active = stage.map(|s| s.to_string());
        for label in ALL_STAGE_LABELS {
            let value = if active.as_deref() == Some(label) { 1 } else { 0 };
            self.current_job.with_label_values(&[label]).set(value);
        }
    }

    pub fn inc_job_count(&self) {
        self.job_count.inc();
    }

    pub fn job_count(&self) -> u64 {
        self.job_count.get()
    }

    /// Renders every registered metric in Prometheus text exposition format.
    pub fn gather(&self) -> String {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buf = Vec::new();
        // Valid metric families always encode; the registry only ever holds
        // the series registered above.
        #[allow(clippy::expect_used)]
        encoder.encode(&families, &mut buf).expect("text encoding never fails for valid metric families");
        #[allow(clippy::expect_used)]
        let text = String::from_utf8(buf).expect("prometheus text encoder always emits valid utf-8");
        text
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

async fn metrics_handler(State(metrics): State<Arc<Metrics>>) -> impl IntoResponse {
    (
        [("content-type", "text/plain; version=0.0.4")],
        metrics.gather(),
    )
}

/// Spawns the metrics HTTP server as a background task, bound to
/// `0.0.0.0:9616`. Only started when `--prometheus`/`PROMETHEUS` is set.
pub async fn serve(metrics: Arc<Metrics>) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], METRICS_PORT));
    let app = Router::new().route("/metrics", get(metrics_handler)).with_state(metrics);
    info!(%addr, "metrics endpoint listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
#[path = "metrics_tests.rs"]
mod tests;
