// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harvester-engine: the supervisor loop and the per-stage jobs it
//! drives (§4.1-§4.8), plus the `Settings`/`Metrics` ambient pieces the
//! binary crate wires up at process start.

pub mod jobs;
pub mod metrics;
pub mod settings;
pub mod supervisor;

pub use metrics::Metrics;
pub use settings::{Settings, SettingsSnapshot};
pub use supervisor::{run, LiveRpcConnector, RpcConnector};
