// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stage and node-type enums shared between the supervisor, the
//! Prometheus gauge, and the `run(action)` CLI surface.

use serde::{Deserialize, Serialize};

/// One of the five pipeline stages the supervisor can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    Blocks,
    State,
    Decode,
    Cron,
    Etl,
}

crate::simple_display! {
    Stage {
        Blocks => "blocks",
        State => "state",
        Decode => "decode",
        Cron => "cron",
        Etl => "etl",
    }
}

impl Stage {
    pub const ALL: [Stage; 5] = [Stage::Blocks, Stage::State, Stage::Decode, Stage::Cron, Stage::Etl];

    /// Stages that only run when the node is of type [`NodeType::Archive`].
    pub fn requires_archive(self) -> bool {
        matches!(self, Stage::State | Stage::Decode | Stage::Etl)
    }
}

/// The action surface named in the public supervisor contract:
/// `run(action ∈ {blocks,state,decode,cron,etl,all})`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Stage(Stage),
    All,
}

impl Action {
    pub fn stages(self) -> Vec<Stage> {
        match self {
            Action::Stage(s) => vec![s],
            Action::All => Stage::ALL.to_vec(),
        }
    }
}

impl std::str::FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blocks" => Ok(Action::Stage(Stage::Blocks)),
            "state" => Ok(Action::Stage(Stage::State)),
            "decode" => Ok(Action::Stage(Stage::Decode)),
            "cron" => Ok(Action::Stage(Stage::Cron)),
            "etl" => Ok(Action::Stage(Stage::Etl)),
            "all" => Ok(Action::All),
            other => Err(format!("unknown action: {other}")),
        }
    }
}

/// Node connectivity mode. Only `Archive` nodes expose the historical
/// state needed by the state/decode/etl stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Archive,
    Full,
}

crate::simple_display! {
    NodeType {
        Archive => "archive",
        Full => "full",
    }
}

#[cfg(test)]
#[path = "stage_tests.rs"]
mod tests;
