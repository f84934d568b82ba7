// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Integration specs run against the built `harvester` binary.

#[path = "specs/prelude.rs"]
mod prelude;

mod cli {
    #[path = "../specs/cli/help.rs"]
    mod help;
    #[path = "../specs/cli/run.rs"]
    mod run;
}
