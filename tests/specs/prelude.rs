// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared scaffolding for the integration specs: a thin builder over
//! `assert_cmd::Command` for invoking the `harvester` binary, plus the
//! assertions the individual spec files chain off of.

use std::ffi::OsStr;

use assert_cmd::Command;

/// Starts a `harvester` invocation with `DB_CONNECTION`/`SUBSTRATE_RPC_URL`
/// cleared, so tests that only exercise argument parsing never
/// accidentally reach for a real database or node.
pub fn cli() -> CliCommand {
    let mut cmd = Command::cargo_bin("harvester").expect("harvester binary is built for the test run");
    cmd.env_remove("DB_CONNECTION");
    cmd.env_remove("SUBSTRATE_RPC_URL");
    CliCommand { cmd }
}

pub struct CliCommand {
    cmd: Command,
}

impl CliCommand {
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Runs the command, asserting it exits 0, and returns a handle for
    /// inspecting stdout/stderr.
    pub fn passes(mut self) -> Output {
        let assert = self.cmd.assert().success();
        Output::new(assert)
    }

    /// Runs the command, asserting it exits non-zero.
    pub fn fails(mut self) -> Output {
        let assert = self.cmd.assert().failure();
        Output::new(assert)
    }
}

pub struct Output {
    stdout: String,
    stderr: String,
}

impl Output {
    fn new(assert: assert_cmd::assert::Assert) -> Self {
        let output = assert.get_output().clone();
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    pub fn stdout_has(self, needle: &str) -> Self {
        assert!(
            self.stdout.contains(needle),
            "expected stdout to contain {needle:?}, got:\n{}",
            self.stdout
        );
        self
    }

    pub fn stderr_has(self, needle: &str) -> Self {
        assert!(
            self.stderr.contains(needle),
            "expected stderr to contain {needle:?}, got:\n{}",
            self.stderr
        );
        self
    }
}
