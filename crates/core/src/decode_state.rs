// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit decode-state machine for codec-layer rows.
//!
//! Replaces the raw data model's two independent `complete`/`retry`
//! booleans with one enum plus an attempt counter, so a "decode failed
//! and gave up" row is distinguishable from "never attempted" rather
//! than both reading as `retry=false, complete=false`.

use serde::{Deserialize, Serialize};

/// Maximum retry attempts the cron-retry job will make on a single row
/// before it transitions to [`DecodeState::FailedExhausted`].
pub const MAX_DECODE_ATTEMPTS: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "decode_state", rename_all = "snake_case")]
pub enum DecodeState {
    /// Never attempted.
    Fresh,
    /// A prior attempt failed; eligible for another attempt by the cron job.
    Retry,
    /// Decoded successfully. Terminal — the pipeline never mutates the row again.
    Complete,
    /// Retried and failed again; the cron job gives up on this row. Terminal.
    FailedExhausted,
}

impl DecodeState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::FailedExhausted)
    }

    /// Transition on a fresh decode attempt (ScaleDecode job path).
    ///
    /// Success always goes to `Complete`; failure always goes to `Retry`,
    /// regardless of the state it started in — a fresh attempt never
    /// observes `FailedExhausted` (that state is reached only via
    /// [`advance_retry`](Self::advance_retry)).
    pub fn advance(self, attempts: u32, success: bool) -> (Self, u32) {
        if success {
            (Self::Complete, attempts)
        } else {
            (Self::Retry, attempts)
        }
    }

    /// Transition on a retry attempt (cron-retry job path). Bounds the
    /// number of retries via [`MAX_DECODE_ATTEMPTS`]; a failed retry past
    /// the bound becomes terminal rather than looping forever.
    pub fn advance_retry(self, attempts: u32, success: bool) -> (Self, u32) {
        let next_attempts = attempts + 1;
        if success {
            (Self::Complete, next_attempts)
        } else if next_attempts >= MAX_DECODE_ATTEMPTS {
            (Self::FailedExhausted, next_attempts)
        } else {
            (Self::Retry, next_attempts)
        }
    }
}

impl Default for DecodeState {
    fn default() -> Self {
        Self::Fresh
    }
}

#[cfg(test)]
#[path = "decode_state_tests.rs"]
mod tests;
