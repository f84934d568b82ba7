// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cooperative shutdown token threaded through every stage.
//!
//! Replaces swapping the process signal handler per-stage: one
//! [`Interrupt`] is constructed at startup, a single signal handler
//! flips it, and stages poll [`Interrupt::is_set`] between units of
//! work (per block, per row) rather than being torn down mid-write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Flip the token. Called from the signal handler.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Poll the token. Called between units of work inside a stage.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "interrupt_tests.rs"]
mod tests;
