// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn starts_unset() {
    let interrupt = Interrupt::new();
    assert!(!interrupt.is_set());
}

#[test]
fn trigger_sets_the_token() {
    let interrupt = Interrupt::new();
    interrupt.trigger();
    assert!(interrupt.is_set());
}

#[test]
fn clones_share_the_same_token() {
    let interrupt = Interrupt::new();
    let clone = interrupt.clone();
    clone.trigger();
    assert!(interrupt.is_set());
}

#[test]
fn default_starts_unset() {
    let interrupt = Interrupt::default();
    assert!(!interrupt.is_set());
}
