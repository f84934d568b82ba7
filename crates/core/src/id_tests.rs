// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::HashMap;

// --- define_id! macro tests ---

crate::define_id! {
    /// Test ID type for macro verification.
    pub struct TestId("test");
}

#[test]
fn new_id_has_expected_prefix_and_length() {
    let id = TestId::new();
    assert!(id.as_str().starts_with("test"));
    assert_eq!(id.as_str().len(), ID_MAX_LEN);
}

#[test]
fn new_ids_are_unique() {
    let a = TestId::new();
    let b = TestId::new();
    assert_ne!(a, b);
}

#[test]
fn from_string_round_trips() {
    let id = TestId::from_string("test0000000000000000001");
    assert_eq!(id.as_str(), "test0000000000000000001");
}

#[test]
fn display_matches_as_str() {
    let id = TestId::new();
    assert_eq!(id.to_string(), id.as_str());
}

#[test]
fn default_generates_new_id() {
    let id = TestId::default();
    assert!(!id.is_empty());
}

#[test]
fn hash_map_lookup_by_borrowed_str() {
    let id = TestId::from_string("test0000000000000000001");
    let mut map = HashMap::new();
    map.insert(id, 42);
    assert_eq!(map.get("test0000000000000000001"), Some(&42));
}

#[test]
fn serde_round_trip() {
    let id = TestId::new();
    let json = serde_json::to_string(&id).unwrap();
    let back: TestId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);
}

// --- IdBuf tests ---

#[test]
fn id_buf_round_trips_short_string() {
    let buf = IdBuf::new("short");
    assert_eq!(buf.as_str(), "short");
    assert!(!buf.is_empty());
}

#[test]
fn id_buf_empty() {
    let buf = IdBuf::empty();
    assert!(buf.is_empty());
    assert_eq!(buf.as_str(), "");
}

// --- short() tests ---

#[test]
fn short_truncates_long_strings() {
    let s = "abcdefghijklmnop";
    assert_eq!(short(s, 8), "abcdefgh");
    assert_eq!(short(s, 100), s);
    assert_eq!(short("abc", 8), "abc");
}
