// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn kusama_9430() -> RuntimeCoordinate {
    RuntimeCoordinate::new("kusama", 9430)
}

#[test]
fn get_or_insert_parses_once_then_reuses_cache() {
    let cache = MetadataCache::new();
    let coordinate = kusama_9430();
    assert!(!cache.contains(&coordinate));

    // Garbage bytes: first call should fail to parse and must not poison the cache.
    let err = cache.get_or_insert(coordinate.clone(), &[9, 9, 9]).unwrap_err();
    assert!(matches!(err, MetadataError::Decode(_)));
    assert!(!cache.contains(&coordinate));
    assert!(cache.is_empty());
}

#[test]
fn distinct_coordinates_are_cached_independently() {
    let cache = MetadataCache::new();
    let a = RuntimeCoordinate::new("kusama", 9430);
    let b = RuntimeCoordinate::new("kusama", 9431);
    assert_eq!(cache.len(), 0);
    assert!(a != b);
}
