// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Explicit decode context and the per-runtime metadata cache.
//!
//! Every decode operation in this crate takes a [`DecodeContext`] rather
//! than reaching for ambient "current metadata" state. A [`MetadataCache`]
//! keyed by `(spec_name, spec_version)` is what the jobs in `harvester-engine`
//! hold onto across blocks, handing out a fresh [`DecodeContext`] only when
//! the runtime coordinate changes.

use std::collections::HashMap;
use std::sync::Arc;

use harvester_core::RuntimeCoordinate;
use parking_lot::RwLock;

use crate::metadata::{DecodedMetadata, MetadataError};

/// Everything a decode operation needs for one (spec_name, spec_version)
/// pair: the normalized metadata and, by extension, its type registry.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    pub coordinate: RuntimeCoordinate,
    pub metadata: Arc<DecodedMetadata>,
}

impl DecodeContext {
    pub fn new(coordinate: RuntimeCoordinate, metadata: Arc<DecodedMetadata>) -> Self {
        Self {
            coordinate,
            metadata,
        }
    }

    pub fn registry(&self) -> &scale_info::PortableRegistry {
        &self.metadata.registry
    }
}

/// Caches parsed [`DecodedMetadata`] per runtime coordinate so a block's
/// decode pass never re-parses the same metadata blob twice. Metadata is
/// immutable once published for a given `(spec_name, spec_version)`, so
/// entries never need invalidation, only insertion.
#[derive(Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<RuntimeCoordinate, Arc<DecodedMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached metadata for `coordinate`, or parses `raw` and
    /// caches the result if this is the first time this coordinate is seen.
    pub fn get_or_insert(
        &self,
        coordinate: RuntimeCoordinate,
        raw: &[u8],
    ) -> Result<DecodeContext, MetadataError> {
        if let Some(metadata) = self.entries.read().get(&coordinate) {
            return Ok(DecodeContext::new(coordinate, metadata.clone()));
        }

        let metadata = Arc::new(DecodedMetadata::from_bytes(raw)?);
        self.entries
            .write()
            .insert(coordinate.clone(), metadata.clone());
        Ok(DecodeContext::new(coordinate, metadata))
    }

    pub fn contains(&self, coordinate: &RuntimeCoordinate) -> bool {
        self.entries.read().contains_key(coordinate)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
