// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! harvester-decode: the SCALE Decoder Runtime and Runtime Catalog Builder.
//!
//! Loads a chain's metadata once per (spec_name, spec_version), normalizes
//! it into [`metadata::DecodedMetadata`], and exposes decode operations
//! for extrinsics, digest log items, storage entries, and events against
//! an explicit [`context::DecodeContext`] rather than hidden per-call
//! state. [`catalog_builder`] walks the same normalized metadata once per
//! new runtime to populate the Runtime Catalog tables.

pub mod catalog_builder;
pub mod context;
pub mod digest;
pub mod events;
pub mod extrinsic;
pub mod hashing;
pub mod metadata;
pub mod storage_entry;
pub mod value;

pub use context::{DecodeContext, MetadataCache};
pub use hashing::{extrinsic_hash, storage_key_prefix};
pub use metadata::{DecodedMetadata, MetadataError};

/// Storage key `xxh128("System") || xxh128("Events")`. Compile-time
/// constant per §4.5/§6 rather than recomputed per block.
pub const STORAGE_KEY_EVENTS: &str =
    "0x26aa394eea5630e07c48ae0c9558cef780d41e5e16056765bc8461851072c9d7";
