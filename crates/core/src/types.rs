// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Primitive newtypes shared across every harvester crate: block hashes,
//! block numbers, and the (spec_name, spec_version) runtime coordinate
//! that keys the metadata/catalog tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 32-byte block or extrinsic hash, hex-encoded on the wire.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash(pub [u8; 32]);

impl BlockHash {
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let mut buf = [0u8; 32];
        hex::decode_to_slice(s, &mut buf)?;
        Ok(Self(buf))
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlockHash({})", self.to_hex())
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BlockHash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A block height. Always non-negative; stored as `i64` to match the
/// signed integer columns used throughout the persistence layer.
pub type BlockNumber = i64;

/// The (spec_name, spec_version) pair that uniquely identifies a runtime
/// and keys every Runtime Catalog and CodecMetadata row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RuntimeCoordinate {
    pub spec_name: String,
    pub spec_version: u32,
}

impl RuntimeCoordinate {
    pub fn new(spec_name: impl Into<String>, spec_version: u32) -> Self {
        Self {
            spec_name: spec_name.into(),
            spec_version,
        }
    }
}

impl fmt::Display for RuntimeCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.spec_name, self.spec_version)
    }
}

/// A declared SCALE type string, e.g. `"Extrinsic"` or
/// `"sp_runtime::generic::digest::DigestItem"`. Kept as an owned string
/// rather than an enum since the catalog grows new type names at
/// runtime from live metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScaleType(pub String);

impl ScaleType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScaleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ScaleType {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ScaleType {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
