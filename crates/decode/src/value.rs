// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bridges `scale_value::Value` and `serde_json::Value`. Every codec table
//! in `harvester-storage` stores decoded payloads as JSON, so this is the
//! single place that turns a SCALE value into what actually lands in a
//! row's `data` column.

use scale_info::PortableRegistry;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValueError {
    #[error("failed to decode type {type_id} at offset {offset}: {source}")]
    Decode {
        type_id: u32,
        offset: usize,
        #[source]
        source: scale_value::scale::DecodeError,
    },
    #[error("decoded value could not be represented as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0} leftover byte(s) after decoding type {1}")]
    TrailingBytes(usize, u32),
}

/// Decodes one SCALE-encoded value of `type_id` from the front of `bytes`,
/// consuming exactly as many bytes as the type needs, and renders it as
/// JSON. Returns the JSON value plus the number of bytes consumed, so
/// callers decoding a sequence of values back-to-back (storage keys,
/// extrinsic call arguments) can keep slicing the same buffer.
pub fn decode_prefix_to_json(bytes: &[u8], type_id: u32, registry: &PortableRegistry) -> Result<(serde_json::Value, usize), ValueError> {
    let mut cursor = bytes;
    let value = scale_value::scale::decode_as_type(&mut cursor, type_id, registry).map_err(|source| ValueError::Decode {
        type_id,
        offset: bytes.len() - cursor.len(),
        source,
    })?;
    let consumed = bytes.len() - cursor.len();
    let json = serde_json::to_value(&value)?;
    Ok((json, consumed))
}

/// Decodes one SCALE-encoded value of `type_id`, requiring the entire
/// buffer to be consumed. Used for storage values and constants, which are
/// never followed by other data in the same buffer.
pub fn decode_to_json(bytes: &[u8], type_id: u32, registry: &PortableRegistry) -> Result<serde_json::Value, ValueError> {
    let (json, consumed) = decode_prefix_to_json(bytes, type_id, registry)?;
    if consumed != bytes.len() {
        return Err(ValueError::TrailingBytes(bytes.len() - consumed, type_id));
    }
    Ok(json)
}

#[cfg(test)]
#[path = "value_tests.rs"]
mod tests;
