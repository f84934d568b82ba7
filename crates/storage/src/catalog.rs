// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime Catalog: one snapshot of pallets/calls/events/storage/constants
//! per (spec_name, spec_version), built once per new runtime by the
//! Runtime Catalog Builder and then read-only for the lifetime of that
//! spec version.

use serde::{Deserialize, Serialize};

/// Aggregate row for one runtime spec version. Counters are maintained
/// as the sum of the same counters across this runtime's pallets.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct Runtime {
    pub spec_name: String,
    pub spec_version: i32,
    pub count_call_functions: i32,
    pub count_events: i32,
    pub count_pallets: i32,
    pub count_storage_functions: i32,
    pub count_constants: i32,
    pub count_errors: i32,
}

/// key = (spec_name, spec_version, pallet_index). `pallet_index` is the
/// metadata's explicit `index` field when present, else the pallet's
/// position in the pallets sequence.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimePallet {
    pub spec_name: String,
    pub spec_version: i32,
    pub pallet_index: i32,
    pub pallet: String,
    pub count_call_functions: i32,
    pub count_events: i32,
    pub count_storage_functions: i32,
    pub count_constants: i32,
    pub count_errors: i32,
}

/// key = (spec_name, spec_version, call_lookup). `call_lookup` is the
/// 2-byte `pallet_index || call_index` pair, hex-encoded.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeCall {
    pub spec_name: String,
    pub spec_version: i32,
    pub call_lookup: String,
    pub pallet: String,
    pub call_name: String,
    pub lookup: String,
    pub documentation: Option<String>,
}

/// key = (spec_name, spec_version, call_lookup, arg_idx). `scale_type`
/// prefers the metadata's `typeName` annotation, falling back to `type`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeCallArgument {
    pub spec_name: String,
    pub spec_version: i32,
    pub call_lookup: String,
    pub arg_idx: i32,
    pub name: String,
    pub scale_type: String,
}

/// key = (spec_name, spec_version, event_lookup). Same two-byte
/// construction as [`RuntimeCall::call_lookup`], using `event_index`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeEvent {
    pub spec_name: String,
    pub spec_version: i32,
    pub event_lookup: String,
    pub pallet: String,
    pub event_name: String,
    pub lookup: String,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeEventAttribute {
    pub spec_name: String,
    pub spec_version: i32,
    pub event_lookup: String,
    pub arg_idx: i32,
    pub name: String,
    pub scale_type: String,
}

/// Shape of a storage entry: `Plain` has a single declared type;
/// `Map` has a hasher, key type, and value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "storage_shape", rename_all = "snake_case")]
pub enum StorageShape {
    Plain,
    Map,
}

/// key = (spec_name, spec_version, pallet, storage_name). `default_value`
/// is taken from the metadata's `default` field, falling back to
/// `fallback` when `default` is absent.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeStorage {
    pub spec_name: String,
    pub spec_version: i32,
    pub pallet: String,
    pub storage_name: String,
    pub shape: StorageShape,
    pub key_scale_type: Option<String>,
    pub value_scale_type: String,
    pub hasher: Option<String>,
    pub default_value: Vec<u8>,
    pub documentation: Option<String>,
}

/// key = (spec_name, spec_version, pallet, constant_name). Successfully
/// decoded byte arrays are hex-serialized; composite values are
/// JSON-serialized; if decoding the raw bytes against the declared type
/// fails, `value` stores the raw bytes instead under the `"raw"` tag.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeConstant {
    pub spec_name: String,
    pub spec_version: i32,
    pub pallet: String,
    pub constant_name: String,
    pub scale_type: String,
    pub value: serde_json::Value,
    pub documentation: Option<String>,
}

/// key = (spec_name, spec_version, pallet, error_name).
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeErrorMessage {
    pub spec_name: String,
    pub spec_version: i32,
    pub pallet: String,
    pub error_name: String,
    pub documentation: Option<String>,
}

/// key = (spec_name, spec_version, scale_type). One row per type
/// enumerated in the decoder's type registry at the block hash this
/// runtime was first observed at.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize)]
pub struct RuntimeType {
    pub spec_name: String,
    pub spec_version: i32,
    pub scale_type: String,
    pub decoder_class: String,
    pub is_primitive: bool,
}

/// Builds the 2-byte `pallet_index || call_or_event_index` lookup key
/// used by [`RuntimeCall::call_lookup`] and [`RuntimeEvent::event_lookup`].
pub fn lookup_key(pallet_index: u8, item_index: u8) -> String {
    format!("0x{:02x}{:02x}", pallet_index, item_index)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
