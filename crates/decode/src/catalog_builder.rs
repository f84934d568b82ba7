// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime Catalog Builder: walks a [`DecodedMetadata`] once per new
//! `(spec_name, spec_version)` and produces the flat rows the Retrieve
//! Runtime State job hands to `Store::insert_runtime_catalog`.
//!
//! Everything here is read directly off the normalized metadata and the
//! shared [`PortableRegistry`] — no chain access, no SCALE *values* to
//! decode, just the type and call/event/storage declarations themselves.

use scale_info::form::PortableForm;
use scale_info::{PortableRegistry, Type, TypeDef, TypeDefPrimitive, Variant};
use serde_json::json;

use harvester_core::RuntimeCoordinate;
use harvester_storage::catalog::{
    lookup_key, Runtime, RuntimeCall, RuntimeCallArgument, RuntimeConstant, RuntimeErrorMessage, RuntimeEvent,
    RuntimeEventAttribute, RuntimePallet, RuntimeStorage, RuntimeType, StorageShape,
};

use crate::metadata::{DecodedMetadata, NormalizedConstant, NormalizedPallet, NormalizedStorageEntry, StorageShapeMeta};
use crate::value::decode_to_json;

/// Every row the builder produces for one runtime, grouped by table so
/// the caller can hand each `Vec` straight to the matching storage insert.
#[derive(Debug, Default, Clone)]
pub struct CatalogRows {
    pub runtime: Option<Runtime>,
    pub pallets: Vec<RuntimePallet>,
    pub calls: Vec<RuntimeCall>,
    pub call_arguments: Vec<RuntimeCallArgument>,
    pub events: Vec<RuntimeEvent>,
    pub event_attributes: Vec<RuntimeEventAttribute>,
    pub storage: Vec<RuntimeStorage>,
    pub constants: Vec<RuntimeConstant>,
    pub errors: Vec<RuntimeErrorMessage>,
    pub types: Vec<RuntimeType>,
}

#[derive(Debug, Default, Clone, Copy)]
struct PalletCounts {
    calls: i32,
    events: i32,
    storage: i32,
    constants: i32,
    errors: i32,
}

impl std::ops::AddAssign for PalletCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.calls += rhs.calls;
        self.events += rhs.events;
        self.storage += rhs.storage;
        self.constants += rhs.constants;
        self.errors += rhs.errors;
    }
}

/// Builds the full Runtime Catalog for one runtime from its decoded
/// metadata. Pure and side-effect free: persistence is the caller's job.
pub fn build_catalog(coord: &RuntimeCoordinate, metadata: &DecodedMetadata) -> CatalogRows {
    let mut rows = CatalogRows::default();
    let mut totals = PalletCounts::default();

    for pallet in &metadata.pallets {
        let counts = build_pallet(coord, metadata, pallet, &mut rows);
        totals += counts;
    }

    for portable in metadata.registry.types.iter() {
        rows.types.push(RuntimeType {
            spec_name: coord.spec_name.clone(),
            spec_version: coord.spec_version as i32,
            scale_type: render_resolved(&portable.ty, &metadata.registry),
            decoder_class: decoder_class(&portable.ty.type_def).to_string(),
            is_primitive: matches!(portable.ty.type_def, TypeDef::Primitive(_)),
        });
    }

    rows.runtime = Some(Runtime {
        spec_name: coord.spec_name.clone(),
        spec_version: coord.spec_version as i32,
        count_call_functions: totals.calls,
        count_events: totals.events,
        count_pallets: metadata.pallets.len() as i32,
        count_storage_functions: totals.storage,
        count_constants: totals.constants,
        count_errors: totals.errors,
    });

    rows
}

fn build_pallet(
    coord: &RuntimeCoordinate,
    metadata: &DecodedMetadata,
    pallet: &NormalizedPallet,
    rows: &mut CatalogRows,
) -> PalletCounts {
    let registry = &metadata.registry;
    let mut counts = PalletCounts::default();

    if let Some(call_type_id) = pallet.call_type_id {
        for variant in variants_of(registry, call_type_id) {
            let call_lookup = lookup_key(pallet.index, variant.index);
            rows.calls.push(RuntimeCall {
                spec_name: coord.spec_name.clone(),
                spec_version: coord.spec_version as i32,
                call_lookup: call_lookup.clone(),
                pallet: pallet.name.clone(),
                call_name: variant.name.clone(),
                lookup: call_lookup.clone(),
                documentation: doc_string(&variant.docs),
            });
            for (arg_idx, field) in variant.fields.iter().enumerate() {
                rows.call_arguments.push(RuntimeCallArgument {
                    spec_name: coord.spec_name.clone(),
                    spec_version: coord.spec_version as i32,
                    call_lookup: call_lookup.clone(),
                    arg_idx: arg_idx as i32,
                    name: field.name.clone().unwrap_or_default(),
                    scale_type: field_scale_type(field, registry),
                });
            }
            counts.calls += 1;
        }
    }

    if let Some(event_type_id) = pallet.event_type_id {
        for variant in variants_of(registry, event_type_id) {
            let event_lookup = lookup_key(pallet.index, variant.index);
            rows.events.push(RuntimeEvent {
                spec_name: coord.spec_name.clone(),
                spec_version: coord.spec_version as i32,
                event_lookup: event_lookup.clone(),
                pallet: pallet.name.clone(),
                event_name: variant.name.clone(),
                lookup: event_lookup.clone(),
                documentation: doc_string(&variant.docs),
            });
            for (arg_idx, field) in variant.fields.iter().enumerate() {
                rows.event_attributes.push(RuntimeEventAttribute {
                    spec_name: coord.spec_name.clone(),
                    spec_version: coord.spec_version as i32,
                    event_lookup: event_lookup.clone(),
                    arg_idx: arg_idx as i32,
                    name: field.name.clone().unwrap_or_default(),
                    scale_type: field_scale_type(field, registry),
                });
            }
            counts.events += 1;
        }
    }

    for entry in &pallet.storage {
        rows.storage.push(build_storage_row(coord, pallet, entry, registry));
        counts.storage += 1;
    }

    for constant in &pallet.constants {
        rows.constants.push(build_constant_row(coord, pallet, constant, registry));
        counts.constants += 1;
    }

    if let Some(error_type_id) = pallet.error_type_id {
        for variant in variants_of(registry, error_type_id) {
            rows.errors.push(RuntimeErrorMessage {
                spec_name: coord.spec_name.clone(),
                spec_version: coord.spec_version as i32,
                pallet: pallet.name.clone(),
                error_name: variant.name.clone(),
                documentation: doc_string(&variant.docs),
            });
            counts.errors += 1;
        }
    }

    rows.pallets.push(RuntimePallet {
        spec_name: coord.spec_name.clone(),
        spec_version: coord.spec_version as i32,
        pallet_index: pallet.index as i32,
        pallet: pallet.name.clone(),
        count_call_functions: counts.calls,
        count_events: counts.events,
        count_storage_functions: counts.storage,
        count_constants: counts.constants,
        count_errors: counts.errors,
    });

    counts
}

type Field = scale_info::Field<PortableForm>;

fn field_scale_type(field: &Field, registry: &PortableRegistry) -> String {
    field
        .type_name
        .clone()
        .unwrap_or_else(|| render_type(field.ty.id, registry))
}

fn build_storage_row(
    coord: &RuntimeCoordinate,
    pallet: &NormalizedPallet,
    entry: &NormalizedStorageEntry,
    registry: &PortableRegistry,
) -> RuntimeStorage {
    let shape = match entry.shape {
        StorageShapeMeta::Plain => StorageShape::Plain,
        StorageShapeMeta::Map => StorageShape::Map,
    };
    RuntimeStorage {
        spec_name: coord.spec_name.clone(),
        spec_version: coord.spec_version as i32,
        pallet: pallet.name.clone(),
        storage_name: entry.name.clone(),
        shape,
        key_scale_type: entry.key_type_id.map(|id| render_type(id, registry)),
        value_scale_type: render_type(entry.value_type_id, registry),
        hasher: entry.hashers.first().cloned(),
        default_value: entry.default.clone(),
        documentation: doc_string(&entry.docs),
    }
}

fn build_constant_row(
    coord: &RuntimeCoordinate,
    pallet: &NormalizedPallet,
    constant: &NormalizedConstant,
    registry: &PortableRegistry,
) -> RuntimeConstant {
    RuntimeConstant {
        spec_name: coord.spec_name.clone(),
        spec_version: coord.spec_version as i32,
        pallet: pallet.name.clone(),
        constant_name: constant.name.clone(),
        scale_type: render_type(constant.type_id, registry),
        value: constant_value_json(&constant.value, constant.type_id, registry),
        documentation: doc_string(&constant.docs),
    }
}

/// Byte arrays decode to a JSON array of numbers by default, which is
/// useless for anything hash- or account-id-shaped; hex-encode those
/// instead. Anything else that fails to decode against its declared type
/// falls back to the raw bytes under a `"raw"` tag rather than erroring
/// the whole catalog build.
fn constant_value_json(raw: &[u8], type_id: u32, registry: &PortableRegistry) -> serde_json::Value {
    if is_byte_array(type_id, registry) {
        return serde_json::Value::String(format!("0x{}", hex::encode(raw)));
    }
    decode_to_json(raw, type_id, registry).unwrap_or_else(|_| json!({ "raw": format!("0x{}", hex::encode(raw)) }))
}

fn is_byte_array(type_id: u32, registry: &PortableRegistry) -> bool {
    let Some(ty) = registry.resolve(type_id) else {
        return false;
    };
    match &ty.type_def {
        TypeDef::Array(arr) => is_u8(arr.type_param.id, registry),
        TypeDef::Sequence(seq) => is_u8(seq.type_param.id, registry),
        _ => false,
    }
}

fn is_u8(type_id: u32, registry: &PortableRegistry) -> bool {
    matches!(
        registry.resolve(type_id).map(|t| &t.type_def),
        Some(TypeDef::Primitive(TypeDefPrimitive::U8))
    )
}

fn variants_of(registry: &PortableRegistry, type_id: u32) -> &[Variant<PortableForm>] {
    match registry.resolve(type_id).map(|t| &t.type_def) {
        Some(TypeDef::Variant(v)) => &v.variants,
        _ => &[],
    }
}

fn doc_string(docs: &[String]) -> Option<String> {
    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

/// Renders a portable type id as the declared-type string stored in
/// `scale_type` columns. Named (composite/variant) types render as their
/// declaration path; everything else is built up structurally so every
/// type id in the registry, named or anonymous, gets a stable string.
pub fn render_type(type_id: u32, registry: &PortableRegistry) -> String {
    match registry.resolve(type_id) {
        Some(ty) => render_resolved(ty, registry),
        None => format!("Unknown<{type_id}>"),
    }
}

fn render_resolved(ty: &Type<PortableForm>, registry: &PortableRegistry) -> String {
    match &ty.type_def {
        TypeDef::Primitive(p) => primitive_name(p).to_string(),
        TypeDef::Sequence(s) => format!("Vec<{}>", render_type(s.type_param.id, registry)),
        TypeDef::Array(a) => format!("[{}; {}]", render_type(a.type_param.id, registry), a.len),
        TypeDef::Tuple(t) => format!(
            "({})",
            t.fields.iter().map(|f| render_type(f.id, registry)).collect::<Vec<_>>().join(", ")
        ),
        TypeDef::Compact(c) => format!("Compact<{}>", render_type(c.type_param.id, registry)),
        TypeDef::BitSequence(_) => "BitVec".to_string(),
        TypeDef::Composite(_) | TypeDef::Variant(_) => path_name(ty),
    }
}

fn path_name(ty: &Type<PortableForm>) -> String {
    if ty.path.segments.is_empty() {
        "Anonymous".to_string()
    } else {
        ty.path.segments.join("::")
    }
}

fn decoder_class(def: &TypeDef<PortableForm>) -> &'static str {
    match def {
        TypeDef::Primitive(_) => "primitive",
        TypeDef::Composite(_) => "composite",
        TypeDef::Variant(_) => "variant",
        TypeDef::Sequence(_) => "sequence",
        TypeDef::Array(_) => "array",
        TypeDef::Tuple(_) => "tuple",
        TypeDef::Compact(_) => "compact",
        TypeDef::BitSequence(_) => "bit_sequence",
    }
}

fn primitive_name(p: &TypeDefPrimitive) -> &'static str {
    match p {
        TypeDefPrimitive::Bool => "bool",
        TypeDefPrimitive::Char => "char",
        TypeDefPrimitive::Str => "str",
        TypeDefPrimitive::U8 => "u8",
        TypeDefPrimitive::U16 => "u16",
        TypeDefPrimitive::U32 => "u32",
        TypeDefPrimitive::U64 => "u64",
        TypeDefPrimitive::U128 => "u128",
        TypeDefPrimitive::U256 => "u256",
        TypeDefPrimitive::I8 => "i8",
        TypeDefPrimitive::I16 => "i16",
        TypeDefPrimitive::I32 => "i32",
        TypeDefPrimitive::I64 => "i64",
        TypeDefPrimitive::I128 => "i128",
        TypeDefPrimitive::I256 => "i256",
    }
}

#[cfg(test)]
#[path = "catalog_builder_tests.rs"]
mod tests;
