// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decodes `System.Events` and fans it out into one row per event, per
//! §4.5/§6: each `frame_system::EventRecord` carries a `Phase` (which
//! extrinsic, if any, produced it) and a nested `RuntimeEvent` (outer
//! variant = pallet, inner variant = event name, fields = event data).

use scale_value::{Composite, Primitive, Value as ScaleValue, ValueDef};
use thiserror::Error;

use crate::context::DecodeContext;
use crate::storage_entry::{self, StorageDecodeError};

#[derive(Debug, Error)]
pub enum EventsDecodeError {
    #[error(transparent)]
    Storage(#[from] StorageDecodeError),
    #[error("failed to decode System.Events: {0}")]
    Decode(#[from] scale_value::scale::DecodeError),
    #[error("{0} trailing byte(s) after decoding System.Events")]
    TrailingBytes(usize),
    #[error("System.Events did not decode to the expected Vec<EventRecord> shape")]
    UnexpectedShape,
    #[error("decoded event value could not be represented as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DecodedEvent {
    pub event_idx: u16,
    pub extrinsic_idx: Option<i32>,
    pub pallet: String,
    pub event_name: String,
    pub data: serde_json::Value,
}

pub fn decode_events(bytes: &[u8], ctx: &DecodeContext) -> Result<Vec<DecodedEvent>, EventsDecodeError> {
    let entry = storage_entry::find_entry(ctx, "System", "Events")?;

    let mut cursor = bytes;
    let value = scale_value::scale::decode_as_type(&mut cursor, entry.value_type_id, ctx.registry())?;
    if !cursor.is_empty() {
        return Err(EventsDecodeError::TrailingBytes(cursor.len()));
    }

    let records = match value.value {
        ValueDef::Composite(Composite::Unnamed(items)) => items,
        _ => return Err(EventsDecodeError::UnexpectedShape),
    };

    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| decode_one_record(idx as u16, record))
        .collect()
}

fn decode_one_record(event_idx: u16, record: ScaleValue<u32>) -> Result<DecodedEvent, EventsDecodeError> {
    let fields = match record.value {
        ValueDef::Composite(Composite::Named(fields)) => fields,
        _ => return Err(EventsDecodeError::UnexpectedShape),
    };

    let phase = fields
        .iter()
        .find(|(name, _)| name == "phase")
        .map(|(_, v)| v)
        .ok_or(EventsDecodeError::UnexpectedShape)?;
    let event = fields
        .iter()
        .find(|(name, _)| name == "event")
        .map(|(_, v)| v)
        .ok_or(EventsDecodeError::UnexpectedShape)?;

    let extrinsic_idx = extrinsic_idx_from_phase(phase);
    let (pallet, event_name, data) = decode_pallet_event(event)?;

    Ok(DecodedEvent {
        event_idx,
        extrinsic_idx,
        pallet,
        event_name,
        data,
    })
}

fn extrinsic_idx_from_phase(phase: &ScaleValue<u32>) -> Option<i32> {
    let ValueDef::Variant(variant) = &phase.value else {
        return None;
    };
    if variant.name != "ApplyExtrinsic" {
        return None;
    }
    let Composite::Unnamed(values) = &variant.values else {
        return None;
    };
    let first = values.first()?;
    match &first.value {
        ValueDef::Primitive(Primitive::U128(n)) => Some(*n as i32),
        _ => None,
    }
}

fn decode_pallet_event(event: &ScaleValue<u32>) -> Result<(String, String, serde_json::Value), EventsDecodeError> {
    let ValueDef::Variant(outer) = &event.value else {
        return Err(EventsDecodeError::UnexpectedShape);
    };
    let pallet = outer.name.clone();

    let Composite::Unnamed(inner_values) = &outer.values else {
        return Ok((pallet, String::new(), serde_json::to_value(&outer.values)?));
    };
    let Some(inner) = inner_values.first() else {
        return Ok((pallet, String::new(), serde_json::Value::Null));
    };

    match &inner.value {
        ValueDef::Variant(inner_variant) => {
            let event_name = inner_variant.name.clone();
            let data = serde_json::to_value(&inner_variant.values)?;
            Ok((pallet, event_name, data))
        }
        _ => Ok((pallet, String::new(), serde_json::to_value(inner)?)),
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
