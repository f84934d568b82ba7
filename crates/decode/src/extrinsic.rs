// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decodes one extrinsic's raw bytes into the JSON tree stored in
//! `codec_block_extrinsics.data`.
//!
//! Extrinsics are not a single SCALE-decodable composite in every metadata
//! version (see [`crate::metadata::NormalizedExtrinsic`]), so this module
//! peels the wire format by hand: a version/signed byte, then an optional
//! `(Address, Signature, Extra)` triple, then the call itself.

use serde_json::json;
use thiserror::Error;

use crate::context::DecodeContext;
use crate::value::{decode_prefix_to_json, ValueError};

const SIGNED_MASK: u8 = 0b1000_0000;
const VERSION_MASK: u8 = 0b0111_1111;

#[derive(Debug, Error)]
pub enum ExtrinsicDecodeError {
    #[error("extrinsic is empty, cannot read version byte")]
    Empty,
    #[error("extrinsic is signed but metadata has no '{0}' type for this runtime")]
    MissingSignedTypeId(&'static str),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("{0} trailing byte(s) after decoding extrinsic call")]
    TrailingBytes(usize),
}

/// Decodes one extrinsic. `bytes` is the raw extrinsic body as returned by
/// `chain_getBlock` (already hex-decoded, no outer SCALE length prefix).
pub fn decode_extrinsic(bytes: &[u8], ctx: &DecodeContext) -> Result<serde_json::Value, ExtrinsicDecodeError> {
    let (&version_byte, rest) = bytes.split_first().ok_or(ExtrinsicDecodeError::Empty)?;
    let signed = version_byte & SIGNED_MASK != 0;
    let version = version_byte & VERSION_MASK;

    let extrinsic = &ctx.metadata.extrinsic;
    let registry = ctx.registry();
    let mut cursor = rest;

    let mut address = None;
    let mut signature = None;
    let mut extra = None;

    if signed {
        let address_type_id = extrinsic
            .address_type_id
            .ok_or(ExtrinsicDecodeError::MissingSignedTypeId("Address"))?;
        let (value, consumed) = decode_prefix_to_json(cursor, address_type_id, registry)?;
        address = Some(value);
        cursor = &cursor[consumed..];

        let signature_type_id = extrinsic
            .signature_type_id
            .ok_or(ExtrinsicDecodeError::MissingSignedTypeId("Signature"))?;
        let (value, consumed) = decode_prefix_to_json(cursor, signature_type_id, registry)?;
        signature = Some(value);
        cursor = &cursor[consumed..];

        let extra_type_id = extrinsic
            .extra_type_id
            .ok_or(ExtrinsicDecodeError::MissingSignedTypeId("Extra"))?;
        let (value, consumed) = decode_prefix_to_json(cursor, extra_type_id, registry)?;
        extra = Some(value);
        cursor = &cursor[consumed..];
    }

    let (call, consumed) = decode_prefix_to_json(cursor, extrinsic.call_type_id, registry)?;
    cursor = &cursor[consumed..];
    if !cursor.is_empty() {
        return Err(ExtrinsicDecodeError::TrailingBytes(cursor.len()));
    }

    Ok(json!({
        "version": version,
        "signed": signed,
        "address": address,
        "signature": signature,
        "extra": extra,
        "call": call,
    }))
}

#[cfg(test)]
#[path = "extrinsic_tests.rs"]
mod tests;
