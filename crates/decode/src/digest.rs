// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decodes one block header digest log item (`sp_runtime::generic::DigestItem`).

use thiserror::Error;

use crate::context::DecodeContext;
use crate::value::{decode_to_json, ValueError};

const DIGEST_ITEM_PATH: &[&str] = &["sp_runtime", "generic", "digest", "DigestItem"];

#[derive(Debug, Error)]
pub enum DigestDecodeError {
    #[error("this runtime's metadata has no DigestItem type registered")]
    TypeNotFound,
    #[error(transparent)]
    Value(#[from] ValueError),
}

/// Finds the portable type id of `sp_runtime::generic::DigestItem` by its
/// declared path, since no pallet metadata points at it directly the way
/// calls/events/storage entries do.
pub fn digest_item_type_id(ctx: &DecodeContext) -> Option<u32> {
    ctx.registry()
        .types
        .iter()
        .find(|ty| ty.ty.path.segments == DIGEST_ITEM_PATH)
        .map(|ty| ty.id)
}

pub fn decode_digest_log(bytes: &[u8], ctx: &DecodeContext) -> Result<serde_json::Value, DigestDecodeError> {
    let type_id = digest_item_type_id(ctx).ok_or(DigestDecodeError::TypeNotFound)?;
    Ok(decode_to_json(bytes, type_id, ctx.registry())?)
}

#[cfg(test)]
#[path = "digest_tests.rs"]
mod tests;
