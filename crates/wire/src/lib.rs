// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-RPC 2.0 wire types shared by the live node websocket client and
//! the Local RPC Facade.
//!
//! Local transport framing: 4-byte length prefix (big-endian) + JSON body.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod envelope;
pub mod framing;
pub mod methods;
pub mod types;

pub use envelope::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JsonRpcVersion, RequestIdGen};
pub use framing::{decode, encode, read_message, write_message, ProtocolError};
pub use types::{BlockBody, BlockResult, DigestResult, HeaderResult, RuntimeVersionResult, StorageKeysPagedResult};
