// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local RPC Facade: serves the fixed method subset in
//! [`harvester_wire::methods::FACADE_METHODS`] from the persistent
//! store, so the decode runtime can "re-ask" RPC questions during
//! historical replay without contacting the live node.

use std::sync::Arc;

use harvester_core::{BlockHash, HarvesterError, HarvesterResult, RuntimeCoordinate};
use harvester_storage::{status_keys, Store};
use harvester_wire::{methods, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;

/// Serves JSON-RPC requests entirely from a [`Store`]. SS58 address
/// formatting stays disabled: addresses round-trip as raw 32-byte
/// account ids, matching the decode runtime's `init_runtime` behavior.
pub struct LocalFacade<S: Store> {
    store: Arc<S>,
}

impl<S: Store> LocalFacade<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match self.dispatch(&request.method, &request.params).await {
            Ok(result) => JsonRpcResponse::ok(request.id, result),
            Err(e) => JsonRpcResponse::err(request.id, to_jsonrpc_error(&request.method, e)),
        }
    }

    async fn dispatch(&self, method: &str, params: &Value) -> HarvesterResult<Value> {
        match method {
            methods::SYSTEM_NAME => Ok(Value::String("harvester".to_string())),
            methods::SYSTEM_CHAIN => {
                let chain = self
                    .store
                    .get_status(status_keys::SYSTEM_CHAIN)
                    .await?
                    .unwrap_or_default();
                Ok(Value::String(chain))
            }
            methods::SYSTEM_PROPERTIES => Ok(Value::Object(Default::default())),
            methods::RPC_METHODS => Ok(serde_json::json!({ "methods": methods::FACADE_METHODS })),
            methods::CHAIN_GET_HEADER => self.chain_get_header(params).await,
            methods::CHAIN_GET_BLOCK => self.chain_get_block(params).await,
            methods::CHAIN_GET_RUNTIME_VERSION | methods::STATE_GET_RUNTIME_VERSION => {
                self.runtime_version(params).await
            }
            methods::STATE_GET_METADATA => self.state_get_metadata(params).await,
            methods::STATE_GET_STORAGE_AT => self.state_get_storage_at(params).await,
            other => Err(HarvesterError::Config(format!("no handler for method {other:?}"))),
        }
    }

    async fn chain_get_header(&self, params: &Value) -> HarvesterResult<Value> {
        let hash = block_hash_param(params, 0)?;
        let header = self
            .store
            .get_block_header(hash)
            .await?
            .ok_or_else(|| HarvesterError::StorageMissing(format!("header for {hash}")))?;
        let logs = self.store.list_block_logs(hash).await?;
        Ok(serde_json::json!({
            "parentHash": header.parent_hash.to_hex(),
            "number": format!("0x{:x}", header.block_number),
            "stateRoot": header.state_root.to_hex(),
            "extrinsicsRoot": header.extrinsics_root.to_hex(),
            "digest": { "logs": logs.iter().map(|l| format!("0x{}", hex::encode(&l.data))).collect::<Vec<_>>() },
        }))
    }

    async fn chain_get_block(&self, params: &Value) -> HarvesterResult<Value> {
        let hash = block_hash_param(params, 0)?;
        let header_json = self.chain_get_header(params).await?;
        let extrinsics = self.store.list_block_extrinsics(hash).await?;
        Ok(serde_json::json!({
            "block": {
                "header": header_json,
                "extrinsics": extrinsics
                    .iter()
                    .map(|e| format!("0x{}{}", hex::encode(&e.length_bytes), hex::encode(&e.data)))
                    .collect::<Vec<_>>(),
            }
        }))
    }

    async fn runtime_version(&self, params: &Value) -> HarvesterResult<Value> {
        let hash = block_hash_param(params, 0)?;
        let runtime = self
            .store
            .get_block_runtime(hash)
            .await?
            .ok_or_else(|| HarvesterError::StorageMissing(format!("runtime for {hash}")))?;
        Ok(serde_json::json!({
            "specName": runtime.spec_name,
            "specVersion": runtime.spec_version,
        }))
    }

    async fn state_get_metadata(&self, params: &Value) -> HarvesterResult<Value> {
        let hash = block_hash_param(params, 0)?;
        let runtime = self
            .store
            .get_block_runtime(hash)
            .await?
            .ok_or_else(|| HarvesterError::StorageMissing(format!("runtime for {hash}")))?;
        let coord = RuntimeCoordinate::new(runtime.spec_name, runtime.spec_version as u32);
        let metadata = self
            .store
            .get_metadata(&coord)
            .await?
            .ok_or_else(|| HarvesterError::StorageMissing(format!("metadata for {coord}")))?;
        Ok(Value::String(format!("0x{}", hex::encode(metadata.data))))
    }

    async fn state_get_storage_at(&self, params: &Value) -> HarvesterResult<Value> {
        let storage_key = bytes_param(params, 0)?;
        let hash = block_hash_param(params, 1)?;
        let row = self.store.get_block_storage(hash, &storage_key).await?;
        Ok(match row.and_then(|r| r.data) {
            Some(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            None => Value::Null,
        })
    }
}

fn to_jsonrpc_error(method: &str, error: HarvesterError) -> JsonRpcError {
    if !methods::is_facade_method(method) {
        return JsonRpcError::method_not_found(method);
    }
    JsonRpcError {
        code: -32000,
        message: error.to_string(),
    }
}

fn block_hash_param(params: &Value, idx: usize) -> HarvesterResult<BlockHash> {
    let s = params
        .get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| HarvesterError::Config(format!("expected block hash param at index {idx}")))?;
    BlockHash::from_hex(s).map_err(|e| HarvesterError::Config(format!("invalid block hash: {e}")))
}

fn bytes_param(params: &Value, idx: usize) -> HarvesterResult<Vec<u8>> {
    let s = params
        .get(idx)
        .and_then(Value::as_str)
        .ok_or_else(|| HarvesterError::Config(format!("expected hex param at index {idx}")))?;
    let s = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(s).map_err(|e| HarvesterError::Config(format!("invalid hex param: {e}")))
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
