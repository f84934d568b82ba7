// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live node JSON-RPC 2.0 websocket client.
//!
//! Issues the exact methods named in §4.2-§4.9 against a running
//! Substrate node, correlating responses by request id and classifying
//! connection failures as [`HarvesterError::TransientConnection`] so the
//! supervisor can reconnect with backoff rather than aborting the job.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use harvester_core::{HarvesterError, HarvesterResult};
use harvester_wire::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RequestIdGen};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

/// The subset of node RPC calls the retrieve-blocks/retrieve-runtime-state
/// jobs need, abstracted away from [`RpcClient`]'s websocket transport so
/// those jobs can run against [`crate::FakeRpcClient`] in tests.
#[async_trait]
pub trait NodeRpc: Send + Sync {
    async fn chain_get_block_hash(&self, block_number: i64) -> HarvesterResult<String>;
    async fn chain_get_block(&self, block_hash: &str) -> HarvesterResult<harvester_wire::BlockResult>;
    async fn chain_get_finalised_head(&self) -> HarvesterResult<String>;
    async fn chain_get_header(&self, block_hash: &str) -> HarvesterResult<harvester_wire::HeaderResult>;
    async fn chain_get_runtime_version(&self, block_hash: &str) -> HarvesterResult<harvester_wire::RuntimeVersionResult>;
    async fn state_get_metadata(&self, block_hash: &str) -> HarvesterResult<String>;
    async fn state_get_storage_at(&self, storage_key: &str, block_hash: &str) -> HarvesterResult<Option<String>>;
    async fn state_get_keys_paged(
        &self,
        prefix: &str,
        count: u32,
        start_key: &str,
        block_hash: &str,
    ) -> HarvesterResult<Vec<String>>;
}

/// How long a single in-flight RPC call waits before the client treats
/// the node as unresponsive.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Backoff between reconnect attempts, matching the supervisor's
/// connection-class retry sleep.
const RECONNECT_BACKOFF: Duration = Duration::from_secs(27);

const MAX_CONNECT_ATTEMPTS: u32 = 10;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type PendingMap = Arc<Mutex<HashMap<u64, oneshot::Sender<JsonRpcResponse>>>>;

/// A connected JSON-RPC 2.0 websocket client to a live Substrate node.
pub struct RpcClient {
    url: String,
    ids: RequestIdGen,
    outbound: tokio::sync::mpsc::UnboundedSender<Message>,
    pending: PendingMap,
}

impl RpcClient {
    /// Connects to `url`, retrying up to [`MAX_CONNECT_ATTEMPTS`] times
    /// with [`RECONNECT_BACKOFF`] between attempts.
    pub async fn connect(url: impl Into<String>) -> HarvesterResult<Self> {
        let url = url.into();
        let stream = connect_with_retries(&url).await?;
        let (outbound_tx, outbound_rx) = tokio::sync::mpsc::unbounded_channel();
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));

        tokio::spawn(run_connection(stream, outbound_rx, pending.clone()));

        Ok(Self {
            url,
            ids: RequestIdGen::new(),
            outbound: outbound_tx,
            pending,
        })
    }

    async fn call(&self, method: &str, params: Value) -> HarvesterResult<Value> {
        let id = self.ids.next();
        let request = JsonRpcRequest::new(id, method, params);
        let payload = serde_json::to_string(&request)
            .map_err(|e| HarvesterError::Config(format!("failed to encode request: {e}")))?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        self.outbound
            .send(Message::Text(payload))
            .map_err(|_| HarvesterError::TransientConnection(format!("{} connection closed", self.url)))?;

        let response = tokio::time::timeout(RESPONSE_TIMEOUT, rx)
            .await
            .map_err(|_| HarvesterError::TransientConnection(format!("{} response timeout", self.url)))?
            .map_err(|_| HarvesterError::TransientConnection(format!("{} connection closed", self.url)))?;

        response.into_result().map_err(classify_rpc_error)
    }

    async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> HarvesterResult<T> {
        let value = self.call(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| HarvesterError::Config(format!("unexpected {method} response shape: {e}")))
    }

    pub async fn chain_get_block_hash(&self, block_number: i64) -> HarvesterResult<String> {
        self.call_typed(harvester_wire::methods::CHAIN_GET_BLOCK_HASH, serde_json::json!([block_number]))
            .await
    }

    pub async fn chain_get_block(&self, block_hash: &str) -> HarvesterResult<harvester_wire::BlockResult> {
        self.call_typed(harvester_wire::methods::CHAIN_GET_BLOCK, serde_json::json!([block_hash]))
            .await
    }

    pub async fn chain_get_finalised_head(&self) -> HarvesterResult<String> {
        self.call_typed(harvester_wire::methods::CHAIN_GET_FINALISED_HEAD, serde_json::json!([]))
            .await
    }

    pub async fn chain_get_header(&self, block_hash: &str) -> HarvesterResult<harvester_wire::HeaderResult> {
        self.call_typed(harvester_wire::methods::CHAIN_GET_HEADER, serde_json::json!([block_hash]))
            .await
    }

    pub async fn chain_get_runtime_version(
        &self,
        block_hash: &str,
    ) -> HarvesterResult<harvester_wire::RuntimeVersionResult> {
        self.call_typed(harvester_wire::methods::CHAIN_GET_RUNTIME_VERSION, serde_json::json!([block_hash]))
            .await
    }

    pub async fn state_get_metadata(&self, block_hash: &str) -> HarvesterResult<String> {
        self.call_typed(harvester_wire::methods::STATE_GET_METADATA, serde_json::json!([block_hash]))
            .await
    }

    pub async fn state_get_storage_at(
        &self,
        storage_key: &str,
        block_hash: &str,
    ) -> HarvesterResult<Option<String>> {
        self.call_typed(
            harvester_wire::methods::STATE_GET_STORAGE_AT,
            serde_json::json!([storage_key, block_hash]),
        )
        .await
    }

    pub async fn state_get_keys_paged(
        &self,
        prefix: &str,
        count: u32,
        start_key: &str,
        block_hash: &str,
    ) -> HarvesterResult<Vec<String>> {
        self.call_typed(
            harvester_wire::methods::STATE_GET_KEYS_PAGED,
            serde_json::json!([prefix, count, start_key, block_hash]),
        )
        .await
    }
}

#[async_trait]
impl NodeRpc for RpcClient {
    async fn chain_get_block_hash(&self, block_number: i64) -> HarvesterResult<String> {
        RpcClient::chain_get_block_hash(self, block_number).await
    }

    async fn chain_get_block(&self, block_hash: &str) -> HarvesterResult<harvester_wire::BlockResult> {
        RpcClient::chain_get_block(self, block_hash).await
    }

    async fn chain_get_finalised_head(&self) -> HarvesterResult<String> {
        RpcClient::chain_get_finalised_head(self).await
    }

    async fn chain_get_header(&self, block_hash: &str) -> HarvesterResult<harvester_wire::HeaderResult> {
        RpcClient::chain_get_header(self, block_hash).await
    }

    async fn chain_get_runtime_version(&self, block_hash: &str) -> HarvesterResult<harvester_wire::RuntimeVersionResult> {
        RpcClient::chain_get_runtime_version(self, block_hash).await
    }

    async fn state_get_metadata(&self, block_hash: &str) -> HarvesterResult<String> {
        RpcClient::state_get_metadata(self, block_hash).await
    }

    async fn state_get_storage_at(&self, storage_key: &str, block_hash: &str) -> HarvesterResult<Option<String>> {
        RpcClient::state_get_storage_at(self, storage_key, block_hash).await
    }

    async fn state_get_keys_paged(
        &self,
        prefix: &str,
        count: u32,
        start_key: &str,
        block_hash: &str,
    ) -> HarvesterResult<Vec<String>> {
        RpcClient::state_get_keys_paged(self, prefix, count, start_key, block_hash).await
    }
}

/// Classifies a JSON-RPC error object returned by the node. Per §7, an
/// upstream RPC error object is itself one of the transient-connection
/// cases — the caller reconnects rather than treating it as a fatal
/// decode or storage error.
fn classify_rpc_error(error: JsonRpcError) -> HarvesterError {
    HarvesterError::TransientConnection(format!("upstream rpc error {}: {}", error.code, error.message))
}

async fn connect_with_retries(url: &str) -> HarvesterResult<WsStream> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        match connect_async(url).await {
            Ok((stream, _)) => {
                info!(url, attempt, "connected to node");
                return Ok(stream);
            }
            Err(e) if attempt >= MAX_CONNECT_ATTEMPTS => {
                return Err(HarvesterError::TransientConnection(format!(
                    "failed to connect to {url} after {attempt} attempts: {e}"
                )));
            }
            Err(e) => {
                warn!(url, attempt, error = %e, "connect failed, retrying");
                tokio::time::sleep(RECONNECT_BACKOFF).await;
            }
        }
    }
}

async fn run_connection(
    stream: WsStream,
    mut outbound_rx: tokio::sync::mpsc::UnboundedReceiver<Message>,
    pending: PendingMap,
) {
    let (mut write, mut read) = stream.split();
    loop {
        tokio::select! {
            outgoing = outbound_rx.recv() => {
                match outgoing {
                    Some(msg) => {
                        if let Err(e) = write.send(msg).await {
                            warn!(error = %e, "failed to send rpc request, dropping connection");
                            return;
                        }
                    }
                    None => return,
                }
            }
            incoming = read.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(response) = serde_json::from_str::<JsonRpcResponse>(&text) {
                            if let Some(tx) = pending.lock().remove(&response.id) {
                                let _ = tx.send(response);
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(error = %e, "websocket read error, connection dropped");
                        return;
                    }
                    None => {
                        warn!("node closed the connection");
                        return;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
