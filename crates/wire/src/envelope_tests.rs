// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn request_id_gen_increments() {
    let gen = RequestIdGen::new();
    assert_eq!(gen.next(), 1);
    assert_eq!(gen.next(), 2);
    assert_eq!(gen.next(), 3);
}

#[test]
fn request_serializes_jsonrpc_version_as_literal_string() {
    let req = JsonRpcRequest::new(1, "chain_getBlockHash", serde_json::json!([5]));
    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["jsonrpc"], "2.0");
    assert_eq!(json["method"], "chain_getBlockHash");
}

#[test]
fn response_ok_round_trips_into_result() {
    let resp = JsonRpcResponse::ok(1, serde_json::json!("0xabc"));
    let value = resp.into_result().unwrap();
    assert_eq!(value, serde_json::json!("0xabc"));
}

#[test]
fn response_err_round_trips_into_error() {
    let resp = JsonRpcResponse::err(1, JsonRpcError::method_not_found("bogus_method"));
    let err = resp.into_result().unwrap_err();
    assert_eq!(err.code, -32601);
    assert!(err.message.contains("bogus_method"));
}

#[test]
fn rejects_unsupported_jsonrpc_version() {
    let json = serde_json::json!({"jsonrpc": "1.0", "id": 1, "method": "x", "params": []});
    let result: Result<JsonRpcRequest, _> = serde_json::from_value(json);
    assert!(result.is_err());
}
