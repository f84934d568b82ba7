// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::envelope::JsonRpcRequest;

#[test]
fn encode_prefixes_with_big_endian_length() {
    let req = JsonRpcRequest::new(1, "system_name", serde_json::json!([]));
    let framed = encode(&req).unwrap();
    let body = serde_json::to_vec(&req).unwrap();
    let len = u32::from_be_bytes(framed[..4].try_into().unwrap());
    assert_eq!(len as usize, body.len());
    assert_eq!(&framed[4..], body.as_slice());
}

#[test]
fn decode_round_trips_with_encode_body() {
    let req = JsonRpcRequest::new(7, "system_chain", serde_json::json!([]));
    let framed = encode(&req).unwrap();
    let decoded: JsonRpcRequest = decode(&framed[4..]).unwrap();
    assert_eq!(decoded.id, 7);
    assert_eq!(decoded.method, "system_chain");
}

#[tokio::test]
async fn write_then_read_message_round_trips() {
    let req = JsonRpcRequest::new(3, "rpc_methods", serde_json::json!([]));
    let mut buf = Vec::new();
    write_message(&mut buf, &req).await.unwrap();

    let mut cursor = std::io::Cursor::new(buf);
    let decoded: JsonRpcRequest = read_message(&mut cursor).await.unwrap();
    assert_eq!(decoded.id, 3);
    assert_eq!(decoded.method, "rpc_methods");
}
