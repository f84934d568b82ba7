// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn event_idx_is_0x_prefixed_four_hex_chars() {
    assert_eq!(CodecBlockEvent::format_event_idx(0), "0x0000");
    assert_eq!(CodecBlockEvent::format_event_idx(171), "0x00ab");
    assert_eq!(CodecBlockEvent::format_event_idx(u16::MAX), "0xffff");
}

#[test]
fn scale_type_column_uses_declared_string() {
    let ty = ScaleType::new("Extrinsic");
    assert_eq!(scale_type_column(&ty), "Extrinsic");
}

#[test]
fn codec_extrinsic_default_state_round_trips() {
    let row = CodecBlockExtrinsic {
        block_hash: BlockHash::from_hex(&"11".repeat(32)).unwrap(),
        extrinsic_idx: 0,
        block_number: 10,
        scale_type: "Extrinsic".into(),
        data: serde_json::json!({"call_module": "Balances"}),
        state: DecodeState::Fresh,
        attempts: 0,
    };
    let json = serde_json::to_string(&row).unwrap();
    let back: CodecBlockExtrinsic = serde_json::from_str(&json).unwrap();
    assert_eq!(row, back);
}
