// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

fn padron() -> Item {
    Item {
        id: "a".to_string(),
        name: "Padron".to_string(),
        category: "cigar".to_string(),
        quantity: 2,
        time: "2025-06-26 10:00:00".to_string(),
        extra: Default::default(),
    }
}

#[test]
fn encode_is_pretty_printed_with_two_spaces() {
    let text = String::from_utf8(encode(&[padron()]).unwrap()).unwrap();
    let expected = r#"[
  {
    "id": "a",
    "name": "Padron",
    "category": "cigar",
    "quantity": 2,
    "time": "2025-06-26 10:00:00"
  }
]"#;
    assert_eq!(text, expected);
}

#[test]
fn encode_keeps_unicode_unescaped() {
    let mut item = padron();
    item.name = "Añejo".to_string();
    let text = String::from_utf8(encode(&[item]).unwrap()).unwrap();
    assert!(text.contains("Añejo"));
}

#[test]
fn decode_reads_what_encode_wrote() {
    let items = vec![padron()];
    assert_eq!(decode(&encode(&items).unwrap()).unwrap().items, items);
}

#[test]
fn decode_accepts_empty_array() {
    assert_eq!(decode(b"[]").unwrap(), Decoded::default());
}

#[parameterized(
    garbage = { b"not json at all" },
    empty = { b"" },
    truncated = { b"[{\"id\": \"a\", \"na" },
    invalid_utf8 = { &[0xff, 0xfe, 0x00] },
)]
fn decode_rejects_non_json(bytes: &[u8]) {
    assert!(matches!(decode(bytes), Err(DecodeError::Syntax(_))));
}

#[parameterized(
    object = { b"{\"items\": []}", "an object" },
    number = { b"42", "a number" },
    string = { b"\"hello\"", "a string" },
    null = { b"null", "null" },
)]
fn decode_rejects_non_array_top_level(bytes: &[u8], found: &str) {
    match decode(bytes) {
        Err(DecodeError::NotAnArray(kind)) => assert_eq!(kind, found),
        other => panic!("expected NotAnArray, got {other:?}"),
    }
}

#[test]
fn decode_takes_objects_without_validating_them() {
    let bytes = br#"[{"id":"a","name":"x","category":"y","quantity":1,"time":"t","notes":"gift"}, {"id": 3}]"#;
    let decoded = decode(bytes).unwrap();

    assert!(decoded.skipped.is_empty());
    assert_eq!(decoded.items.len(), 2);
    assert_eq!(decoded.items[0].extra.get("notes"), Some(&Value::from("gift")));
    assert_eq!(decoded.items[1].id, "3");
    assert_eq!(decoded.items[1].name, "");
}

#[test]
fn decode_skips_entries_that_are_not_objects() {
    let bytes = br#"["loose", {"id":"a"}, 42, null]"#;
    let decoded = decode(bytes).unwrap();

    assert_eq!(decoded.items.len(), 1);
    assert_eq!(decoded.skipped, vec![0, 2, 3]);
}

#[test]
fn unknown_keys_are_written_back() {
    let bytes = br#"[{"id":"a","name":"x","category":"y","quantity":1,"time":"t","notes":"gift"}]"#;
    let items = decode(bytes).unwrap().items;
    let again: Value = serde_json::from_slice(&encode(&items).unwrap()).unwrap();
    assert_eq!(again, serde_json::from_slice::<Value>(bytes).unwrap());
}
