// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;
use curation_core::FakeClock;
use tempfile::tempdir;

fn clock() -> FakeClock {
    FakeClock::at(
        NaiveDate::from_ymd_opt(2025, 6, 26)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
    )
}

fn item(id: &str) -> Item {
    Item {
        id: id.to_string(),
        name: "Padron".to_string(),
        category: "cigar".to_string(),
        quantity: 1,
        time: "2025-06-26 10:00:00".to_string(),
        extra: Default::default(),
    }
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempdir().unwrap();
    let outcome = load(&dir.path().join("default.json"), &clock());

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.status, LoadStatus::Missing);
    assert!(outcome.is_clean());
}

#[test]
fn well_formed_array_is_returned_as_is() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    let items = vec![item("a"), item("b")];
    std::fs::write(&path, codec::encode(&items).unwrap()).unwrap();

    let outcome = load(&path, &clock());

    assert_eq!(outcome.items, items);
    assert_eq!(outcome.status, LoadStatus::Loaded { count: 2, skipped: 0 });
}

#[test]
fn corrupt_file_is_quarantined_with_original_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    std::fs::write(&path, b"{ this is not json").unwrap();

    let outcome = load(&path, &clock());

    assert!(outcome.items.is_empty());
    let LoadStatus::Quarantined { moved_to, .. } = &outcome.status else {
        panic!("expected quarantine, got {:?}", outcome.status);
    };
    assert_eq!(
        moved_to,
        &dir.path().join("default_corrupt_20250626T100000.json")
    );
    assert_eq!(std::fs::read(moved_to).unwrap(), b"{ this is not json");
    assert!(!path.exists());
}

#[test]
fn repeated_quarantine_in_same_second_gets_distinct_name() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    let clock = clock();

    std::fs::write(&path, b"first").unwrap();
    load(&path, &clock);
    std::fs::write(&path, b"second").unwrap();
    let outcome = load(&path, &clock);

    let LoadStatus::Quarantined { moved_to, .. } = &outcome.status else {
        panic!("expected quarantine, got {:?}", outcome.status);
    };
    assert_eq!(
        moved_to,
        &dir.path().join("default_corrupt_20250626T100000_1.json")
    );
    assert_eq!(
        std::fs::read(dir.path().join("default_corrupt_20250626T100000.json")).unwrap(),
        b"first"
    );
    assert_eq!(std::fs::read(moved_to).unwrap(), b"second");
}

#[test]
fn empty_file_is_quarantined() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    std::fs::write(&path, b"").unwrap();

    let outcome = load(&path, &clock());

    assert!(matches!(outcome.status, LoadStatus::Quarantined { .. }));
}

#[test]
fn odd_records_in_a_valid_array_are_loaded_not_quarantined() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    let text = r#"[
        {"id":"a","name":"Padron","category":"cigar","quantity":2,"time":"2025-06-26 10:00:00","notes":"gift"},
        {"id":"b","name":"Lagavulin","category":"whisky","quantity":1.0,"time":"2025-06-26 10:00:00"}
    ]"#;
    std::fs::write(&path, text).unwrap();

    let outcome = load(&path, &clock());

    assert_eq!(outcome.status, LoadStatus::Loaded { count: 2, skipped: 0 });
    assert_eq!(outcome.items.len(), 2);
    assert_eq!(outcome.items[0].extra.get("notes"), Some(&serde_json::json!("gift")));
    assert_eq!(outcome.items[1].quantity, 1);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), text);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn non_object_entries_are_skipped_and_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    std::fs::write(&path, br#"[{"id":"a"}, "loose"]"#).unwrap();

    let outcome = load(&path, &clock());

    assert_eq!(outcome.status, LoadStatus::Loaded { count: 1, skipped: 1 });
    assert!(outcome.is_clean());
    assert!(path.exists());
    assert!(outcome
        .to_string()
        .ends_with("skipped 1 entry(ies) that are not item records."));
}

#[test]
fn non_array_top_level_is_left_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("default.json");
    std::fs::write(&path, br#"{"items": []}"#).unwrap();

    let outcome = load(&path, &clock());

    assert!(outcome.items.is_empty());
    assert_eq!(outcome.status, LoadStatus::NotAnArray { found: "an object" });
    assert!(path.exists());
}

#[test]
fn quarantine_keeps_original_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    assert_eq!(
        quarantine_path(&path, &clock()),
        dir.path().join("notes_corrupt_20250626T100000.txt")
    );
}

#[test]
fn messages_are_human_readable() {
    let missing = LoadOutcome::empty(Path::new("/data/default.json"), LoadStatus::Missing);
    assert_eq!(
        missing.to_string(),
        "No saved data at /data/default.json; starting a new collection."
    );

    let loaded = LoadOutcome::empty(
        Path::new("/data/default.json"),
        LoadStatus::Loaded { count: 3, skipped: 0 },
    );
    assert_eq!(loaded.to_string(), "Loaded 3 item(s) from /data/default.json.");
}
