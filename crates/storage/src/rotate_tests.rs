// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::NaiveDate;
use std::fs::{File, FileTimes};
use std::time::Duration;
use tempfile::tempdir;
use yare::parameterized;

const SUFFIX: &str = "_backup";

fn instant(secs: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 26)
        .unwrap()
        .and_hms_opt(10, 0, secs)
        .unwrap()
}

/// Create a backup named for `instant(secs)`, modified `mtime_offset` seconds after a fixed base
fn make_backup(dir: &Path, name: &str, secs: u32, mtime_offset: u64) -> PathBuf {
    let path = dir.join(backup_file_name(name, SUFFIX, instant(secs)));
    let file = File::create(&path).unwrap();
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_750_000_000 + mtime_offset);
    file.set_times(FileTimes::new().set_modified(mtime)).unwrap();
    path
}

fn names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn backup_name_format() {
    assert_eq!(
        backup_file_name("default", "_backup", instant(7)),
        "default_20250626T100007_backup.json"
    );
}

#[parameterized(
    own_backup = { "default_20250626T100007_backup.json", true },
    main_file = { "default.json", false },
    quarantined = { "default_corrupt_20250626T100007.json", false },
    other_collection = { "default_x_20250626T100007_backup.json", false },
    prefix_collection = { "defaults_20250626T100007_backup.json", false },
    other_suffix = { "default_20250626T100007_old.json", false },
    bad_stamp = { "default_2025-06-26_backup.json", false },
    temp_file = { ".default.json.abc123.tmp", false },
)]
fn matches_only_own_backups(file_name: &str, expected: bool) {
    assert_eq!(is_backup_of(file_name, "default", SUFFIX), expected);
}

#[test]
fn keeps_newest_by_modification_time() {
    let dir = tempdir().unwrap();
    // name order deliberately disagrees with mtime order
    for (secs, offset) in [(5, 0), (4, 1), (3, 2), (2, 3), (1, 4)] {
        make_backup(dir.path(), "default", secs, offset);
    }

    let report = rotate(dir.path(), "default", SUFFIX, 3);

    assert!(report.is_clean());
    assert_eq!(
        names(&report.kept),
        vec![
            "default_20250626T100001_backup.json",
            "default_20250626T100002_backup.json",
            "default_20250626T100003_backup.json",
        ]
    );
    assert_eq!(report.pruned.len(), 2);
    for pruned in &report.pruned {
        assert!(!pruned.exists());
    }
    for kept in &report.kept {
        assert!(kept.exists());
    }
}

#[test]
fn equal_mtimes_break_ties_by_name() {
    let dir = tempdir().unwrap();
    for secs in [1, 2, 3] {
        make_backup(dir.path(), "default", secs, 0);
    }

    let report = rotate(dir.path(), "default", SUFFIX, 2);

    assert_eq!(
        names(&report.kept),
        vec![
            "default_20250626T100003_backup.json",
            "default_20250626T100002_backup.json",
        ]
    );
    assert_eq!(
        names(&report.pruned),
        vec!["default_20250626T100001_backup.json"]
    );
}

#[test]
fn nothing_to_delete_is_clean() {
    let dir = tempdir().unwrap();
    make_backup(dir.path(), "default", 1, 0);

    let report = rotate(dir.path(), "default", SUFFIX, 3);

    assert!(report.is_clean());
    assert_eq!(report.kept.len(), 1);
    assert!(report.pruned.is_empty());
}

#[test]
fn keep_zero_removes_every_backup() {
    let dir = tempdir().unwrap();
    make_backup(dir.path(), "default", 1, 0);
    make_backup(dir.path(), "default", 2, 1);

    let report = rotate(dir.path(), "default", SUFFIX, 0);

    assert!(report.kept.is_empty());
    assert_eq!(report.pruned.len(), 2);
}

#[test]
fn other_files_are_untouched() {
    let dir = tempdir().unwrap();
    let main = dir.path().join("default.json");
    let corrupt = dir.path().join("default_corrupt_20250626T100000.json");
    std::fs::write(&main, "[]").unwrap();
    std::fs::write(&corrupt, "junk").unwrap();
    let other = make_backup(dir.path(), "travel", 1, 0);
    make_backup(dir.path(), "default", 1, 0);
    make_backup(dir.path(), "default", 2, 1);

    rotate(dir.path(), "default", SUFFIX, 1);

    assert!(main.exists());
    assert!(corrupt.exists());
    assert!(other.exists());
}

#[test]
fn directories_with_backup_names_are_ignored() {
    let dir = tempdir().unwrap();
    std::fs::create_dir(dir.path().join(backup_file_name("default", SUFFIX, instant(9)))).unwrap();
    make_backup(dir.path(), "default", 1, 0);

    let report = rotate(dir.path(), "default", SUFFIX, 0);

    assert!(report.is_clean());
    assert_eq!(report.pruned.len(), 1);
}

#[test]
fn missing_directory_reports_failure() {
    let dir = tempdir().unwrap();
    let report = rotate(&dir.path().join("absent"), "default", SUFFIX, 3);

    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 1);
}

#[test]
fn failed_deletion_does_not_stop_the_others() {
    let dir = tempdir().unwrap();
    make_backup(dir.path(), "default", 1, 0);
    let stuck = make_backup(dir.path(), "default", 2, 1);
    make_backup(dir.path(), "default", 3, 2);
    let newest = make_backup(dir.path(), "default", 4, 3);

    let report = rotate_with(dir.path(), "default", SUFFIX, 1, |path| {
        if path == stuck {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        } else {
            std::fs::remove_file(path)
        }
    });

    assert!(!report.is_clean());
    assert_eq!(report.kept, vec![newest]);
    assert_eq!(
        names(&report.pruned),
        vec![
            "default_20250626T100003_backup.json",
            "default_20250626T100001_backup.json",
        ]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, stuck);
    assert!(matches!(
        report.failures[0].error,
        StoreError::PermissionDenied { .. }
    ));
    assert!(stuck.exists());
}

#[test]
fn vanished_backup_counts_as_pruned() {
    let dir = tempdir().unwrap();
    let gone = make_backup(dir.path(), "default", 1, 0);
    make_backup(dir.path(), "default", 2, 1);

    let report = rotate_with(dir.path(), "default", SUFFIX, 1, |path| {
        std::fs::remove_file(path)?;
        if path == gone {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        Ok(())
    });

    assert!(report.is_clean());
    assert_eq!(report.pruned, vec![gone]);
}
