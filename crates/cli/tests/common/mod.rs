// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs::{File, FileTimes};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Fresh data directory plus an isolated home, so nothing touches `~/.collectory`
pub struct TestEnv {
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir_all(temp.path().join("data")).expect("Failed to create data dir");
        Self { temp }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.temp.path().join("data")
    }

    /// `curation` pointed at this env's data dir with autosave off
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("curation").expect("binary should build");
        cmd.env("HOME", self.temp.path())
            .env_remove("CURATION_DATA_DIR")
            .env_remove("CURATION_AUTOSAVE")
            .env_remove("CURATION_AUTOSAVE_INTERVAL")
            .env_remove("RUST_LOG")
            .arg("--data-dir")
            .arg(self.data_dir())
            .arg("--no-autosave");
        cmd
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir().join(file_name)
    }

    /// Parsed JSON array at `<data_dir>/<file_name>`
    pub fn read_items(&self, file_name: &str) -> Vec<Value> {
        let content = std::fs::read_to_string(self.path(file_name)).expect("collection file");
        match serde_json::from_str(&content).expect("valid JSON") {
            Value::Array(items) => items,
            other => panic!("expected array, got {other}"),
        }
    }

    /// File names in the data dir starting with `prefix` and ending with `suffix`
    pub fn files_matching(&self, prefix: &str, suffix: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.data_dir())
            .expect("read data dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(prefix) && name.ends_with(suffix))
            .collect();
        names.sort();
        names
    }

    /// Backups of `name` under the default suffix
    pub fn backups(&self, name: &str) -> Vec<String> {
        self.files_matching(&format!("{name}_"), "_backup.json")
    }

    /// Seed `<name>.json` with the given items
    pub fn seed(&self, name: &str, items: Value) {
        std::fs::write(
            self.path(&format!("{name}.json")),
            serde_json::to_vec_pretty(&items).expect("encode"),
        )
        .expect("seed collection");
    }
}

/// Create an empty backup file modified `mtime_offset` seconds after a fixed old instant
pub fn old_backup(dir: &Path, file_name: &str, mtime_offset: u64) -> PathBuf {
    let path = dir.join(file_name);
    let file = File::create(&path).expect("create backup");
    let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000 + mtime_offset);
    file.set_times(FileTimes::new().set_modified(mtime))
        .expect("set mtime");
    path
}
