// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded retention of timestamped backups
//!
//! Backups of collection `name` are named `<name>_<YYYYMMDDTHHMMSS><suffix>.json`.
//! Only names matching that shape exactly are considered, so the main file,
//! quarantined files, and other collections sharing a prefix are never pruned.

use crate::error::StoreError;
use chrono::NaiveDateTime;
use curation_core::clock::{format_file_stamp, FILE_STAMP_FORMAT};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// File name of the backup of `name` taken at `instant`
pub fn backup_file_name(name: &str, suffix: &str, instant: NaiveDateTime) -> String {
    format!("{name}_{}{suffix}.json", format_file_stamp(instant))
}

/// Whether `file_name` is a backup of collection `name`
pub fn is_backup_of(file_name: &str, name: &str, suffix: &str) -> bool {
    let Some(rest) = file_name.strip_prefix(name) else {
        return false;
    };
    let Some(rest) = rest.strip_prefix('_') else {
        return false;
    };
    let Some(stamp) = rest.strip_suffix(".json") else {
        return false;
    };
    let Some(stamp) = stamp.strip_suffix(suffix) else {
        return false;
    };
    NaiveDateTime::parse_from_str(stamp, FILE_STAMP_FORMAT).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupFile {
    pub path: PathBuf,
    pub modified: SystemTime,
}

impl BackupFile {
    fn file_name(&self) -> &std::ffi::OsStr {
        self.path.file_name().unwrap_or_default()
    }
}

/// Backups of `name` in `dir`, newest first.
///
/// Ordered by modification time, ties broken by file name (both descending).
/// Entries whose metadata cannot be read are skipped.
pub fn list_backups(dir: &Path, name: &str, suffix: &str) -> Result<Vec<BackupFile>, StoreError> {
    let entries = std::fs::read_dir(dir).map_err(|e| StoreError::from_io(dir, e))?;

    let mut backups: Vec<BackupFile> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| is_backup_of(&entry.file_name().to_string_lossy(), name, suffix))
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            if !metadata.is_file() {
                return None;
            }
            Some(BackupFile {
                path: entry.path(),
                modified: metadata.modified().ok()?,
            })
        })
        .collect();

    backups.sort_by(|a, b| {
        b.modified
            .cmp(&a.modified)
            .then_with(|| b.file_name().cmp(a.file_name()))
    });
    Ok(backups)
}

/// A backup that could not be deleted
#[derive(Debug)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub error: StoreError,
}

/// Result of one rotation pass
#[derive(Debug, Default)]
pub struct RotationReport {
    pub kept: Vec<PathBuf>,
    pub pruned: Vec<PathBuf>,
    pub failures: Vec<PruneFailure>,
}

impl RotationReport {
    /// True when every attempted deletion succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Keep the `keep` newest backups of `name` in `dir` and delete the rest.
///
/// Deletions are independent: one failure does not stop the others.
pub fn rotate(dir: &Path, name: &str, suffix: &str, keep: usize) -> RotationReport {
    rotate_with(dir, name, suffix, keep, |path| std::fs::remove_file(path))
}

fn rotate_with(
    dir: &Path,
    name: &str,
    suffix: &str,
    keep: usize,
    mut remove: impl FnMut(&Path) -> io::Result<()>,
) -> RotationReport {
    let mut report = RotationReport::default();

    let backups = match list_backups(dir, name, suffix) {
        Ok(backups) => backups,
        Err(error) => {
            tracing::warn!(dir = %dir.display(), collection = name, %error, "cannot list backups");
            report.failures.push(PruneFailure {
                path: dir.to_path_buf(),
                error,
            });
            return report;
        }
    };

    let mut backups = backups.into_iter();
    report.kept = backups.by_ref().take(keep).map(|b| b.path).collect();

    for backup in backups {
        match remove(&backup.path) {
            Ok(()) => {
                tracing::debug!(path = %backup.path.display(), "pruned backup");
                report.pruned.push(backup.path);
            }
            // Someone else already removed it; the bound still holds
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                report.pruned.push(backup.path);
            }
            Err(e) => {
                tracing::warn!(path = %backup.path.display(), error = %e, "failed to prune backup");
                let error = StoreError::from_io(&backup.path, e);
                report.failures.push(PruneFailure {
                    path: backup.path,
                    error,
                });
            }
        }
    }

    report
}

#[cfg(test)]
#[path = "rotate_tests.rs"]
mod tests;
