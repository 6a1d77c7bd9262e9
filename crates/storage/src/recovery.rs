// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Infallible collection loading
//!
//! [`load`] always yields a collection. Anything it cannot use is reported
//! through [`LoadStatus`]. Files that are not JSON at all are moved aside so
//! the next save does not overwrite the evidence; a JSON array is taken as-is.

use crate::codec::{self, DecodeError};
use curation_core::clock::format_file_stamp;
use curation_core::{Clock, Item};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// How a load went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// `skipped` counts array entries that were not item objects
    Loaded { count: usize, skipped: usize },
    /// No file yet; a new collection starts empty
    Missing,
    /// Undecodable content moved to `moved_to`
    Quarantined { moved_to: PathBuf, reason: String },
    /// Undecodable content that could not be moved aside
    QuarantineFailed { reason: String, error: String },
    /// Valid JSON with a non-array top level, left in place
    NotAnArray { found: &'static str },
    PermissionDenied,
    ReadFailed { error: String },
}

/// Items recovered from `path` plus what happened along the way
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub path: PathBuf,
    pub items: Vec<Item>,
    pub status: LoadStatus,
}

impl LoadOutcome {
    fn empty(path: &Path, status: LoadStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            items: Vec::new(),
            status,
        }
    }

    /// True when the file was read cleanly or simply did not exist
    pub fn is_clean(&self) -> bool {
        matches!(
            self.status,
            LoadStatus::Loaded { .. } | LoadStatus::Missing
        )
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self.path.display();
        match &self.status {
            LoadStatus::Loaded { count, skipped: 0 } => {
                write!(f, "Loaded {count} item(s) from {path}.")
            }
            LoadStatus::Loaded { count, skipped } => write!(
                f,
                "Loaded {count} item(s) from {path}; skipped {skipped} entry(ies) that are not item records."
            ),
            LoadStatus::Missing => write!(f, "No saved data at {path}; starting a new collection."),
            LoadStatus::Quarantined { moved_to, reason } => write!(
                f,
                "Could not read {path} ({reason}). The file was moved to {} and an empty collection was loaded.",
                moved_to.display()
            ),
            LoadStatus::QuarantineFailed { reason, error } => write!(
                f,
                "Could not read {path} ({reason}) and could not move it aside ({error}). Starting empty."
            ),
            LoadStatus::NotAnArray { found } => write!(
                f,
                "Expected a list of items in {path} but found {found}. Starting empty."
            ),
            LoadStatus::PermissionDenied => {
                write!(f, "Permission denied reading {path}. Starting empty.")
            }
            LoadStatus::ReadFailed { error } => {
                write!(f, "Failed to read {path}: {error}. Starting empty.")
            }
        }
    }
}

/// Load the collection at `path`. Never fails.
pub fn load(path: &Path, clock: &impl Clock) -> LoadOutcome {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "no collection file, starting empty");
            return LoadOutcome::empty(path, LoadStatus::Missing);
        }
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            tracing::warn!(path = %path.display(), "permission denied reading collection");
            return LoadOutcome::empty(path, LoadStatus::PermissionDenied);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read collection");
            return LoadOutcome::empty(path, LoadStatus::ReadFailed { error: e.to_string() });
        }
    };

    match codec::decode(&bytes) {
        Ok(decoded) => {
            let count = decoded.items.len();
            let skipped = decoded.skipped.len();
            tracing::info!(path = %path.display(), count, skipped, "loaded collection");
            LoadOutcome {
                path: path.to_path_buf(),
                items: decoded.items,
                status: LoadStatus::Loaded { count, skipped },
            }
        }
        Err(DecodeError::NotAnArray(found)) => {
            tracing::warn!(path = %path.display(), found, "collection file is not an array");
            LoadOutcome::empty(path, LoadStatus::NotAnArray { found })
        }
        Err(e @ DecodeError::Syntax(_)) => {
            let reason = e.to_string();
            let status = match quarantine(path, clock) {
                Ok(moved_to) => {
                    tracing::warn!(
                        path = %path.display(),
                        moved_to = %moved_to.display(),
                        %reason,
                        "quarantined corrupt collection file"
                    );
                    LoadStatus::Quarantined { moved_to, reason }
                }
                Err(error) => {
                    tracing::error!(path = %path.display(), %reason, %error, "failed to quarantine corrupt file");
                    LoadStatus::QuarantineFailed {
                        reason,
                        error: error.to_string(),
                    }
                }
            };
            LoadOutcome::empty(path, status)
        }
    }
}

/// `<stem>_corrupt_<YYYYMMDDTHHMMSS><ext>` next to `path`, with `_1`, `_2`, ...
/// appended before the extension if that name is taken
pub fn quarantine_path(path: &Path, clock: &impl Clock) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let base = format!("{stem}_corrupt_{}", format_file_stamp(clock.now()));

    let mut candidate = path.with_file_name(format!("{base}{ext}"));
    let mut n = 1;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{base}_{n}{ext}"));
        n += 1;
    }
    candidate
}

fn quarantine(path: &Path, clock: &impl Clock) -> io::Result<PathBuf> {
    let target = quarantine_path(path, clock);
    std::fs::rename(path, &target)?;
    Ok(target)
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
