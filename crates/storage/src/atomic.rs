// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Crash-safe whole-file replacement
//!
//! The payload is written to a hidden temp file in the target's directory,
//! fsynced, then renamed over the target. Readers see either the prior file
//! or the complete new one.

use crate::error::StoreError;
use std::io::{self, Write};
use std::path::Path;
use tempfile::Builder;

/// Atomically replace `target` with `payload`.
///
/// On failure the temp file is removed and `target` is left untouched.
pub fn write_atomic(target: &Path, payload: &[u8]) -> Result<(), StoreError> {
    let dir = match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut tmp = Builder::new()
        .prefix(&format!(".{file_name}."))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|e| classify(dir, e))?;

    tmp.write_all(payload).map_err(|e| classify(target, e))?;
    tmp.as_file().sync_all().map_err(|e| classify(target, e))?;
    tmp.persist(target).map_err(|e| classify(target, e.error))?;

    sync_dir(dir);
    tracing::debug!(path = %target.display(), bytes = payload.len(), "wrote file");
    Ok(())
}

fn classify(path: &Path, source: io::Error) -> StoreError {
    let err = StoreError::from_io(path, source);
    match &err {
        StoreError::PermissionDenied { .. } => {
            tracing::error!(path = %path.display(), "permission denied writing file");
        }
        StoreError::StorageExhausted { .. } => {
            tracing::error!(path = %path.display(), "no space left on device");
        }
        _ => tracing::error!(path = %path.display(), error = %err, "write failed"),
    }
    err
}

/// Best-effort fsync of the directory entry after a rename
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(e) = std::fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(dir = %dir.display(), error = %e, "directory sync skipped");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}

#[cfg(test)]
#[path = "atomic_tests.rs"]
mod tests;
