// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Storage error types

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no file found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed data in {}: {reason}", path.display())]
    MalformedData { path: PathBuf, reason: String },

    #[error("permission denied: cannot access {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left on device while writing {}", path.display())]
    StorageExhausted {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    InvalidName(#[from] curation_core::ConfigError),
}

/// Coarse classification of a [`StoreError`], for hosts that branch on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    MalformedData,
    PermissionDenied,
    StorageExhausted,
    Filesystem,
    Encode,
    InvalidName,
}

impl StoreError {
    /// Classify an I/O error raised while touching `path`
    pub fn from_io(path: &Path, source: io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound { path },
            io::ErrorKind::PermissionDenied => StoreError::PermissionDenied { path, source },
            io::ErrorKind::StorageFull => StoreError::StorageExhausted { path, source },
            _ => StoreError::Filesystem { path, source },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::MalformedData { .. } => ErrorKind::MalformedData,
            StoreError::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            StoreError::StorageExhausted { .. } => ErrorKind::StorageExhausted,
            StoreError::Filesystem { .. } => ErrorKind::Filesystem,
            StoreError::Encode(_) => ErrorKind::Encode,
            StoreError::InvalidName(_) => ErrorKind::InvalidName,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_are_classified() {
        let path = Path::new("/data/default.json");
        let cases = [
            (io::ErrorKind::NotFound, ErrorKind::NotFound),
            (io::ErrorKind::PermissionDenied, ErrorKind::PermissionDenied),
            (io::ErrorKind::StorageFull, ErrorKind::StorageExhausted),
            (io::ErrorKind::Other, ErrorKind::Filesystem),
        ];
        for (io_kind, expected) in cases {
            let err = StoreError::from_io(path, io::Error::from(io_kind));
            assert_eq!(err.kind(), expected, "{io_kind:?}");
        }
    }

    #[test]
    fn storage_exhausted_has_distinct_message() {
        let err = StoreError::from_io(
            Path::new("/data/default.json"),
            io::Error::from(io::ErrorKind::StorageFull),
        );
        assert_eq!(
            err.to_string(),
            "no space left on device while writing /data/default.json"
        );
    }
}
