// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.

use curation_core::config::ENV_DATA_DIR;
use curation_storage::{ErrorKind, StoreError};
use std::fmt;
use std::path::Path;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct CliError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Builders for the failures the binary reports before exiting.
impl CliError {
    /// The data directory could not be created or written
    pub fn data_dir_unusable(dir: &Path, err: StoreError) -> Self {
        let base = CliError::new(format!("Cannot use data directory {}", dir.display()))
            .with_context(err.to_string());
        let base = match err.kind() {
            ErrorKind::PermissionDenied => base
                .with_suggestion(format!("Check permissions on {}", dir.display()))
                .with_suggestion("Pick another location with --data-dir"),
            ErrorKind::StorageExhausted => {
                base.with_suggestion("Free up disk space and try again")
            }
            _ => base
                .with_context("The path may exist but not be a directory")
                .with_suggestion("Pick another location with --data-dir")
                .with_suggestion(format!("Or set {ENV_DATA_DIR}")),
        };
        base.with_source(err)
    }

    /// Collection names must be plain file names
    pub fn invalid_collection(name: &str) -> Self {
        CliError::new(format!("Invalid collection name '{}'", name))
            .with_context("Names must be non-empty, must not start with '.', and must not contain path separators")
            .with_suggestion("Use a plain name such as: curation --collection cigars")
    }

    /// The last save on the way out did not reach disk
    pub fn final_save_failed(collection: &str, err: StoreError) -> Self {
        let base = CliError::new(format!("Final save of '{}' failed", collection))
            .with_context(err.to_string())
            .with_context("The previous saved snapshot and its backups were left untouched");
        let base = match err.kind() {
            ErrorKind::StorageExhausted => base.with_suggestion("Free up disk space, then rerun and save"),
            ErrorKind::PermissionDenied => base.with_suggestion("Check permissions on the data directory"),
            _ => base,
        };
        base.with_source(err)
    }
}
