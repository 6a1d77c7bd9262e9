// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the autosave task

use std::time::Duration;
use thiserror::Error;

/// Errors from waiting on the autosave task
#[derive(Debug, Error)]
pub enum AutosaveError {
    #[error("autosave task did not stop within {0:?}")]
    Timeout(Duration),
    #[error("autosave task panicked")]
    Panicked,
    #[error("autosave task was cancelled")]
    Cancelled,
}
