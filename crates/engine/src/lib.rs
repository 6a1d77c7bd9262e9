// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Curation session engine: background autosave and the host lifecycle

mod autosave;
mod error;
mod persist;
mod session;

#[cfg(any(test, feature = "test-support"))]
mod fake;

pub use autosave::{start_autosave, AutosaveConfig, AutosaveHandle, AutosaveStats, JOIN_GRACE};
pub use error::AutosaveError;
pub use persist::Persist;
pub use session::{Session, ShutdownReport};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakePersist, SaveCall};
