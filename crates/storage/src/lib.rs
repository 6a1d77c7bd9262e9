// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable JSON persistence for curation collections
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/
//! ├── <name>.json                              # main snapshot
//! ├── <name>_<YYYYMMDDTHHMMSS><suffix>.json    # rotated backups
//! └── <name>_corrupt_<YYYYMMDDTHHMMSS>.json    # quarantined unreadable file
//! ```

pub mod atomic;
pub mod codec;
mod error;
pub mod recovery;
pub mod rotate;
mod store;

pub use atomic::write_atomic;
pub use error::{ErrorKind, StoreError};
pub use recovery::{load, LoadOutcome, LoadStatus};
pub use rotate::{rotate, BackupFile, PruneFailure, RotationReport};
pub use store::{SaveReport, Store};
