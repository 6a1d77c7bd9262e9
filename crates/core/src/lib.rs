// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! curation-core: Core library for the curation collection tracker
//!
//! This crate provides:
//! - The `Item` record and the shared, snapshot-able `Collection`
//! - Pure domain operations (add, remove, search, filter, aggregates)
//! - Clock and ID abstractions for deterministic tests
//! - The configuration surface consumed by storage and the hosts

pub mod clock;
pub mod config;
pub mod id;
pub mod item;
pub mod ops;

// Re-exports
pub use clock::{format_file_stamp, format_time, parse_time, Clock, FakeClock, SystemClock};
pub use config::{Config, ConfigError};
pub use id::{unused_id, IdGen, SequentialIdGen, UuidIdGen};
pub use item::{Collection, Item};
