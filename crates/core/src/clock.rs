// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wall-clock abstraction for testable timestamps
//!
//! Item creation times, backup names, and quarantine names all come from a
//! [`Clock`], so tests can pin them with a [`FakeClock`].

use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Item timestamp format, e.g. `2025-06-26 10:00:00`
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// File-name timestamp format for backups and quarantined files, e.g. `20250626T100000`
pub const FILE_STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// A clock that provides the current local wall time
pub trait Clock: Clone + Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real system clock (local time)
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<NaiveDateTime>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(Local::now().naive_local())
    }

    /// Create a clock pinned to the given instant
    pub fn at(instant: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(instant)),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let delta = chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::zero());
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current += delta;
    }

    /// Set the clock to a specific instant
    pub fn set(&self, instant: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        *current = instant;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> NaiveDateTime {
        *self.current.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Format an item timestamp (`YYYY-MM-DD HH:MM:SS`)
pub fn format_time(instant: NaiveDateTime) -> String {
    instant.format(TIME_FORMAT).to_string()
}

/// Parse an item timestamp, returning `None` for anything not in [`TIME_FORMAT`]
pub fn parse_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, TIME_FORMAT).ok()
}

/// Format a whole-second file-name stamp (`YYYYMMDDTHHMMSS`)
pub fn format_file_stamp(instant: NaiveDateTime) -> String {
    instant.format(FILE_STAMP_FORMAT).to_string()
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
