// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item ID generation
//!
//! IDs are opaque strings assigned once when an item is created. Files loaded
//! from disk may already hold arbitrary IDs, so new ones are checked against
//! the collection before use.

use crate::item::Item;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates candidate item IDs
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> String;
}

/// Next ID from `ids` that no item in `items` already carries
pub fn unused_id(ids: &impl IdGen, items: &[Item]) -> String {
    let taken: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    loop {
        let id = ids.next();
        if !id.is_empty() && !taken.contains(id.as_str()) {
            return id;
        }
        tracing::debug!(%id, "generated item ID already in use, drawing another");
    }
}

/// UUIDv4 generator, the format written to collection files
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... for deterministic tests
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("item")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
