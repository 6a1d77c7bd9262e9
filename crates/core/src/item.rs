// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Item records and the shared in-memory collection

use crate::clock::{format_time, parse_time};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::{Arc, Mutex};

/// One tracked item. Field order matches the on-disk record.
///
/// Deserializing never rejects a JSON object: missing fields take their
/// defaults, mistyped ones are coerced (see [`quantity_from_json`]), and keys
/// this type does not know are carried in `extra` so a save writes them back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Opaque unique ID, generated once
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: String,
    /// Free text; compared case-insensitively
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: u64,
    /// Creation time in `YYYY-MM-DD HH:MM:SS`, kept verbatim from disk
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: String,
    /// Unknown keys from disk, written back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: u64,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
            quantity,
            time: format_time(created_at),
            extra: Map::new(),
        }
    }

    /// Parsed creation time, `None` if the stored text is malformed
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        parse_time(&self.time)
    }

    /// Case-insensitive name equality
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }

    /// Case-insensitive category equality
    pub fn in_category(&self, category: &str) -> bool {
        self.category.to_lowercase() == category.to_lowercase()
    }
}

/// Quantity read from an arbitrary JSON value.
///
/// Integers are taken as-is, finite non-negative floats are truncated, and
/// numeric strings are parsed. Anything else, negatives included, reads as 0.
pub fn quantity_from_json(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0)
                    .map(|f| f as u64)
            })
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| quantity_from_json(&value))
}

/// Shared handle to the in-memory item sequence of one collection.
///
/// Clones share the same items. Every read and mutation goes through the
/// same lock, so a [`Collection::snapshot`] taken for a save never observes
/// a half-applied mutation. Callers must not do I/O inside `update`.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    items: Arc<Mutex<Vec<Item>>>,
}

impl Collection {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
        }
    }

    /// Copy of the current items, taken under the collection lock
    pub fn snapshot(&self) -> Vec<Item> {
        self.items.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Run a read-only closure against the current items
    pub fn read<R>(&self, f: impl FnOnce(&[Item]) -> R) -> R {
        let items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        f(&items)
    }

    /// Run a mutating closure against the current items
    pub fn update<R>(&self, f: impl FnOnce(&mut Vec<Item>) -> R) -> R {
        let mut items = self.items.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut items)
    }

    /// Replace the whole item sequence
    pub fn replace(&self, items: Vec<Item>) {
        *self.items.lock().unwrap_or_else(|e| e.into_inner()) = items;
    }

    pub fn len(&self) -> usize {
        self.read(|items| items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Item>> for Collection {
    fn from(items: Vec<Item>) -> Self {
        Self::new(items)
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
