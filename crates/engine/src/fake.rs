// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory persistence for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use crate::persist::Persist;
use curation_core::config::validate_collection_name;
use curation_core::Item;
use curation_storage::{LoadOutcome, LoadStatus, RotationReport, SaveReport, StoreError};
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded save call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveCall {
    pub name: String,
    pub items: Vec<Item>,
}

/// Fake persistence backend that records every save
#[derive(Clone, Default)]
pub struct FakePersist {
    stored: Arc<Mutex<HashMap<String, Vec<Item>>>>,
    saves: Arc<Mutex<Vec<SaveCall>>>,
    fail_saves: Arc<AtomicBool>,
    save_delay: Arc<Mutex<Duration>>,
}

impl FakePersist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a collection so `load` finds it
    pub fn with_items(self, name: &str, items: Vec<Item>) -> Self {
        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), items);
        self
    }

    /// Get all recorded saves
    pub fn saves(&self) -> Vec<SaveCall> {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn save_count(&self) -> usize {
        self.saves.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Last successfully saved items for `name`
    pub fn stored(&self, name: &str) -> Option<Vec<Item>> {
        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
    }

    /// Make subsequent saves fail with an out-of-space error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Block every save for `delay` before it completes
    pub fn set_save_delay(&self, delay: Duration) {
        *self.save_delay.lock().unwrap_or_else(|e| e.into_inner()) = delay;
    }

    fn path(name: &str) -> PathBuf {
        PathBuf::from(format!("{name}.json"))
    }
}

impl Persist for FakePersist {
    fn load(&self, name: &str) -> Result<LoadOutcome, StoreError> {
        validate_collection_name(name)?;
        let items = self.stored(name);
        let status = match &items {
            Some(items) => LoadStatus::Loaded {
                count: items.len(),
                skipped: 0,
            },
            None => LoadStatus::Missing,
        };
        Ok(LoadOutcome {
            path: Self::path(name),
            items: items.unwrap_or_default(),
            status,
        })
    }

    fn save(&self, name: &str, items: &[Item]) -> Result<SaveReport, StoreError> {
        validate_collection_name(name)?;

        let delay = *self.save_delay.lock().unwrap_or_else(|e| e.into_inner());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }

        self.saves
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SaveCall {
                name: name.to_string(),
                items: items.to_vec(),
            });

        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::StorageExhausted {
                path: Self::path(name),
                source: io::Error::from(io::ErrorKind::StorageFull),
            });
        }

        self.stored
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), items.to_vec());

        Ok(SaveReport {
            collection: name.to_string(),
            main: Self::path(name),
            backup: PathBuf::from(format!("{name}_backup.json")),
            item_count: items.len(),
            rotation: RotationReport::default(),
        })
    }
}
