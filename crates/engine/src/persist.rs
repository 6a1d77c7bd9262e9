// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persistence seam between the session layer and storage

use curation_core::{Clock, Item};
use curation_storage::{LoadOutcome, SaveReport, Store, StoreError};

/// Loads and saves whole collections by name.
///
/// Calls block on disk I/O; async callers run them on the blocking pool.
pub trait Persist: Send + Sync + 'static {
    /// Load `name`. Errors only when the name itself is unusable.
    fn load(&self, name: &str) -> Result<LoadOutcome, StoreError>;

    /// Durably save `items` as `name`
    fn save(&self, name: &str, items: &[Item]) -> Result<SaveReport, StoreError>;
}

impl<C: Clock + 'static> Persist for Store<C> {
    fn load(&self, name: &str) -> Result<LoadOutcome, StoreError> {
        self.load_collection(name)
    }

    fn save(&self, name: &str, items: &[Item]) -> Result<SaveReport, StoreError> {
        Store::save(self, name, items)
    }
}
