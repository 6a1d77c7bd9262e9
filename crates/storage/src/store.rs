// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Save orchestration over one data directory

use crate::atomic::write_atomic;
use crate::codec;
use crate::error::StoreError;
use crate::recovery::{self, LoadOutcome};
use crate::rotate::{self, backup_file_name, BackupFile, RotationReport};
use curation_core::config::validate_collection_name;
use curation_core::{Clock, Config, Item, SystemClock};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Durable storage for every collection under one data directory.
///
/// All writes through a `Store` are serialized by its write lock, whichever
/// collection they target.
pub struct Store<C: Clock = SystemClock> {
    config: Config,
    clock: C,
    write_lock: Mutex<()>,
}

/// What a completed save produced
#[derive(Debug)]
pub struct SaveReport {
    pub collection: String,
    pub main: PathBuf,
    pub backup: PathBuf,
    pub item_count: usize,
    pub rotation: RotationReport,
}

impl SaveReport {
    /// Main file and backup written and every surplus backup pruned
    pub fn is_complete(&self) -> bool {
        self.rotation.is_clean()
    }
}

impl Store<SystemClock> {
    pub fn open(config: Config) -> Result<Self, StoreError> {
        Self::open_with_clock(config, SystemClock)
    }
}

impl<C: Clock> Store<C> {
    /// Open a store, creating the data directory if needed.
    ///
    /// Fails fast if the directory cannot be created or written to.
    pub fn open_with_clock(config: Config, clock: C) -> Result<Self, StoreError> {
        let dir = &config.data_dir;
        std::fs::create_dir_all(dir).map_err(|e| StoreError::from_io(dir, e))?;
        tempfile::tempfile_in(dir).map_err(|e| StoreError::from_io(dir, e))?;

        tracing::debug!(data_dir = %dir.display(), "opened store");
        Ok(Self {
            config,
            clock,
            write_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Main file path for `name`
    pub fn collection_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_collection_name(name)?;
        Ok(self.config.collection_path(Some(name)))
    }

    /// Load an arbitrary collection file. Never fails.
    pub fn load(&self, path: &Path) -> LoadOutcome {
        recovery::load(path, &self.clock)
    }

    /// Load collection `name`; errors only for an invalid name
    pub fn load_collection(&self, name: &str) -> Result<LoadOutcome, StoreError> {
        let path = self.collection_path(name)?;
        Ok(self.load(&path))
    }

    /// Atomically replace `path` while holding the write lock
    pub fn write(&self, path: &Path, payload: &[u8]) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        write_atomic(path, payload)
    }

    /// Write the main file, write a timestamped backup, then prune old backups.
    ///
    /// The whole sequence runs under the write lock. A rotation failure is
    /// reported in the [`SaveReport`] rather than failing the save.
    pub fn save(&self, name: &str, items: &[Item]) -> Result<SaveReport, StoreError> {
        let main = self.collection_path(name)?;
        let payload = codec::encode(items)?;
        let dir = self.data_dir();
        let suffix = &self.config.backup_suffix;

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Err(e) = write_atomic(&main, &payload) {
            tracing::error!(collection = name, error = %e, "save failed writing main file");
            return Err(e);
        }

        let backup = dir.join(backup_file_name(name, suffix, self.clock.now()));
        if let Err(e) = write_atomic(&backup, &payload) {
            tracing::error!(collection = name, error = %e, "save failed writing backup");
            return Err(e);
        }

        let rotation = rotate::rotate(dir, name, suffix, self.config.max_backups);
        if !rotation.is_clean() {
            tracing::warn!(
                collection = name,
                failures = rotation.failures.len(),
                "backup rotation incomplete"
            );
        }

        tracing::info!(
            collection = name,
            items = items.len(),
            path = %main.display(),
            "saved collection"
        );
        Ok(SaveReport {
            collection: name.to_string(),
            main,
            backup,
            item_count: items.len(),
            rotation,
        })
    }

    /// Backups of `name`, newest first
    pub fn backups(&self, name: &str) -> Result<Vec<BackupFile>, StoreError> {
        validate_collection_name(name)?;
        rotate::list_backups(self.data_dir(), name, &self.config.backup_suffix)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
