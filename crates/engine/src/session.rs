// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host session lifecycle
//!
//! Owns one loaded collection and drives it through startup, optional
//! autosave, on-demand saves, and shutdown:
//!
//! 1. [`Session::open`] loads through the recovery loader
//! 2. [`Session::start_autosave`] spawns the background task
//! 3. [`Session::shutdown`] stops autosave, waits for it, then saves once more

use crate::autosave::{start_autosave, AutosaveConfig, AutosaveHandle, AutosaveStats};
use crate::error::AutosaveError;
use crate::persist::Persist;
use curation_core::Collection;
use curation_storage::{LoadOutcome, SaveReport, StoreError};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

/// One open collection and its autosave task
pub struct Session<P: Persist> {
    persist: Arc<P>,
    name: String,
    collection: Collection,
    autosave_config: AutosaveConfig,
    autosave: Option<AutosaveHandle>,
}

/// What happened during [`Session::shutdown`]
#[derive(Debug)]
pub struct ShutdownReport {
    /// `None` if autosave was never started
    pub autosave: Option<Result<AutosaveStats, AutosaveError>>,
    pub final_save: Result<SaveReport, StoreError>,
}

impl ShutdownReport {
    pub fn saved(&self) -> bool {
        self.final_save.is_ok()
    }
}

impl<P: Persist> Session<P> {
    /// Load collection `name`; the outcome says whether recovery kicked in
    pub fn open(
        persist: Arc<P>,
        name: impl Into<String>,
        autosave_config: AutosaveConfig,
    ) -> Result<(Self, LoadOutcome), StoreError> {
        let name = name.into();
        let outcome = persist.load(&name)?;
        let collection = Collection::new(outcome.items.clone());

        tracing::info!(collection = %name, items = collection.len(), "session opened");
        let session = Self {
            persist,
            name,
            collection,
            autosave_config,
            autosave: None,
        };
        Ok((session, outcome))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Shared handle to the live items
    pub fn collection(&self) -> &Collection {
        &self.collection
    }

    /// Spawn the autosave task. No-op if it is already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_autosave(&mut self) {
        if self.autosave.is_some() {
            return;
        }
        self.autosave = Some(start_autosave(
            Arc::clone(&self.persist),
            self.name.clone(),
            self.collection.clone(),
            self.autosave_config,
        ));
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave
            .as_ref()
            .is_some_and(|handle| !handle.is_stopped())
    }

    pub fn autosave_enabled(&self) -> bool {
        match &self.autosave {
            Some(handle) => handle.is_enabled(),
            None => self.autosave_config.enabled,
        }
    }

    /// Toggle saving on future ticks, before or after the task starts
    pub fn set_autosave_enabled(&mut self, enabled: bool) {
        self.autosave_config.enabled = enabled;
        if let Some(handle) = &self.autosave {
            handle.set_enabled(enabled);
        }
    }

    pub fn autosave_stats(&self) -> Option<AutosaveStats> {
        self.autosave.as_ref().map(AutosaveHandle::stats)
    }

    /// Save a snapshot of the current items now, on the blocking pool
    pub async fn save(&self) -> Result<SaveReport, StoreError> {
        let items = self.collection.snapshot();
        let persist = Arc::clone(&self.persist);
        let name = self.name.clone();

        match tokio::task::spawn_blocking(move || persist.save(&name, &items)).await {
            Ok(result) => result,
            Err(e) => match e.try_into_panic() {
                Ok(payload) => std::panic::resume_unwind(payload),
                // Runtime shutting down before the save started
                Err(e) => Err(StoreError::Filesystem {
                    path: PathBuf::from(&self.name),
                    source: io::Error::new(io::ErrorKind::Interrupted, e.to_string()),
                }),
            },
        }
    }

    /// Stop autosave, wait for it, then perform the final save.
    ///
    /// The final save runs even if the task failed to stop in time.
    pub async fn shutdown(mut self) -> ShutdownReport {
        let autosave = match self.autosave.as_mut() {
            Some(handle) => {
                let result = handle.shutdown().await;
                if let Err(e) = &result {
                    tracing::warn!(collection = %self.name, error = %e, "autosave did not stop cleanly");
                }
                Some(result)
            }
            None => None,
        };

        let final_save = self.save().await;
        match &final_save {
            Ok(report) => {
                tracing::info!(collection = %self.name, items = report.item_count, "final save complete");
            }
            Err(e) => {
                tracing::error!(collection = %self.name, error = %e, "final save failed");
            }
        }

        ShutdownReport {
            autosave,
            final_save,
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
