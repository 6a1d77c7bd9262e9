// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic background saving
//!
//! The task sleeps one interval, snapshots the collection, and saves it on
//! the blocking pool. Stop is level-triggered through a watch channel, so it
//! interrupts the sleep and any number of stops are harmless. The task never
//! saves on stop; the host does the final save after joining.

use crate::error::AutosaveError;
use crate::persist::Persist;
use curation_core::{Collection, Config};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Extra time allowed past one interval when joining the task
pub const JOIN_GRACE: Duration = Duration::from_millis(100);

/// Autosave settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveConfig {
    pub interval: Duration,
    /// Initial value of the enabled flag
    pub enabled: bool,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(curation_core::config::DEFAULT_AUTOSAVE_INTERVAL_SECS),
            enabled: true,
        }
    }
}

impl AutosaveConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.autosave_interval(),
            enabled: config.autosave_enabled,
        }
    }

    /// How long to wait for the task after stopping it
    pub fn join_timeout(&self) -> Duration {
        self.interval + JOIN_GRACE
    }
}

/// Counters since the task started
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutosaveStats {
    pub ticks: u64,
    pub saves: u64,
    pub failures: u64,
    /// Ticks that found autosave disabled
    pub skipped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    ticks: AtomicU64,
    saves: AtomicU64,
    failures: AtomicU64,
    skipped: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> AutosaveStats {
        AutosaveStats {
            ticks: self.ticks.load(Ordering::SeqCst),
            saves: self.saves.load(Ordering::SeqCst),
            failures: self.failures.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
        }
    }
}

/// Control handle for a running autosave task.
///
/// Dropping the handle signals stop but does not wait.
pub struct AutosaveHandle {
    name: String,
    config: AutosaveConfig,
    stop_tx: watch::Sender<bool>,
    enabled: Arc<AtomicBool>,
    counters: Arc<Counters>,
    task: Option<JoinHandle<()>>,
}

/// Start autosaving `collection` as `name` every `config.interval`.
///
/// Must be called from within a Tokio runtime.
pub fn start_autosave<P: Persist>(
    persist: Arc<P>,
    name: impl Into<String>,
    collection: Collection,
    config: AutosaveConfig,
) -> AutosaveHandle {
    let name = name.into();
    let (stop_tx, stop_rx) = watch::channel(false);
    let enabled = Arc::new(AtomicBool::new(config.enabled));
    let counters = Arc::new(Counters::default());

    let worker = Worker {
        persist,
        name: name.clone(),
        collection,
        interval: config.interval,
        enabled: Arc::clone(&enabled),
        counters: Arc::clone(&counters),
    };
    let task = tokio::spawn(worker.run(stop_rx));

    tracing::info!(collection = %name, interval = ?config.interval, enabled = config.enabled, "autosave started");
    AutosaveHandle {
        name,
        config,
        stop_tx,
        enabled,
        counters,
        task: Some(task),
    }
}

impl AutosaveHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> AutosaveConfig {
        self.config
    }

    /// Signal the task to stop. Safe to call any number of times.
    pub fn stop(&self) {
        let was_stopped = self.stop_tx.send_replace(true);
        if !was_stopped {
            tracing::debug!(collection = %self.name, "autosave stop requested");
        }
    }

    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Enable or disable saving on future ticks; the task keeps running
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        tracing::info!(collection = %self.name, enabled, "autosave toggled");
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> AutosaveStats {
        self.counters.snapshot()
    }

    /// True once the task has exited, whether or not it has been joined
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, |task| task.is_finished())
    }

    /// Wait up to `timeout` for the task to exit.
    ///
    /// Does not signal stop. After a timeout the handle can be joined again.
    pub async fn join(&mut self, timeout: Duration) -> Result<(), AutosaveError> {
        let Some(task) = self.task.as_mut() else {
            return Ok(());
        };

        match tokio::time::timeout(timeout, task).await {
            Ok(result) => {
                self.task = None;
                match result {
                    Ok(()) => Ok(()),
                    Err(e) if e.is_panic() => Err(AutosaveError::Panicked),
                    Err(_) => Err(AutosaveError::Cancelled),
                }
            }
            Err(_) => Err(AutosaveError::Timeout(timeout)),
        }
    }

    /// Stop and wait up to one interval plus [`JOIN_GRACE`]
    pub async fn shutdown(&mut self) -> Result<AutosaveStats, AutosaveError> {
        self.stop();
        self.join(self.config.join_timeout()).await?;
        let stats = self.stats();
        tracing::info!(
            collection = %self.name,
            saves = stats.saves,
            failures = stats.failures,
            "autosave stopped"
        );
        Ok(stats)
    }
}

impl Drop for AutosaveHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

struct Worker<P: Persist> {
    persist: Arc<P>,
    name: String,
    collection: Collection,
    interval: Duration,
    enabled: Arc<AtomicBool>,
    counters: Arc<Counters>,
}

impl<P: Persist> Worker<P> {
    async fn run(self, mut stop_rx: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                // Also resolves if the handle is gone
                _ = stop_rx.wait_for(|stopped| *stopped) => break,
                _ = ticker.tick() => {}
            }

            self.counters.ticks.fetch_add(1, Ordering::SeqCst);
            if !self.enabled.load(Ordering::SeqCst) {
                self.counters.skipped.fetch_add(1, Ordering::SeqCst);
                tracing::trace!(collection = %self.name, "autosave disabled, skipping tick");
                continue;
            }

            self.save_snapshot().await;
        }

        tracing::debug!(collection = %self.name, "autosave task exiting");
    }

    async fn save_snapshot(&self) {
        let items = self.collection.snapshot();
        let persist = Arc::clone(&self.persist);
        let name = self.name.clone();

        match tokio::task::spawn_blocking(move || persist.save(&name, &items)).await {
            Ok(Ok(report)) => {
                self.counters.saves.fetch_add(1, Ordering::SeqCst);
                if !report.is_complete() {
                    tracing::warn!(collection = %self.name, "autosave completed with rotation failures");
                }
                tracing::debug!(collection = %self.name, items = report.item_count, "autosaved");
            }
            Ok(Err(e)) => {
                self.counters.failures.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(collection = %self.name, error = %e, "autosave failed");
            }
            Err(e) => {
                self.counters.failures.fetch_add(1, Ordering::SeqCst);
                tracing::error!(collection = %self.name, error = %e, "autosave save task panicked");
            }
        }
    }
}

#[cfg(test)]
#[path = "autosave_tests.rs"]
mod tests;
