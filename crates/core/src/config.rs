// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration surface for storage and autosave
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. `CURATION_DATA_DIR` (decides where the config file lives)
//! 3. `<data_dir>/config.toml`
//! 4. `CURATION_AUTOSAVE` / `CURATION_AUTOSAVE_INTERVAL`
//!
//! Hosts layer their own flags on top of the resolved value.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Collection used when the caller gives no name
pub const DEFAULT_COLLECTION: &str = "default";
/// Suffix appended to timestamped backup names
pub const DEFAULT_BACKUP_SUFFIX: &str = "_backup";
pub const DEFAULT_MAX_BACKUPS: usize = 3;
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 300;
/// Data directory name under the user's home
pub const DATA_DIR_NAME: &str = ".collectory";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_DATA_DIR: &str = "CURATION_DATA_DIR";
pub const ENV_AUTOSAVE: &str = "CURATION_AUTOSAVE";
pub const ENV_AUTOSAVE_INTERVAL: &str = "CURATION_AUTOSAVE_INTERVAL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory; set {ENV_DATA_DIR}")]
    NoHomeDir,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv { var: &'static str, value: String },
    #[error("invalid collection name {0:?}: names must be non-empty and contain no path separators")]
    InvalidCollectionName(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding collections, backups, and the config file
    pub data_dir: PathBuf,
    pub default_collection: String,
    pub backup_suffix: String,
    /// Backups retained per collection after each save
    pub max_backups: usize,
    pub autosave_enabled: bool,
    pub autosave_interval_secs: u64,
}

/// On-disk overrides; every field optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    default_collection: Option<String>,
    backup_suffix: Option<String>,
    max_backups: Option<usize>,
    autosave_enabled: Option<bool>,
    autosave_interval_secs: Option<u64>,
}

impl Config {
    /// Defaults rooted at the given data directory
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            default_collection: DEFAULT_COLLECTION.to_string(),
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            max_backups: DEFAULT_MAX_BACKUPS,
            autosave_enabled: true,
            autosave_interval_secs: DEFAULT_AUTOSAVE_INTERVAL_SECS,
        }
    }

    /// Resolve from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::resolve(|var| std::env::var(var).ok())
    }

    /// Resolve using `env` as the variable lookup
    pub fn resolve<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match env(ENV_DATA_DIR).filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let mut config = Self::with_data_dir(data_dir);
        config.apply_file()?;

        if let Some(value) = env(ENV_AUTOSAVE) {
            config.autosave_enabled = parse_flag(ENV_AUTOSAVE, &value)?;
        }
        if let Some(value) = env(ENV_AUTOSAVE_INTERVAL) {
            config.autosave_interval_secs =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_AUTOSAVE_INTERVAL,
                    value: value.clone(),
                })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Merge `<data_dir>/config.toml` if it exists
    fn apply_file(&mut self) -> Result<(), ConfigError> {
        let path = self.config_file_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        let file: ConfigFile =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "applying config file");

        if let Some(name) = file.default_collection {
            self.default_collection = name;
        }
        if let Some(suffix) = file.backup_suffix {
            self.backup_suffix = suffix;
        }
        if let Some(max) = file.max_backups {
            self.max_backups = max;
        }
        if let Some(enabled) = file.autosave_enabled {
            self.autosave_enabled = enabled;
        }
        if let Some(secs) = file.autosave_interval_secs {
            self.autosave_interval_secs = secs;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_collection_name(&self.default_collection)?;
        if self.autosave_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "autosave_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.backup_suffix.contains(['/', '\\']) {
            return Err(ConfigError::Invalid(format!(
                "backup_suffix {:?} must not contain path separators",
                self.backup_suffix
            )));
        }
        Ok(())
    }

    pub fn config_file_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE_NAME)
    }

    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_interval_secs)
    }

    /// Name to use for `name`, falling back to the default collection when empty
    pub fn collection_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_collection,
        }
    }

    /// `<data_dir>/<name>.json`
    pub fn collection_path(&self, name: Option<&str>) -> PathBuf {
        self.data_dir
            .join(format!("{}.json", self.collection_name(name)))
    }
}

/// Reject names that would escape the data directory or collide with temp files
pub fn validate_collection_name(name: &str) -> Result<(), ConfigError> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\'])
        || Path::new(name).components().count() != 1;
    if bad {
        return Err(ConfigError::InvalidCollectionName(name.to_string()));
    }
    Ok(())
}

/// `~/.collectory`
pub fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(DATA_DIR_NAME))
        .ok_or(ConfigError::NoHomeDir)
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
