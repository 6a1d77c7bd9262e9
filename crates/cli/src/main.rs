// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! curation - interactive collection tracker

mod error;
mod output;
mod prompt;
mod repl;

use anyhow::Result;
use clap::Parser;
use curation_core::config::{validate_collection_name, ENV_DATA_DIR};
use curation_core::{Config, ConfigError, SystemClock, UuidIdGen};
use curation_engine::{AutosaveConfig, Session};
use curation_storage::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::CliError;
use crate::prompt::Prompter;
use crate::repl::{Exit, Repl};

#[derive(Parser)]
#[command(
    name = "curation",
    version,
    about = "Curation - a collection tracker with analytics"
)]
struct Cli {
    /// Directory holding collections and backups [default: ~/.collectory]
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Collection to open (prompted for when omitted)
    #[arg(short, long, value_name = "NAME")]
    collection: Option<String>,

    /// Seconds between autosaves
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    autosave_interval: Option<u64>,

    /// Start with autosave turned off
    #[arg(long)]
    no_autosave: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = setup_logging(cli.log_file.as_deref())?;

    let config = resolve_config(&cli)?;
    let store = Store::open(config.clone())
        .map_err(|e| CliError::data_dir_unusable(&config.data_dir, e))?;
    let mut prompter = Prompter::stdin();

    let name = match &cli.collection {
        Some(name) => config.collection_name(Some(name.as_str())).to_string(),
        None => {
            let prompt = format!("Enter name to load [{}]: ", config.default_collection);
            match prompter.line(&prompt).await {
                Ok(answer) => config.collection_name(Some(answer.as_str())).to_string(),
                // Nothing loaded yet, so nothing to save
                Err(_) => {
                    println!("\nHave a great day!");
                    return Ok(());
                }
            }
        }
    };
    if validate_collection_name(&name).is_err() {
        return Err(CliError::invalid_collection(&name).into());
    }

    let (mut session, outcome) = Session::open(
        Arc::new(store),
        name.clone(),
        AutosaveConfig::from_config(&config),
    )?;
    println!("{outcome}");

    session.start_autosave();
    if session.autosave_enabled() {
        println!("Autosave every {}s.", config.autosave_interval_secs);
    } else {
        println!("Autosave is off.");
    }

    let exit = Repl::new(&session, SystemClock, UuidIdGen)
        .run(&mut prompter)
        .await;
    if let Exit::Interrupted(interrupt) = exit {
        tracing::debug!(?interrupt, "input interrupted");
        println!("\nInterrupted, saving and exiting...");
    }

    println!("Saving before exit...");
    let report = session.shutdown().await;
    let result = match report.final_save {
        Ok(save) => {
            if save.is_complete() {
                println!("Final save succeeded.");
            } else {
                println!(
                    "Final save succeeded, but {} old backup(s) could not be pruned.",
                    save.rotation.failures.len()
                );
            }
            Ok(())
        }
        Err(e) => {
            println!("Final save FAILED");
            Err(CliError::final_save_failed(&name, e).into())
        }
    };
    println!("Have a great day!");
    result
}

/// Environment and config file, then flags on top
fn resolve_config(cli: &Cli) -> Result<Config, ConfigError> {
    let data_dir = cli
        .data_dir
        .as_ref()
        .map(|dir| dir.to_string_lossy().into_owned());
    let mut config = Config::resolve(|var| match (&data_dir, var) {
        (Some(dir), ENV_DATA_DIR) => Some(dir.clone()),
        _ => std::env::var(var).ok(),
    })?;

    if let Some(secs) = cli.autosave_interval {
        config.autosave_interval_secs = secs;
    }
    if cli.no_autosave {
        config.autosave_enabled = false;
    }
    config.validate()?;
    Ok(config)
}

/// Logs go to stderr so they never interleave with menu output on stdout.
/// `RUST_LOG` overrides the default `warn` filter.
fn setup_logging(
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
        return Ok(None);
    };

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("invalid log file path: {}", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}
