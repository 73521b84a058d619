//! Setup shared by every focusmania binary.

// Each binary compiles this module separately and uses a subset of it.
#![allow(dead_code)]

use anyhow::{Context, Result};
use clap::ValueEnum;
use focusmania_core::logging::LoggingGuard;
use focusmania_core::{ingest, Config, TaskRecord};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Load configuration and start file logging.
pub fn init(bin: &str) -> Result<(Config, LoggingGuard)> {
    Config::ensure_xdg_env();

    let config = Config::load().context("failed to load configuration")?;
    let guard =
        focusmania_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!(bin, "starting");
    Ok((config, guard))
}

/// `--data` if given, otherwise the configured cleaned log.
pub fn data_path(explicit: Option<PathBuf>, config: &Config) -> PathBuf {
    explicit.unwrap_or_else(|| config.data.cleaned_path())
}

/// Load the cleaned history, reporting skipped rows on stderr.
pub fn load_records(path: &Path) -> Result<Vec<TaskRecord>> {
    let loaded = ingest::load_history(path)
        .with_context(|| format!("failed to load task history from {}", path.display()))?;

    for warning in &loaded.warnings {
        eprintln!("warning: {}", warning);
    }
    if !loaded.warnings.is_empty() {
        eprintln!("{} row(s) skipped", loaded.warnings.len());
    }

    Ok(loaded.records)
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
