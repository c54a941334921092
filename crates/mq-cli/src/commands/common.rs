//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use mq_core::{Config, CoreError, ExperimentId, SessionId};
use mq_store::{ExperimentStore, StoreError};
use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Load the configuration from `--config`, or `mq2.yml` in the working
/// directory, applying the `--upload-folder` override.
///
/// Without a configuration file, `--upload-folder` alone is enough.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    let loaded = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(Path::new(".")),
    };

    let mut config = match (loaded, &global.upload_folder) {
        (Ok(config), _) => config,
        (Err(CoreError::ConfigNotFound { .. }), Some(folder)) if global.config.is_none() => {
            log::debug!("No mq2.yml found, using upload folder {folder}");
            Config::with_upload_folder(folder)
        }
        (Err(e), _) => {
            return Err(StoreError::from(e)).context("Failed to load configuration");
        }
    };

    if let Some(folder) = &global.upload_folder {
        config.upload_folder = folder.into();
    }
    Ok(config)
}

/// Open the experiment store described by the global arguments.
pub(crate) fn open_store(global: &GlobalArgs) -> Result<ExperimentStore> {
    let config = load_config(global)?;
    let folder = config.upload_folder.display().to_string();
    ExperimentStore::open(config)
        .with_context(|| format!("Failed to open upload folder {folder}"))
}

/// Parse a session id argument.
pub(crate) fn parse_session(value: &str) -> Result<SessionId> {
    Ok(SessionId::parse(value).map_err(StoreError::from)?)
}

/// Parse an experiment id argument.
pub(crate) fn parse_experiment(value: &str) -> Result<ExperimentId> {
    Ok(ExperimentId::parse(value).map_err(StoreError::from)?)
}

/// Render an optional value, `-` when unknown.
pub(crate) fn or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// Print any serializable value as pretty JSON.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
