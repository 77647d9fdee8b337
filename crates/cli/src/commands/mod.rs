//! Subcommand implementations.

pub mod chunk;
pub mod config_cmd;
pub mod history;
pub mod render;

use std::path::Path;

use anyhow::Context;
use selene_config::EngineConfig;
use serde::de::DeserializeOwned;

/// The config at `path`, or the default location when none is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    config.context("Failed to load config")
}

pub fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = read_text(path)?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}
