//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{ConfigOverrides, EsxConfig};

/// Load the config file and apply command-line overrides on top.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn resolve_config(store: &impl ConfigStore, overrides: &ConfigOverrides) -> Result<EsxConfig> {
    let file = store.load()?;
    Ok(EsxConfig::resolve(&file, overrides))
}

/// Validate and persist a single key.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the file cannot be
/// read or written. Nothing is written on validation failure.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<()> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)
}
