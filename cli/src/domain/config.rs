//! Domain types and validators for ESX connection configuration.
//!
//! Pure functions only, no I/O.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "esx_host",
    "esx_username",
    "esx_password",
    "esx_templates_dir",
    "free_license",
    "insecure",
    "ssh_gateway",
];
pub const BOOLEAN_CONFIG_KEYS: &[&str] = &["free_license", "insecure"];
pub const VALID_BOOLEANS: &[&str] = &["true", "false"];

pub const DEFAULT_ESX_HOST: &str = "127.0.0.1";
pub const DEFAULT_ESX_USERNAME: &str = "root";

// ── Config file schema ───────────────────────────────────────────────────────

/// Configuration stored in `~/.esx/config.yaml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esx_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esx_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esx_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub esx_templates_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_license: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_gateway: Option<String>,
}

impl FileConfig {
    /// Set a single key from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_value(key, value)?;
        let text = Some(value.to_string());
        match key {
            "esx_host" => self.esx_host = text,
            "esx_username" => self.esx_username = text,
            "esx_password" => self.esx_password = text,
            "esx_templates_dir" => self.esx_templates_dir = text,
            "free_license" => self.free_license = Some(value == "true"),
            "insecure" => self.insecure = Some(value == "true"),
            "ssh_gateway" => self.ssh_gateway = text,
            _ => validate_config_key(key)?,
        }
        Ok(())
    }
}

// ── Command-line overrides ───────────────────────────────────────────────────

/// Values given on the command line (or through the matching env var).
/// `None` means "not given" and leaves the file value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub esx_host: Option<String>,
    pub esx_username: Option<String>,
    pub esx_password: Option<String>,
    pub esx_templates_dir: Option<String>,
    pub free_license: Option<bool>,
    pub insecure: Option<bool>,
    pub ssh_gateway: Option<String>,
}

// ── Effective configuration ──────────────────────────────────────────────────

/// Effective configuration for one invocation, built once before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EsxConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    /// Full path on the ESX host, e.g. `/vmfs/volumes/datastore1/templates`.
    pub templates_dir: String,
    pub free_license: bool,
    pub insecure: bool,
    /// SSH gateway used to reach guests. Direct TCP probing is impossible
    /// when set.
    pub ssh_gateway: Option<String>,
}

impl EsxConfig {
    /// Merge command-line overrides on top of the config file, then defaults.
    #[must_use]
    pub fn resolve(file: &FileConfig, overrides: &ConfigOverrides) -> Self {
        fn pick<T: Clone>(flag: Option<&T>, file: Option<&T>) -> Option<T> {
            flag.or(file).cloned()
        }

        Self {
            host: pick(overrides.esx_host.as_ref(), file.esx_host.as_ref())
                .unwrap_or_else(|| DEFAULT_ESX_HOST.to_string()),
            username: pick(overrides.esx_username.as_ref(), file.esx_username.as_ref())
                .unwrap_or_else(|| DEFAULT_ESX_USERNAME.to_string()),
            password: pick(overrides.esx_password.as_ref(), file.esx_password.as_ref())
                .unwrap_or_default(),
            templates_dir: pick(
                overrides.esx_templates_dir.as_ref(),
                file.esx_templates_dir.as_ref(),
            )
            .unwrap_or_default(),
            free_license: pick(overrides.free_license.as_ref(), file.free_license.as_ref())
                .unwrap_or(false),
            insecure: pick(overrides.insecure.as_ref(), file.insecure.as_ref()).unwrap_or(true),
            ssh_gateway: pick(overrides.ssh_gateway.as_ref(), file.ssh_gateway.as_ref())
                .filter(|g| !g.is_empty()),
        }
    }

    /// Password as shown to the user.
    #[must_use]
    pub fn masked_password(&self) -> &'static str {
        if self.password.is_empty() {
            "(not set)"
        } else {
            "********"
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    if BOOLEAN_CONFIG_KEYS.contains(&key) && !VALID_BOOLEANS.contains(&value) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: VALID_BOOLEANS.join(", "),
        }
        .into());
    }
    if key == "esx_host" && value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            valid: "a host name or IP address".to_string(),
        }
        .into());
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
