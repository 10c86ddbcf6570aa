//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}

// ── Connection errors ─────────────────────────────────────────────────────────

/// Errors raised while opening a session against an ESX host.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("{program} not found in PATH. Install it to talk to ESX hosts.")]
    ClientNotFound { program: String },

    #[error("Cannot connect to ESX host {host}: {reason}")]
    ConnectFailed { host: String, reason: String },
}

// ── VM errors ─────────────────────────────────────────────────────────────────

/// Errors related to VM inventory and templates.
#[derive(Debug, Error)]
pub enum VmError {
    #[error("VM '{0}' not found on the ESX host.")]
    NotFound(String),

    #[error("No templates directory configured. Pass --esx-templates-dir or run: esx config set esx_templates_dir <path>")]
    TemplatesDirNotSet,

    #[error(
        "Invalid templates directory '{0}': expected /vmfs/volumes/<datastore>/<path> or [<datastore>] <path>"
    )]
    InvalidTemplatesDir(String),
}
