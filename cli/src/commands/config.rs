//! `esx config`: show and set configuration values.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::config::ConfigOverrides;
use crate::output::OutputContext;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (e.g. `esx_host`, `insecure`)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or the
/// key or value is invalid.
pub fn run(
    ctx: &OutputContext,
    store: &impl ConfigStore,
    overrides: &ConfigOverrides,
    cmd: ConfigCommand,
) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(ctx, store, overrides),
        ConfigCommand::Set { key, value } => set_config(ctx, store, &key, &value),
    }
}

fn show_config(
    ctx: &OutputContext,
    store: &impl ConfigStore,
    overrides: &ConfigOverrides,
) -> Result<ExitCode> {
    let config = config_service::resolve_config(store, overrides)?;
    let path = store.path()?;

    ctx.header("Configuration");
    ctx.kv("esx_host", &config.host);
    ctx.kv("esx_username", &config.username);
    ctx.kv("esx_password", config.masked_password());
    let templates_dir = if config.templates_dir.is_empty() {
        "(not set)"
    } else {
        config.templates_dir.as_str()
    };
    ctx.kv("templates_dir", templates_dir);
    ctx.kv("free_license", &config.free_license.to_string());
    ctx.kv("insecure", &config.insecure.to_string());
    ctx.kv("ssh_gateway", config.ssh_gateway.as_deref().unwrap_or("(none)"));
    println!();
    ctx.kv("file", &path.display().to_string());
    Ok(ExitCode::SUCCESS)
}

fn set_config(
    ctx: &OutputContext,
    store: &impl ConfigStore,
    key: &str,
    value: &str,
) -> Result<ExitCode> {
    config_service::set_value(store, key, value)?;
    tracing::debug!(key, "config value saved");
    let shown = if key == "esx_password" { "********" } else { value };
    ctx.success(&format!("Set {key} = {shown}"));
    Ok(ExitCode::SUCCESS)
}
