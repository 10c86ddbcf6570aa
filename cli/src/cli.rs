//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;
use crate::domain::ConfigOverrides;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Inspect and wait on virtual machines of an ESX/ESXi host
#[derive(Parser)]
#[command(
    name = "esx",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also honours a non-empty NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase diagnostic logging (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(flatten)]
    pub esx: EsxArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// ESX connection options.
#[derive(Args, Default)]
#[command(next_help_heading = "ESX options")]
pub struct EsxArgs {
    /// ESX host to connect to
    #[arg(long, global = true, env = "ESX_HOST", value_name = "ADDRESS")]
    pub esx_host: Option<String>,

    /// ESX username
    #[arg(long, global = true, env = "ESX_USERNAME", value_name = "USERNAME")]
    pub esx_username: Option<String>,

    /// ESX password
    #[arg(
        long,
        global = true,
        env = "ESX_PASSWORD",
        hide_env_values = true,
        value_name = "PASSWORD"
    )]
    pub esx_password: Option<String>,

    /// Datastore directory holding templates (e.g. /vmfs/volumes/datastore1/templates)
    #[arg(long, global = true, env = "ESX_TEMPLATES_DIR", value_name = "DIR")]
    pub esx_templates_dir: Option<String>,

    /// The host runs the free ESXi license
    #[arg(long, global = true, overrides_with = "no_free_license")]
    pub free_license: bool,

    /// The host runs a paid license
    #[arg(long, global = true, overrides_with = "free_license")]
    pub no_free_license: bool,

    /// Skip TLS certificate verification (default)
    #[arg(long, global = true, overrides_with = "no_insecure")]
    pub insecure: bool,

    /// Verify the host's TLS certificate
    #[arg(long, global = true, overrides_with = "insecure")]
    pub no_insecure: bool,

    /// Gateway used to reach guests over SSH
    #[arg(long, global = true, value_name = "GATEWAY")]
    pub ssh_gateway: Option<String>,
}

impl EsxArgs {
    /// Values given on the command line or through their env vars.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            esx_host: self.esx_host.clone(),
            esx_username: self.esx_username.clone(),
            esx_password: self.esx_password.clone(),
            esx_templates_dir: self.esx_templates_dir.clone(),
            free_license: flag_pair(self.free_license, self.no_free_license),
            insecure: flag_pair(self.insecure, self.no_insecure),
            ssh_gateway: self.ssh_gateway.clone(),
        }
    }
}

/// `--flag` / `--no-flag`; `None` when neither was given.
fn flag_pair(yes: bool, no: bool) -> Option<bool> {
    match (yes, no) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect virtual machines
    #[command(subcommand)]
    Vm(commands::vm::VmCommand),

    /// Inspect templates
    #[command(subcommand)]
    Template(commands::template::TemplateCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            esx,
            command,
            ..
        } = self;
        let overrides = esx.overrides();
        match command {
            Command::Version => {
                commands::version::run();
                Ok(ExitCode::SUCCESS)
            }
            Command::Config(cmd) => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::config::run(&ctx, &YamlConfigStore, &overrides, cmd)
            }
            Command::Vm(cmd) => {
                let mut app = AppContext::new(OutputContext::new(no_color, quiet), &overrides)?;
                commands::vm::run(&mut app, cmd).await
            }
            Command::Template(cmd) => {
                let mut app = AppContext::new(OutputContext::new(no_color, quiet), &overrides)?;
                commands::template::run(&mut app, cmd).await
            }
        }
    }
}
