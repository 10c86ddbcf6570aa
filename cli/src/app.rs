//! Application context: the configuration and connection every ESX command
//! holds and delegates to.
//!
//! Built once per invocation from the merged `EsxConfig`. The connection is
//! opened lazily through `Session::ensure_connected`.

use anyhow::Result;

use crate::application::ports::{ConnectSettings, HypervisorConnector};
use crate::application::services::config_service;
use crate::application::services::session::Session;
use crate::domain::{ConfigOverrides, EsxConfig};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::govc::GovcConnector;
use crate::output::OutputContext;

/// Production connector type.
pub type DefaultConnector = GovcConnector<TokioCommandRunner>;

/// Unified context passed to every command that talks to the ESX host.
pub struct AppContext<C: HypervisorConnector = DefaultConnector> {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Effective configuration for this invocation.
    pub config: EsxConfig,
    /// Lazily opened connection to the ESX host.
    pub session: Session<C>,
}

impl AppContext {
    /// Load the config file, apply command-line overrides and prepare a
    /// `govc` session.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn new(output: OutputContext, overrides: &ConfigOverrides) -> Result<Self> {
        let config = config_service::resolve_config(&YamlConfigStore, overrides)?;
        Ok(Self::with_connector(
            output,
            config,
            GovcConnector::default_runner(),
        ))
    }
}

impl<C: HypervisorConnector> AppContext<C> {
    /// Build a context around an explicit connector.
    pub fn with_connector(output: OutputContext, config: EsxConfig, connector: C) -> Self {
        let settings = ConnectSettings::from(&config);
        Self {
            output,
            config,
            session: Session::new(connector, settings),
        }
    }
}
