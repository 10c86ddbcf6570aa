//! Explicit, lazily opened connection to the ESX host.

use anyhow::{Context, Result};

use crate::application::ports::{ConnectSettings, HypervisorConnector, ProgressReporter};

/// Holds the connection settings and, once opened, the connection itself.
pub struct Session<C: HypervisorConnector> {
    connector: C,
    settings: ConnectSettings,
    connection: Option<C::Connection>,
}

impl<C: HypervisorConnector> Session<C> {
    pub fn new(connector: C, settings: ConnectSettings) -> Self {
        Self {
            connector,
            settings,
            connection: None,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Return the open connection, connecting first if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the connector fails. A failed attempt leaves the
    /// session disconnected so a later call retries.
    pub async fn ensure_connected(
        &mut self,
        reporter: &impl ProgressReporter,
    ) -> Result<&C::Connection> {
        if self.connection.is_none() {
            let host = &self.settings.host;
            reporter.step(&format!("Connecting to ESX host {host}..."));
            tracing::debug!(
                host = %host,
                username = %self.settings.username,
                insecure = self.settings.insecure,
                "connecting"
            );
            let connection = self
                .connector
                .connect(&self.settings)
                .await
                .with_context(|| format!("connecting to {host}"))?;
            self.connection = Some(connection);
        }
        self.connection.as_ref().context("connection not established")
    }
}
