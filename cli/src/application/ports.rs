//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::io;
use std::path::PathBuf;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{DatastorePath, EsxConfig, FileConfig, VmRecord};

// ── Value Types ───────────────────────────────────────────────────────────────

/// Extra options handed to the hypervisor client when connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    pub templates_dir: String,
    pub free_license: bool,
}

/// Everything needed to open a session against one ESX host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    pub insecure: bool,
    pub options: ConnectOptions,
}

impl From<&EsxConfig> for ConnectSettings {
    fn from(config: &EsxConfig) -> Self {
        Self {
            host: config.host.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            insecure: config.insecure,
            options: ConnectOptions {
                templates_dir: config.templates_dir.clone(),
                free_license: config.free_license,
            },
        }
    }
}

// ── Hypervisor Ports ──────────────────────────────────────────────────────────

/// Opens connections to an ESX host.
#[allow(async_fn_in_trait)]
pub trait HypervisorConnector {
    type Connection: HypervisorConnection;

    /// Authenticate against the host and return a live connection.
    async fn connect(&self, settings: &ConnectSettings) -> Result<Self::Connection>;
}

/// An authenticated connection to an ESX host.
#[allow(async_fn_in_trait)]
pub trait HypervisorConnection {
    /// Current VM inventory. Each call re-queries the host.
    async fn virtual_machines(&self) -> Result<Vec<VmRecord>>;
    /// File names under a datastore directory.
    async fn list_templates(&self, dir: &DatastorePath) -> Result<Vec<String>>;
}

/// Finds the current record of one VM by name.
#[allow(async_fn_in_trait)]
pub trait VmLookup {
    /// Returns `None` when no VM with that name is in the inventory.
    async fn find_vm(&self, name: &str) -> Result<Option<VmRecord>>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with extra environment variables and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout, the child process must be killed.
    async fn run(&self, program: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<Output>;
}

// ── Network and Time Ports ────────────────────────────────────────────────────

/// Opens TCP connections for the SSH probe.
#[allow(async_fn_in_trait)]
pub trait TcpDialer {
    type Stream: BannerStream;

    /// Connect to `host:port`, giving up after `timeout` with
    /// `io::ErrorKind::TimedOut`.
    async fn dial(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Stream>;
}

/// A connected socket the probe reads the server banner from.
#[allow(async_fn_in_trait)]
pub trait BannerStream {
    /// Wait up to `timeout` for the socket to become readable, then read
    /// what has arrived as the banner. `Ok(None)` when it never became
    /// readable in time.
    async fn read_banner(&mut self, timeout: Duration) -> io::Result<Option<String>>;
}

/// Timed delays, injectable so polling loops are testable without waiting.
#[allow(async_fn_in_trait)]
pub trait Sleeper {
    async fn sleep(&self, duration: Duration);
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    async fn sleep(&self, duration: Duration) {
        (**self).sleep(duration).await;
    }
}

impl<D: TcpDialer + ?Sized> TcpDialer for &D {
    type Stream = D::Stream;

    async fn dial(&self, host: &str, port: u16, timeout: Duration) -> io::Result<Self::Stream> {
        (**self).dial(host, port, timeout).await
    }
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// One more unsuccessful attempt (printed as a dot).
    fn tick(&self);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving of the config file.
pub trait ConfigStore {
    /// Load the config file, returning defaults when it does not exist.
    fn load(&self) -> Result<FileConfig>;
    /// Persist the config file.
    fn save(&self, config: &FileConfig) -> Result<()>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}
