//! Hypervisor adapter backed by the `govc` CLI.
//!
//! `GovcConnector<R>` routes every `govc` call through a `CommandRunner`.
//! Credentials travel in the child environment, never in argv.

use std::process::Output;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{
    CommandRunner, ConnectSettings, HypervisorConnection, HypervisorConnector,
};
use crate::domain::{ConnectionError, DatastorePath, VmRecord};
use crate::infra::command_runner::TokioCommandRunner;

/// Name of the vSphere CLI binary.
pub const GOVC: &str = "govc";

/// Opens `govc` sessions. Generic over `R` so tests can inject a mock runner.
#[derive(Debug, Clone)]
pub struct GovcConnector<R> {
    runner: R,
}

impl<R: CommandRunner + Clone> GovcConnector<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl GovcConnector<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner + Clone> HypervisorConnector for GovcConnector<R> {
    type Connection = GovcConnection<R>;

    async fn connect(&self, settings: &ConnectSettings) -> Result<GovcConnection<R>> {
        tracing::debug!(
            templates_dir = %settings.options.templates_dir,
            free_license = settings.options.free_license,
            "opening govc session"
        );
        let conn = GovcConnection {
            runner: self.runner.clone(),
            env: GovcEnv::from(settings),
        };

        let output = conn.govc(&["about", "-json"]).await?;
        if !output.status.success() {
            return Err(ConnectionError::ConnectFailed {
                host: settings.host.clone(),
                reason: stderr_reason(&output),
            }
            .into());
        }
        Ok(conn)
    }
}

/// `GOVC_*` variables for one host.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GovcEnv {
    url: String,
    username: String,
    password: String,
    insecure: bool,
}

impl From<&ConnectSettings> for GovcEnv {
    fn from(settings: &ConnectSettings) -> Self {
        Self {
            url: settings.host.clone(),
            username: settings.username.clone(),
            password: settings.password.clone(),
            insecure: settings.insecure,
        }
    }
}

impl GovcEnv {
    fn vars(&self) -> [(&str, &str); 4] {
        [
            ("GOVC_URL", self.url.as_str()),
            ("GOVC_USERNAME", self.username.as_str()),
            ("GOVC_PASSWORD", self.password.as_str()),
            ("GOVC_INSECURE", if self.insecure { "true" } else { "false" }),
        ]
    }
}

/// A `govc` session against one ESX host.
#[derive(Debug, Clone)]
pub struct GovcConnection<R> {
    runner: R,
    env: GovcEnv,
}

impl<R: CommandRunner> GovcConnection<R> {
    async fn govc(&self, args: &[&str]) -> Result<Output> {
        self.runner
            .run(GOVC, args, &self.env.vars())
            .await
            .map_err(|e| {
                let missing = e.chain().any(|cause| {
                    cause
                        .downcast_ref::<std::io::Error>()
                        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
                });
                if missing {
                    anyhow::Error::from(ConnectionError::ClientNotFound {
                        program: GOVC.to_string(),
                    })
                } else {
                    e
                }
            })
            .with_context(|| format!("{GOVC} {}", args.first().copied().unwrap_or_default()))
    }

    async fn govc_ok(&self, args: &[&str]) -> Result<Output> {
        let output = self.govc(args).await?;
        anyhow::ensure!(
            output.status.success(),
            "{GOVC} {} failed: {}",
            args.first().copied().unwrap_or_default(),
            stderr_reason(&output)
        );
        Ok(output)
    }
}

impl<R: CommandRunner> HypervisorConnection for GovcConnection<R> {
    async fn virtual_machines(&self) -> Result<Vec<VmRecord>> {
        // `find` walks every folder and prints nothing on an empty host.
        let found = self.govc_ok(&["find", "/", "-type", "m"]).await?;
        let paths = stdout_lines(&found);
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let mut args = vec!["vm.info", "-json"];
        args.extend(paths.iter().map(String::as_str));
        let output = self.govc_ok(&args).await?;
        parse_vm_info(&output.stdout)
    }

    async fn list_templates(&self, dir: &DatastorePath) -> Result<Vec<String>> {
        let mut args = vec!["datastore.ls", "-ds", dir.datastore.as_str()];
        if !dir.path.is_empty() {
            args.push(dir.path.as_str());
        }
        let output = self.govc_ok(&args).await?;
        Ok(stdout_lines(&output))
    }
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

// ── vm.info JSON ──────────────────────────────────────────────────────────────
//
// govc >= 0.30 emits lowerCamelCase keys; older releases emit the Go field
// names. Both are accepted.

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct VmInfoOutput {
    #[serde(alias = "VirtualMachines", default)]
    virtual_machines: Option<Vec<GovcVm>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GovcVm {
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Guest", default)]
    guest: Option<GovcGuest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GovcGuest {
    #[serde(alias = "IpAddress", default)]
    ip_address: Option<String>,
}

fn parse_vm_info(stdout: &[u8]) -> Result<Vec<VmRecord>> {
    let info: VmInfoOutput =
        serde_json::from_slice(stdout).context("invalid JSON from govc vm.info")?;
    Ok(info
        .virtual_machines
        .unwrap_or_default()
        .into_iter()
        .map(|vm| VmRecord {
            name: vm.name,
            ip_address: vm.guest.and_then(|g| g.ip_address),
        })
        .collect())
}

fn stderr_reason(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let reason = stderr.trim();
    if reason.is_empty() {
        format!("exit status {}", output.status)
    } else {
        reason.trim_start_matches("govc: ").to_string()
    }
}
