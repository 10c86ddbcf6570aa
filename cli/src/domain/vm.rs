//! VM records, readiness outcomes and polling policy.
//!
//! Pure data only. The loops that use these types live in
//! `crate::application::services::readiness` and `::probe`.

use std::time::Duration;

use anyhow::Result;

use crate::domain::error::VmError;

/// Default SSH port probed once a VM reports an address.
pub const SSH_PORT: u16 = 22;

/// Snapshot of a VM as currently reported by the hypervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmRecord {
    pub name: String,
    /// Populated by the guest tools once the guest has network; empty before.
    pub ip_address: Option<String>,
}

impl VmRecord {
    /// The assigned address, or `None` while it is absent or blank.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.ip_address
            .as_deref()
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
    }
}

/// Terminal result of one readiness poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Address acquired and sshd sent its banner.
    Ready(String),
    /// No address within the retry budget.
    TimedOut,
    /// Address acquired but sshd could not be probed (gateway routing).
    /// Callers assume readiness after the fixed delay.
    ProbeFailed(String),
}

/// Result of a single probe call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeAttempt {
    Connected,
    NotReady,
    GatewaySkipped,
}

/// Retry budget and pacing of the address phase.
#[derive(Debug, Clone)]
pub struct ReadinessPolicy {
    pub lookup_retries: u32,
    pub lookup_interval: Duration,
    /// Pause after sshd first answers, before the VM is reported ready.
    pub settle_delay: Duration,
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            lookup_retries: 100,
            lookup_interval: Duration::from_secs(1),
            settle_delay: Duration::from_secs(10),
        }
    }
}

/// Per-call settings of the SSH reachability probe.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub port: u16,
    pub connect_timeout: Duration,
    pub refused_backoff: Duration,
    pub gateway_delay: Duration,
    pub gateway: Option<String>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            port: SSH_PORT,
            connect_timeout: Duration::from_secs(5),
            refused_backoff: Duration::from_secs(2),
            gateway_delay: Duration::from_secs(10),
            gateway: None,
        }
    }
}

// ── Datastore paths ──────────────────────────────────────────────────────────

/// A directory on an ESX datastore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastorePath {
    pub datastore: String,
    /// Path relative to the datastore root, without leading slash.
    pub path: String,
}

impl DatastorePath {
    /// Parse `/vmfs/volumes/<datastore>/<path>` or `[<datastore>] <path>`.
    ///
    /// # Errors
    ///
    /// Returns `VmError::InvalidTemplatesDir` for any other shape.
    pub fn parse(dir: &str) -> Result<Self> {
        let invalid = || VmError::InvalidTemplatesDir(dir.to_string());
        let dir = dir.trim();

        let (datastore, path) = if let Some(rest) = dir.strip_prefix("/vmfs/volumes/") {
            rest.split_once('/').unwrap_or((rest, ""))
        } else if let Some(rest) = dir.strip_prefix('[') {
            let (ds, path) = rest.split_once(']').ok_or_else(invalid)?;
            (ds, path.trim_start())
        } else {
            return Err(invalid().into());
        };

        if datastore.trim().is_empty() {
            return Err(invalid().into());
        }
        Ok(Self {
            datastore: datastore.trim().to_string(),
            path: path.trim_matches('/').to_string(),
        })
    }
}
