//! Waits for a freshly created VM to get an address and answer on SSH.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;

use crate::application::ports::{ProgressReporter, Sleeper, TcpDialer, VmLookup};
use crate::application::services::probe::SshProbe;
use crate::domain::{PollOutcome, ProbeAttempt, ReadinessPolicy};

/// Drives the address phase and the sshd phase of a readiness wait.
///
/// Observation only: the VM is never modified. There is no cancellation;
/// the caller blocks until an outcome is reached.
pub struct ReadinessPoller<'a, S, R> {
    sleeper: S,
    reporter: &'a R,
    policy: ReadinessPolicy,
}

impl<'a, S: Sleeper, R: ProgressReporter> ReadinessPoller<'a, S, R> {
    pub fn new(sleeper: S, reporter: &'a R, policy: ReadinessPolicy) -> Self {
        Self {
            sleeper,
            reporter,
            policy,
        }
    }

    /// Wait for `vm_name` to become reachable over SSH.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup fails or the probe hits an
    /// unexpected transport error.
    pub async fn wait_for_ready<D: TcpDialer, T: Sleeper>(
        &self,
        vm_name: &str,
        lookup: &impl VmLookup,
        probe: &SshProbe<D, T>,
    ) -> Result<PollOutcome> {
        let Some(address) = self.wait_for_address(vm_name, lookup).await? else {
            return Ok(PollOutcome::TimedOut);
        };

        match self.wait_for_ssh(&address, probe).await? {
            ProbeAttempt::GatewaySkipped => Ok(PollOutcome::ProbeFailed(address)),
            _ => Ok(PollOutcome::Ready(address)),
        }
    }

    /// Poll the inventory until the VM reports an address.
    ///
    /// Performs at most `lookup_retries` lookups, sleeping `lookup_interval`
    /// between them. Returns `None` when the budget runs out.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails.
    pub async fn wait_for_address(
        &self,
        vm_name: &str,
        lookup: &impl VmLookup,
    ) -> Result<Option<String>> {
        self.reporter.step("Waiting for server...");
        let mut retries = self.policy.lookup_retries;

        loop {
            let record = lookup.find_vm(vm_name).await?;
            if let Some(address) = record.as_ref().and_then(|r| r.address()) {
                self.reporter.success(&format!("VM IP Address: {address}"));
                return Ok(Some(address.to_string()));
            }

            retries = retries.saturating_sub(1);
            if retries == 0 {
                tracing::warn!(vm = vm_name, "no address within the retry budget");
                return Ok(None);
            }
            self.sleeper.sleep(self.policy.lookup_interval).await;
        }
    }

    /// Probe sshd on `address` until it answers.
    ///
    /// Returns `Connected`, or `GatewaySkipped` when the probe cannot test
    /// through a gateway.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe hits an unexpected transport error.
    pub async fn wait_for_ssh<D: TcpDialer, T: Sleeper>(
        &self,
        address: &str,
        probe: &SshProbe<D, T>,
    ) -> Result<ProbeAttempt> {
        self.reporter.step("Waiting for sshd...");
        if probe.settings().gateway.is_some() {
            self.reporter.warn(&format!(
                "Can't test connection through gateway, sleeping {} seconds...",
                probe.settings().gateway_delay.as_secs()
            ));
        }

        loop {
            let reporter = self.reporter;
            let attempt = probe
                .probe(address, |_banner| reporter.success("sshd is accepting connections"))
                .await?;
            match attempt {
                ProbeAttempt::NotReady => reporter.tick(),
                ProbeAttempt::Connected => {
                    self.sleeper.sleep(self.policy.settle_delay).await;
                    return Ok(attempt);
                }
                ProbeAttempt::GatewaySkipped => return Ok(attempt),
            }
        }
    }
}
