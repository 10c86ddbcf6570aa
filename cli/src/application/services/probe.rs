//! One-shot SSH reachability probe.
//!
//! Every call opens at most one socket and always drops it before returning.
//! The probe does not retry; callers call it again on `NotReady`.

use std::io;

use anyhow::{Context, Result};

use crate::application::ports::{BannerStream, Sleeper, TcpDialer};
use crate::domain::{ProbeAttempt, ProbeSettings};

/// How a transport error affects the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Failure {
    /// Nobody listening or no route yet. Pace the next attempt.
    Backoff,
    /// Retry straight away.
    Retry,
    /// Not a network condition the probe knows about.
    Fatal,
}

fn classify(err: &io::Error) -> Failure {
    match err.kind() {
        io::ErrorKind::ConnectionRefused
        | io::ErrorKind::HostUnreachable
        | io::ErrorKind::NetworkUnreachable => Failure::Backoff,
        io::ErrorKind::TimedOut | io::ErrorKind::PermissionDenied => Failure::Retry,
        _ => Failure::Fatal,
    }
}

/// Probes sshd on a guest by waiting for its banner.
pub struct SshProbe<D, S> {
    dialer: D,
    sleeper: S,
    settings: ProbeSettings,
}

impl<D: TcpDialer, S: Sleeper> SshProbe<D, S> {
    pub fn new(dialer: D, sleeper: S, settings: ProbeSettings) -> Self {
        Self {
            dialer,
            sleeper,
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ProbeSettings {
        &self.settings
    }

    /// Probe `host` once.
    ///
    /// `on_connected` receives the banner and runs exactly once, only when
    /// the result is `Connected`.
    ///
    /// # Errors
    ///
    /// Returns an error only for transport failures other than refused,
    /// unreachable, timed out or permission denied.
    pub async fn probe(&self, host: &str, on_connected: impl FnOnce(&str)) -> Result<ProbeAttempt> {
        let port = self.settings.port;

        if let Some(gateway) = &self.settings.gateway {
            tracing::debug!(%gateway, "cannot test sshd through a gateway");
            self.sleeper.sleep(self.settings.gateway_delay).await;
            return Ok(ProbeAttempt::GatewaySkipped);
        }

        match self.read_banner(host).await {
            Ok(Some(banner)) => {
                let banner = banner.trim_end();
                tracing::debug!("sshd accepting connections on {host}, banner is {banner}");
                on_connected(banner);
                Ok(ProbeAttempt::Connected)
            }
            Ok(None) => {
                tracing::debug!(
                    "no banner from {host}:{port} within {}s",
                    self.settings.connect_timeout.as_secs()
                );
                Ok(ProbeAttempt::NotReady)
            }
            Err(e) => match classify(&e) {
                Failure::Backoff => {
                    tracing::debug!("{host}:{port} not reachable yet: {e}");
                    self.sleeper.sleep(self.settings.refused_backoff).await;
                    Ok(ProbeAttempt::NotReady)
                }
                Failure::Retry => {
                    tracing::debug!("{host}:{port}: {e}");
                    Ok(ProbeAttempt::NotReady)
                }
                Failure::Fatal => {
                    Err(e).with_context(|| format!("probing sshd on {host}:{port}"))
                }
            },
        }
    }

    /// The socket lives only inside this call.
    async fn read_banner(&self, host: &str) -> io::Result<Option<String>> {
        let timeout = self.settings.connect_timeout;
        let mut stream = self.dialer.dial(host, self.settings.port, timeout).await?;
        stream.read_banner(timeout).await
    }
}
