//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution with guaranteed timeout and kill on all platforms.

use std::process::{Output, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use crate::application::ports::CommandRunner;

/// Default timeout for `govc` calls against the ESX host.
pub const DEFAULT_CMD_TIMEOUT: Duration = Duration::from_secs(60);

/// Production `CommandRunner`: uses tokio for async process execution
/// with guaranteed timeout and kill on all platforms.
///
/// `tokio::time::timeout` around `.output().await` does not kill the child
/// on Windows, so the timeout branch calls `child.kill()` explicitly.
#[derive(Debug, Clone, Copy)]
pub struct TokioCommandRunner {
    timeout: Duration,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for TokioCommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_CMD_TIMEOUT)
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str], envs: &[(&str, &str)]) -> Result<Output> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn {program}"))?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        tokio::select! {
            result = async {
                let (status, stdout, stderr) = tokio::join!(
                    child.wait(),
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stdout_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                    async {
                        let mut buf = Vec::new();
                        if let Some(ref mut h) = stderr_handle {
                            let _ = h.read_to_end(&mut buf).await;
                        }
                        buf
                    },
                );
                Ok(Output {
                    status: status.with_context(|| format!("waiting for {program}"))?,
                    stdout,
                    stderr,
                })
            } => result,
            () = tokio::time::sleep(self.timeout) => {
                let _ = child.kill().await;
                anyhow::bail!("{program} timed out after {}s", self.timeout.as_secs())
            }
        }
    }
}
