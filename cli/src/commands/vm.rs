//! `esx vm`: list VMs and wait for a VM to become reachable over SSH.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Subcommand};
use owo_colors::OwoColorize as _;

use crate::app::AppContext;
use crate::application::ports::{HypervisorConnector, Sleeper, TcpDialer};
use crate::application::services::inventory::{self, ConnectionLookup};
use crate::application::services::probe::SshProbe;
use crate::application::services::readiness::ReadinessPoller;
use crate::domain::vm::SSH_PORT;
use crate::domain::{PollOutcome, ProbeSettings, ReadinessPolicy, VmError};
use crate::infra::network::{TokioDialer, TokioSleeper};
use crate::output::{TerminalReporter, progress};

/// VM subcommands.
#[derive(Subcommand)]
pub enum VmCommand {
    /// List virtual machines and their IP addresses
    List,
    /// Wait until a VM reports an IP address and sshd accepts connections
    Wait(WaitArgs),
}

/// Arguments for `esx vm wait`.
#[derive(Args)]
pub struct WaitArgs {
    /// Name of the virtual machine
    pub name: String,

    /// SSH port to probe on the guest
    #[arg(long, default_value_t = SSH_PORT)]
    pub ssh_port: u16,
}

/// Run the vm command.
///
/// # Errors
///
/// Returns an error if the connection or an inventory query fails.
pub async fn run<C: HypervisorConnector>(
    app: &mut AppContext<C>,
    cmd: VmCommand,
) -> Result<ExitCode> {
    match cmd {
        VmCommand::List => list(app).await,
        VmCommand::Wait(args) => {
            wait_with(app, &args, TokioDialer, TokioSleeper, ReadinessPolicy::default()).await
        }
    }
}

async fn list<C: HypervisorConnector>(app: &mut AppContext<C>) -> Result<ExitCode> {
    let reporter = TerminalReporter::new(&app.output);
    let conn = app.session.ensure_connected(&reporter).await?;

    let pb = progress::maybe_spinner(app.output.show_progress(), "Querying inventory...");
    let vms = inventory::list_vms(conn).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let vms = vms?;

    if vms.is_empty() {
        app.output.info("No virtual machines found.");
        return Ok(ExitCode::SUCCESS);
    }
    println!();
    let header = app.output.styles.header;
    println!("  {:<32} {}", "NAME".style(header), "IP ADDRESS".style(header));
    for vm in &vms {
        println!("  {:<32} {}", vm.name, vm.address().unwrap_or("-"));
    }
    Ok(ExitCode::SUCCESS)
}

/// `esx vm wait` with injectable network and timer implementations.
///
/// # Errors
///
/// Returns an error if the VM does not exist, the connection fails, or sshd
/// probing hits an unexpected transport error.
pub async fn wait_with<C, D, S>(
    app: &mut AppContext<C>,
    args: &WaitArgs,
    dialer: D,
    sleeper: S,
    policy: ReadinessPolicy,
) -> Result<ExitCode>
where
    C: HypervisorConnector,
    D: TcpDialer,
    S: Sleeper,
{
    let reporter = TerminalReporter::new(&app.output);
    let conn = app.session.ensure_connected(&reporter).await?;
    let lookup = ConnectionLookup::new(conn);

    if inventory::find_vm(conn, &args.name).await?.is_none() {
        return Err(VmError::NotFound(args.name.clone()).into());
    }

    let settings = ProbeSettings {
        port: args.ssh_port,
        gateway: app.config.ssh_gateway.clone(),
        ..ProbeSettings::default()
    };
    let probe = SshProbe::new(dialer, &sleeper, settings);
    let poller = ReadinessPoller::new(&sleeper, &reporter, policy);

    let outcome = poller.wait_for_ready(&args.name, &lookup, &probe).await?;
    drop(reporter);

    match outcome {
        PollOutcome::Ready(address) => {
            app.output.success(&format!(
                "{} is ready at {}",
                args.name,
                address.style(app.output.styles.highlight)
            ));
            Ok(ExitCode::SUCCESS)
        }
        PollOutcome::ProbeFailed(address) => {
            app.output.warn(&format!(
                "sshd on {address} was not verified; assuming {} is ready",
                args.name
            ));
            Ok(ExitCode::SUCCESS)
        }
        PollOutcome::TimedOut => {
            app.output
                .error("Timeout trying to reach the VM. Does it have vmware-tools installed?");
            Ok(ExitCode::FAILURE)
        }
    }
}
