//! `ReadinessPoller` tests: address phase budget, sshd phase pacing and the
//! gateway path.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::atomic::AtomicUsize;
use std::time::Duration;

use esx_cli::application::services::probe::SshProbe;
use esx_cli::application::services::readiness::ReadinessPoller;
use esx_cli::domain::{PollOutcome, ProbeAttempt, ProbeSettings, ReadinessPolicy};

use crate::mocks::{
    Dial, MissingVm, RecordingReporter, RecordingSleeper, ScriptedDialer, ScriptedLookup,
};

const SECOND: Duration = Duration::from_secs(1);
const SETTLE: Duration = Duration::from_secs(10);

fn probe<'a>(
    dialer: &'a ScriptedDialer,
    sleeper: &'a RecordingSleeper,
    gateway: Option<&str>,
) -> SshProbe<&'a ScriptedDialer, &'a RecordingSleeper> {
    let settings = ProbeSettings {
        gateway: gateway.map(String::from),
        ..ProbeSettings::default()
    };
    SshProbe::new(dialer, sleeper, settings)
}

#[tokio::test]
async fn test_no_address_exhausts_exactly_one_hundred_lookups() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(Vec::new());
    let lookup = ScriptedLookup::never();

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let outcome = poller
        .wait_for_ready("web01", &lookup, &probe(&dialer, &sleeper, None))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::TimedOut);
    assert_eq!(lookup.calls(), 100);
    assert_eq!(sleeper.count_of(SECOND), 99);
    assert_eq!(dialer.dials(), 0, "probe must not start without an address");
}

#[tokio::test]
async fn test_custom_budget_is_respected() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let lookup = ScriptedLookup::never();
    let policy = ReadinessPolicy {
        lookup_retries: 3,
        ..ReadinessPolicy::default()
    };

    let poller = ReadinessPoller::new(&sleeper, &reporter, policy);
    let address = poller.wait_for_address("web01", &lookup).await.unwrap();

    assert_eq!(address, None);
    assert_eq!(lookup.calls(), 3);
}

#[tokio::test]
async fn test_blank_address_counts_as_absent() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let lookup = ScriptedLookup::new(&[Some(""), Some("  ")], Some("10.0.0.7"));

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let address = poller.wait_for_address("web01", &lookup).await.unwrap();

    assert_eq!(address.as_deref(), Some("10.0.0.7"));
    assert_eq!(lookup.calls(), 3);
    assert_eq!(sleeper.recorded(), [SECOND, SECOND]);
}

#[tokio::test]
async fn test_missing_vm_counts_as_no_address() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let lookup = MissingVm {
        calls: AtomicUsize::new(0),
    };
    let policy = ReadinessPolicy {
        lookup_retries: 5,
        ..ReadinessPolicy::default()
    };

    let poller = ReadinessPoller::new(&sleeper, &reporter, policy);
    assert_eq!(poller.wait_for_address("ghost", &lookup).await.unwrap(), None);
    assert_eq!(lookup.calls.load(std::sync::atomic::Ordering::SeqCst), 5);
}

#[tokio::test]
async fn test_address_on_first_lookup_probes_immediately() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(vec![Dial::Banner("SSH-2.0-OpenSSH_9.6\r\n")]);
    let lookup = ScriptedLookup::new(&[Some("10.0.0.5")], None);

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let outcome = poller
        .wait_for_ready("web01", &lookup, &probe(&dialer, &sleeper, None))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Ready("10.0.0.5".to_string()));
    assert_eq!(lookup.calls(), 1);
    assert_eq!(dialer.dials(), 1);
    assert_eq!(dialer.targets()[0].0, "10.0.0.5");
    assert_eq!(dialer.targets()[0].1, 22);
    // Only the settle delay, no lookup interval.
    assert_eq!(sleeper.recorded(), [SETTLE]);
    assert_eq!(
        reporter.events(),
        [
            "step: Waiting for server...",
            "success: VM IP Address: 10.0.0.5",
            "step: Waiting for sshd...",
            "success: sshd is accepting connections",
        ]
    );
}

#[tokio::test]
async fn test_sshd_phase_retries_until_banner() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(vec![
        Dial::Fail(std::io::ErrorKind::ConnectionRefused),
        Dial::Silent,
        Dial::Fail(std::io::ErrorKind::TimedOut),
        Dial::Banner("SSH-2.0-dropbear\n"),
    ]);
    let lookup = ScriptedLookup::new(&[Some("10.0.0.5")], None);

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let outcome = poller
        .wait_for_ready("web01", &lookup, &probe(&dialer, &sleeper, None))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::Ready("10.0.0.5".to_string()));
    assert_eq!(dialer.dials(), 4);
    assert_eq!(reporter.count("tick"), 3);
    assert_eq!(reporter.count("success: sshd"), 1);
    assert_eq!(sleeper.recorded(), [Duration::from_secs(2), SETTLE]);
    assert_eq!(dialer.opened(), dialer.dropped());
}

#[tokio::test]
async fn test_fatal_probe_error_propagates() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(vec![Dial::Fail(std::io::ErrorKind::InvalidInput)]);
    let lookup = ScriptedLookup::new(&[Some("10.0.0.5")], None);

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let err = poller
        .wait_for_ready("web01", &lookup, &probe(&dialer, &sleeper, None))
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("10.0.0.5:22"), "got: {err:#}");
}

#[tokio::test]
async fn test_gateway_reports_probe_failed_after_fixed_delay() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(Vec::new());
    let lookup = ScriptedLookup::new(&[Some("10.0.0.5")], None);

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let outcome = poller
        .wait_for_ready("web01", &lookup, &probe(&dialer, &sleeper, Some("bastion.lab")))
        .await
        .unwrap();

    assert_eq!(outcome, PollOutcome::ProbeFailed("10.0.0.5".to_string()));
    assert_eq!(dialer.dials(), 0);
    assert_eq!(sleeper.recorded(), [Duration::from_secs(10)]);
    let warning = "warn: Can't test connection through gateway, sleeping 10 seconds...";
    assert!(reporter.events().iter().any(|e| e == warning));
}

#[tokio::test]
async fn test_wait_for_ssh_returns_connected() {
    let sleeper = RecordingSleeper::new();
    let reporter = RecordingReporter::new();
    let dialer = ScriptedDialer::new(vec![Dial::Banner("SSH-2.0-OpenSSH_9.6\n")]);

    let poller = ReadinessPoller::new(&sleeper, &reporter, ReadinessPolicy::default());
    let attempt = poller
        .wait_for_ssh("10.0.0.5", &probe(&dialer, &sleeper, None))
        .await
        .unwrap();

    assert_eq!(attempt, ProbeAttempt::Connected);
}
