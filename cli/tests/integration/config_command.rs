//! Integration tests for `esx config` command.
//!
//! All filesystem-touching tests set `ESX_CONFIG` to a temp path so they
//! never read or write `~/.esx/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary with the ESX_* environment cleared and the config file isolated.
fn esx(config: &str) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("esx"));
    cmd.env("NO_COLOR", "1")
        .env("ESX_CONFIG", config)
        .env_remove("ESX_HOST")
        .env_remove("ESX_USERNAME")
        .env_remove("ESX_PASSWORD")
        .env_remove("ESX_TEMPLATES_DIR");
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// `esx config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("127.0.0.1"))
        .stdout(predicate::str::contains("root"))
        .stdout(predicate::str::is_match(r"insecure\s+true").unwrap())
        .stdout(predicate::str::is_match(r"free_license\s+false").unwrap())
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (_dir, path) = temp_config_path();
    esx(&path).args(["config", "show"]).assert().success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_show_flags_override_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "esx_host: esx01.lab\nesx_username: admin\n").unwrap();

    esx(&path)
        .args(["--esx-host", "esx02.lab", "--no-insecure", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("esx02.lab"))
        .stdout(predicate::str::contains("esx01.lab").not())
        .stdout(predicate::str::contains("admin"))
        .stdout(predicate::str::is_match(r"insecure\s+false").unwrap());
}

#[test]
fn test_config_show_no_free_license_overrides_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "free_license: true\n").unwrap();

    esx(&path)
        .args(["--no-free-license", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"free_license\s+false").unwrap());
}

#[test]
fn test_config_show_env_var_overrides_file() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "esx_host: esx01.lab\n").unwrap();

    esx(&path)
        .args(["config", "show"])
        .env("ESX_HOST", "10.1.1.1")
        .assert()
        .success()
        .stdout(predicate::str::contains("10.1.1.1"));
}

#[test]
fn test_config_show_masks_password() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "esx_password: s3cret\n").unwrap();

    esx(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not())
        .stdout(predicate::str::contains("********"));
}

#[test]
fn test_config_show_ignores_unknown_keys() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "esx_host: esx01.lab\nlegacy_option: 1\n").unwrap();

    esx(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("esx01.lab"));
}

#[test]
fn test_config_show_malformed_file_fails() {
    let (_dir, path) = temp_config_path();
    std::fs::write(&path, "esx_host: [unclosed\n").unwrap();

    esx(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid YAML in"));
}

// ---------------------------------------------------------------------------
// `esx config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_then_show() {
    let (_dir, path) = temp_config_path();

    esx(&path)
        .args(["config", "set", "esx_host", "esx03.lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set esx_host = esx03.lab"));

    esx(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("esx03.lab"));
}

#[test]
fn test_config_set_preserves_other_keys() {
    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "set", "esx_username", "admin"])
        .assert()
        .success();
    esx(&path)
        .args(["config", "set", "insecure", "false"])
        .assert()
        .success();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("esx_username: admin"), "got: {content}");
    assert!(content.contains("insecure: false"), "got: {content}");
}

#[test]
fn test_config_set_password_is_not_echoed() {
    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "set", "esx_password", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());
}

#[cfg(unix)]
#[test]
fn test_config_set_writes_private_file() {
    use std::os::unix::fs::PermissionsExt;

    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "set", "esx_password", "s3cret"])
        .assert()
        .success();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "set", "datacenter", "dc1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting: datacenter"))
        .stderr(predicate::str::contains("esx_templates_dir"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_boolean_fails() {
    let (_dir, path) = temp_config_path();
    esx(&path)
        .args(["config", "set", "free_license", "yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value for free_license: yes"));
}
