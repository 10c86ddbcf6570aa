//! Property tests for merging command-line overrides over the config file.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use esx_cli::domain::config::{DEFAULT_ESX_HOST, DEFAULT_ESX_USERNAME};
use esx_cli::domain::{ConfigOverrides, EsxConfig, FileConfig};
use proptest::option;
use proptest::prelude::*;

fn value() -> impl Strategy<Value = String> {
    "[a-z0-9][a-z0-9.-]{0,15}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Flag beats file, file beats default, for every string key.
    #[test]
    fn prop_flag_then_file_then_default(
        flag_host in option::of(value()),
        file_host in option::of(value()),
        flag_user in option::of(value()),
        file_user in option::of(value()),
        flag_dir in option::of(value()),
        file_dir in option::of(value()),
    ) {
        let file = FileConfig {
            esx_host: file_host.clone(),
            esx_username: file_user.clone(),
            esx_templates_dir: file_dir.clone(),
            ..FileConfig::default()
        };
        let overrides = ConfigOverrides {
            esx_host: flag_host.clone(),
            esx_username: flag_user.clone(),
            esx_templates_dir: flag_dir.clone(),
            ..ConfigOverrides::default()
        };

        let cfg = EsxConfig::resolve(&file, &overrides);

        let expected_host = flag_host.or(file_host).unwrap_or_else(|| DEFAULT_ESX_HOST.to_string());
        let expected_user = flag_user.or(file_user).unwrap_or_else(|| DEFAULT_ESX_USERNAME.to_string());
        let expected_dir = flag_dir.or(file_dir).unwrap_or_default();
        prop_assert_eq!(cfg.host, expected_host);
        prop_assert_eq!(cfg.username, expected_user);
        prop_assert_eq!(cfg.templates_dir, expected_dir);
    }

    /// Boolean flags follow the same precedence; `insecure` defaults to true.
    #[test]
    fn prop_boolean_precedence(
        flag_insecure in option::of(any::<bool>()),
        file_insecure in option::of(any::<bool>()),
        flag_free in option::of(any::<bool>()),
        file_free in option::of(any::<bool>()),
    ) {
        let file = FileConfig {
            insecure: file_insecure,
            free_license: file_free,
            ..FileConfig::default()
        };
        let overrides = ConfigOverrides {
            insecure: flag_insecure,
            free_license: flag_free,
            ..ConfigOverrides::default()
        };

        let cfg = EsxConfig::resolve(&file, &overrides);

        prop_assert_eq!(cfg.insecure, flag_insecure.or(file_insecure).unwrap_or(true));
        prop_assert_eq!(cfg.free_license, flag_free.or(file_free).unwrap_or(false));
    }

    /// Resolving never alters the file it read from.
    #[test]
    fn prop_resolve_leaves_file_untouched(host in option::of(value()), flag in option::of(value())) {
        let file = FileConfig { esx_host: host, ..FileConfig::default() };
        let before = file.clone();
        let _ = EsxConfig::resolve(&file, &ConfigOverrides { esx_host: flag, ..ConfigOverrides::default() });
        prop_assert_eq!(file, before);
    }
}

#[test]
fn test_empty_gateway_means_no_gateway() {
    let file = FileConfig {
        ssh_gateway: Some("bastion.lab".to_string()),
        ..FileConfig::default()
    };
    let overrides = ConfigOverrides {
        ssh_gateway: Some(String::new()),
        ..ConfigOverrides::default()
    };
    assert_eq!(EsxConfig::resolve(&file, &overrides).ssh_gateway, None);
    assert_eq!(
        EsxConfig::resolve(&file, &ConfigOverrides::default())
            .ssh_gateway
            .as_deref(),
        Some("bastion.lab")
    );
}
