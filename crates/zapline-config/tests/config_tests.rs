// SPDX-FileCopyrightText: 2026 Zapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Zapline configuration system.

use zapline_config::model::ZaplineConfig;
use zapline_config::load_config_from_str;

/// Compiled defaults match the platform policy caps.
#[test]
fn defaults_match_platform_policy() {
    let config = ZaplineConfig::default();
    assert_eq!(config.window.window_hours, 24);
    assert_eq!(config.window.reachable_scan_cap, 20_000);
    assert_eq!(config.campaign.list_cap, 300);
    assert_eq!(config.campaign.error_log_cap, 200);
    assert_eq!(config.campaign.error_truncate_chars, 500);
    assert_eq!(config.campaign.retention_days, 45);
    assert_eq!(config.campaign.list_page_cap, 200);
    assert_eq!(config.campaign.reprocess_cap, 20_000);
}

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_zapline_config() {
    let toml = r#"
[window]
window_hours = 48
reachable_scan_cap = 500

[campaign]
list_cap = 50
error_log_cap = 10
error_truncate_chars = 120
retention_days = 7
list_page_cap = 25
reprocess_cap = 1000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.window.window_hours, 48);
    assert_eq!(config.window.reachable_scan_cap, 500);
    assert_eq!(config.campaign.list_cap, 50);
    assert_eq!(config.campaign.error_log_cap, 10);
    assert_eq!(config.campaign.error_truncate_chars, 120);
    assert_eq!(config.campaign.retention_days, 7);
    assert_eq!(config.campaign.list_page_cap, 25);
    assert_eq!(config.campaign.reprocess_cap, 1000);
}

/// Partial TOML keeps defaults for everything not mentioned.
#[test]
fn partial_toml_keeps_defaults() {
    let toml = r#"
[campaign]
error_log_cap = 5
"#;

    let config = load_config_from_str(toml).expect("partial TOML should deserialize");
    assert_eq!(config.campaign.error_log_cap, 5);
    assert_eq!(config.campaign.list_cap, 300);
    assert_eq!(config.window.window_hours, 24);
}

/// Unknown field in a section is rejected by deny_unknown_fields.
#[test]
fn unknown_field_produces_error() {
    let toml = r#"
[window]
window_hourss = 12
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("window_hourss"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Environment variables override file values.
#[test]
fn env_var_overrides_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "zapline.toml",
            r#"
[window]
window_hours = 24
"#,
        )?;
        jail.set_env("ZAPLINE_WINDOW_WINDOW_HOURS", "12");

        let config = zapline_config::load_config_from_path(std::path::Path::new("zapline.toml"))
            .expect("config should load");
        assert_eq!(config.window.window_hours, 12);
        Ok(())
    });
}
