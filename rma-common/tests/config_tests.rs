//! Config file resolution tests
//!
//! These mutate `RMA_RECON_CONFIG`, so they run serially.

use rma_common::config::{resolve_config_path, ConfigSource, CONFIG_ENV_VAR};
use rma_common::{Error, ReconConfig};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const CUSTOM: &str = r#"
[logging]
level = "debug"

[alerts]
in_transit_days_threshold = 3

[kpi]
manual_minutes_per_rma = 10.0
"#;

#[test]
#[serial]
fn test_cli_path_beats_environment() {
    std::env::set_var(CONFIG_ENV_VAR, "/from/env.toml");
    let cli = PathBuf::from("/from/cli.toml");
    assert_eq!(resolve_config_path(Some(cli.as_path())), Some(cli.clone()));
    std::env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_environment_variable_is_used() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("recon.toml");
    fs::write(&path, CUSTOM).unwrap();

    std::env::set_var(CONFIG_ENV_VAR, &path);
    let (config, source) = ReconConfig::resolve(None).unwrap();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(source, ConfigSource::File(path.clone()));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.alerts.in_transit_days_threshold, 3);
    assert_eq!(config.alerts.manifest_days_threshold, 5);
    assert_eq!(config.kpi.manual_minutes_per_rma, 10.0);
    assert_eq!(config.output.analysis_file, "rma_analysis.csv");
}

#[test]
#[serial]
fn test_missing_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");
    let (config, source) = ReconConfig::resolve(Some(missing.as_path())).unwrap();
    assert_eq!(config, ReconConfig::default());
    assert_eq!(source, ConfigSource::Missing(missing.clone()));
}

#[test]
#[serial]
fn test_missing_environment_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("typo.toml");

    std::env::set_var(CONFIG_ENV_VAR, &missing);
    let (config, source) = ReconConfig::resolve(None).unwrap();
    std::env::remove_var(CONFIG_ENV_VAR);

    assert_eq!(config, ReconConfig::default());
    assert_eq!(source, ConfigSource::Missing(missing));
}

#[test]
#[serial]
fn test_malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[alerts\nin_transit_days_threshold = ").unwrap();

    let err = ReconConfig::resolve(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, Error::TomlParse(_)));
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("negative.toml");
    fs::write(&path, "[alerts]\nmanifest_days_threshold = -1\n").unwrap();

    let err = ReconConfig::resolve(Some(path.as_path())).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}
