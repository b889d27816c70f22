//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use zonescope_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};

fn clear_env() {
    env::remove_var("ZONESCOPE_PAGE_SIZE");
    env::remove_var("ZONESCOPE_TOP_N");
    env::remove_var("ZONESCOPE_CACHE_TTL_HOURS");
    env::remove_var("ZONESCOPE_CACHE_PATH");
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("ZONESCOPE_PAGE_SIZE", "40");
    env::set_var("ZONESCOPE_CACHE_PATH", "/tmp/env-cache.geojson");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
page_size = 10
top_n = 3
cache_path = "/tmp/file-cache.geojson"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.page_size.value, 40);
    assert_eq!(config.page_size.source, ConfigSource::Environment);
    assert_eq!(config.cache_path.value, PathBuf::from("/tmp/env-cache.geojson"));
    // Not set in the environment, so the file value stands
    assert_eq!(config.top_n.value, 3);
    assert_eq!(config.top_n.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("ZONESCOPE_PAGE_SIZE", "0");
    env::set_var("ZONESCOPE_TOP_N", "many");
    env::set_var("ZONESCOPE_CACHE_TTL_HOURS", "-1");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.page_size.value, 25);
    assert_eq!(config.page_size.source, ConfigSource::Default);
    assert_eq!(config.top_n.source, ConfigSource::Default);
    assert_eq!(config.cache_ttl_hours.value, 24);

    clear_env();
}

#[test]
#[serial]
fn test_configuration_precedence_order() {
    clear_env();
    env::set_var("ZONESCOPE_TOP_N", "7");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "top_n = 4").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.top_n.value, 7);
    assert_eq!(config.top_n.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        top_n: Some(2),
        ..Default::default()
    });

    assert_eq!(config.top_n.value, 2);
    assert_eq!(config.top_n.source, ConfigSource::Cli);

    assert!(ConfigSource::Cli.precedence() > ConfigSource::Environment.precedence());
    assert!(ConfigSource::Environment.precedence() > ConfigSource::File.precedence());
    assert!(ConfigSource::File.precedence() > ConfigSource::Default.precedence());

    clear_env();
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "page_size = \"lots\"").unwrap();

    assert!(LayeredConfig::with_defaults().load_from_file(file.path()).is_err());
}
