//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use zonescope_core::config::{CliConfigOverrides, LayeredConfig};
use zonescope_core::FieldCatalog;
use zonescope_core::Session;
use zonescope_store::{FileCache, Freshness};

use crate::cli::Cli;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "zonescope.toml";

/// Load layered configuration: defaults, file, environment, then CLI flags
pub fn load_config(cli: &Cli) -> Result<LayeredConfig> {
    let config = match &cli.config {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults()
            .load_from_file_if_exists(DEFAULT_CONFIG_FILE)
            .context("Failed to load configuration file")?,
    };

    let mut config = config.load_from_env();
    config.update_from_cli(CliConfigOverrides {
        cache_path: cli.cache_path.clone(),
        cache_ttl_hours: cli.cache_ttl_hours,
        ..Default::default()
    });

    Ok(config)
}

/// Build the file cache described by the configuration
pub fn file_cache(config: &LayeredConfig) -> FileCache {
    FileCache::new(
        config.cache_path.value.clone(),
        Freshness::hours(config.cache_ttl_hours.value),
    )
}

/// Open an explorer session seeded from the configured cache
pub fn open_session(config: &LayeredConfig) -> Session<FileCache> {
    Session::open(file_cache(config), catalog(config))
}

fn catalog(config: &LayeredConfig) -> FieldCatalog {
    config.fields.value.clone()
}

/// Attribute table path paired with a .shp file
pub fn default_dbf_path(shp: &Path) -> PathBuf {
    shp.with_extension("dbf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_dbf_path() {
        assert_eq!(
            default_dbf_path(Path::new("data/zones.shp")),
            PathBuf::from("data/zones.dbf")
        );
    }
}
