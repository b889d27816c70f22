use crate::error::{Result, ZonescopeError};
use crate::models::FieldCatalog;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the feature cache, relative to the working directory
pub const DEFAULT_CACHE_PATH: &str = ".zonescope/cache.geojson";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for Zonescope
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub page_size: ConfigValue<usize>,
    pub top_n: ConfigValue<usize>,
    pub cache_ttl_hours: ConfigValue<u64>,
    pub cache_path: ConfigValue<PathBuf>,
    pub fields: ConfigValue<FieldCatalog>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            page_size: ConfigValue::new(25, ConfigSource::Default),
            top_n: ConfigValue::new(10, ConfigSource::Default),
            cache_ttl_hours: ConfigValue::new(24, ConfigSource::Default),
            cache_path: ConfigValue::new(PathBuf::from(DEFAULT_CACHE_PATH), ConfigSource::Default),
            fields: ConfigValue::new(FieldCatalog::default(), ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ZonescopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| ZonescopeError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(page_size) = file_config.page_size {
            self.page_size.update(validate_positive("page_size", page_size)?, ConfigSource::File);
        }

        if let Some(top_n) = file_config.top_n {
            self.top_n.update(validate_positive("top_n", top_n)?, ConfigSource::File);
        }

        if let Some(ttl) = file_config.cache_ttl_hours {
            self.cache_ttl_hours.update(ttl, ConfigSource::File);
        }

        if let Some(cache_path) = file_config.cache_path {
            self.cache_path.update(cache_path, ConfigSource::File);
        }

        if let Some(fields) = file_config.fields {
            if fields.zip_aliases.is_empty() {
                return Err(ZonescopeError::ConfigMissing {
                    key: "fields.zip_aliases".to_string(),
                });
            }
            self.fields.update(fields, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from a TOML file if it exists
    pub fn load_from_file_if_exists<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        if path.as_ref().exists() {
            self.load_from_file(path)
        } else {
            Ok(self)
        }
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // ZONESCOPE_PAGE_SIZE
        if let Ok(value) = env::var("ZONESCOPE_PAGE_SIZE") {
            match parse_positive("page_size", &value) {
                Ok(page_size) => self.page_size.update(page_size, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ZONESCOPE_PAGE_SIZE value '{}': expected a positive integer",
                    value
                ),
            }
        }

        // ZONESCOPE_TOP_N
        if let Ok(value) = env::var("ZONESCOPE_TOP_N") {
            match parse_positive("top_n", &value) {
                Ok(top_n) => self.top_n.update(top_n, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ZONESCOPE_TOP_N value '{}': expected a positive integer",
                    value
                ),
            }
        }

        // ZONESCOPE_CACHE_TTL_HOURS
        if let Ok(value) = env::var("ZONESCOPE_CACHE_TTL_HOURS") {
            match value.trim().parse::<u64>() {
                Ok(ttl) => self.cache_ttl_hours.update(ttl, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ZONESCOPE_CACHE_TTL_HOURS value '{}': expected whole hours",
                    value
                ),
            }
        }

        // ZONESCOPE_CACHE_PATH
        if let Ok(value) = env::var("ZONESCOPE_CACHE_PATH") {
            if !value.trim().is_empty() {
                self.cache_path.update(PathBuf::from(value), ConfigSource::Environment);
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(page_size) = overrides.page_size {
            self.page_size.update(page_size, ConfigSource::Cli);
        }

        if let Some(top_n) = overrides.top_n {
            self.top_n.update(top_n, ConfigSource::Cli);
        }

        if let Some(ttl) = overrides.cache_ttl_hours {
            self.cache_ttl_hours.update(ttl, ConfigSource::Cli);
        }

        if let Some(cache_path) = overrides.cache_path {
            self.cache_path.update(cache_path, ConfigSource::Cli);
        }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "page_size".to_string(),
            (self.page_size.value.to_string(), self.page_size.source),
        );

        map.insert("top_n".to_string(), (self.top_n.value.to_string(), self.top_n.source));

        map.insert(
            "cache_ttl_hours".to_string(),
            (self.cache_ttl_hours.value.to_string(), self.cache_ttl_hours.source),
        );

        map.insert(
            "cache_path".to_string(),
            (self.cache_path.value.display().to_string(), self.cache_path.source),
        );

        map.insert(
            "fields.zip_aliases".to_string(),
            (self.fields.value.zip_aliases.join(", "), self.fields.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    page_size: Option<usize>,
    top_n: Option<usize>,
    cache_ttl_hours: Option<u64>,
    cache_path: Option<PathBuf>,
    fields: Option<FieldCatalog>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub page_size: Option<usize>,
    pub top_n: Option<usize>,
    pub cache_ttl_hours: Option<u64>,
    pub cache_path: Option<PathBuf>,
}

fn validate_positive(key: &str, value: usize) -> Result<usize> {
    if value == 0 {
        return Err(ZonescopeError::ConfigInvalid {
            key: key.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

/// Parse a strictly positive integer setting
pub fn parse_positive(key: &str, s: &str) -> Result<usize> {
    let value = s.trim().parse::<usize>().map_err(|_| ZonescopeError::ConfigInvalid {
        key: key.to_string(),
        reason: format!("Invalid number: {}", s),
    })?;
    validate_positive(key, value)
}
