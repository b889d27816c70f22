//! Error types for Zonescope

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZonescopeError {
    // Source data errors
    #[error("Failed to decode {format} data: {message}")]
    Decode { format: String, message: String },

    // Cache errors
    #[error("Feature cache unavailable: {reason}")]
    CacheUnavailable { reason: String },

    #[error("Feature cache is corrupt: {reason}")]
    CacheCorrupt { reason: String },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ZonescopeError {
    /// Build a decode error for the given source format
    pub fn decode(format: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            format: format.into(),
            message: message.into(),
        }
    }

    /// Whether this error should be treated as a cache miss rather than a failure
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, Self::CacheUnavailable { .. } | Self::CacheCorrupt { .. })
    }
}

pub type Result<T> = std::result::Result<T, ZonescopeError>;
