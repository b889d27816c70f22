//! File-backed feature cache.
//!
//! The collection is stored as a GeoJSON FeatureCollection with a `savedAt`
//! timestamp foreign member. Expired and unreadable entries are removed on
//! load.

use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use zonescope_core::error::{Result, ZonescopeError};
use zonescope_core::formats::geojson::{parse_features, write_features};
use zonescope_core::models::Feature;
use zonescope_core::ports::FeatureCache;

use crate::freshness::Freshness;

const SAVED_AT: &str = "savedAt";

/// GeoJSON file implementation of FeatureCache
#[derive(Debug, Clone)]
pub struct FileCache {
    path: PathBuf,
    freshness: Freshness,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>, freshness: Freshness) -> Self {
        Self {
            path: path.into(),
            freshness,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the stored entry, if there is a readable one
    pub fn saved_at(&self) -> Result<Option<DateTime<Utc>>> {
        match self.read_entry()? {
            Some((saved_at, _)) => Ok(Some(saved_at)),
            None => Ok(None),
        }
    }

    fn read_entry(&self) -> Result<Option<(DateTime<Utc>, Vec<Feature>)>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(ZonescopeError::CacheUnavailable {
                    reason: format!("Failed to read {}: {}", self.path.display(), e),
                })
            }
        };

        let (features, foreign_members) =
            parse_features(&content).map_err(|e| ZonescopeError::CacheCorrupt {
                reason: e.to_string(),
            })?;

        let saved_at = foreign_members
            .as_ref()
            .and_then(|members| members.get(SAVED_AT))
            .and_then(|value| value.as_str())
            .and_then(|text| DateTime::parse_from_rfc3339(text).ok())
            .map(|timestamp| timestamp.with_timezone(&Utc))
            .ok_or_else(|| ZonescopeError::CacheCorrupt {
                reason: format!("missing or invalid {} timestamp", SAVED_AT),
            })?;

        Ok(Some((saved_at, features)))
    }

    fn load_at(&self, now: DateTime<Utc>) -> Result<Option<Vec<Feature>>> {
        let entry = match self.read_entry() {
            Ok(entry) => entry,
            Err(e @ ZonescopeError::CacheCorrupt { .. }) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Removing corrupt cache entry"
                );
                self.clear()?;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        match entry {
            Some((saved_at, features)) if self.freshness.is_fresh(saved_at, now) => {
                tracing::debug!(
                    path = %self.path.display(),
                    features = features.len(),
                    "Cache hit"
                );
                Ok(Some(features))
            }
            Some((saved_at, _)) => {
                tracing::info!(path = %self.path.display(), %saved_at, "Cache entry expired");
                self.clear()?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn save_at(&self, features: &[Feature], now: DateTime<Utc>) -> Result<()> {
        let mut members = serde_json::Map::new();
        members.insert(SAVED_AT.to_string(), serde_json::Value::String(now.to_rfc3339()));
        let content = write_features(features, Some(members))?;

        let unavailable = |e: std::io::Error| ZonescopeError::CacheUnavailable {
            reason: format!("Failed to write {}: {}", self.path.display(), e),
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(unavailable)?;
        }

        // write then rename so a crash never leaves a half-written entry
        let staging = self.path.with_extension("geojson.tmp");
        fs::write(&staging, content).map_err(unavailable)?;
        fs::rename(&staging, &self.path).map_err(unavailable)?;

        tracing::debug!(
            path = %self.path.display(),
            features = features.len(),
            "Saved cache entry"
        );
        Ok(())
    }
}

impl FeatureCache for FileCache {
    fn save(&self, features: &[Feature]) -> Result<()> {
        self.save_at(features, Utc::now())
    }

    fn load(&self) -> Result<Option<Vec<Feature>>> {
        self.load_at(Utc::now())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ZonescopeError::CacheUnavailable {
                reason: format!("Failed to remove {}: {}", self.path.display(), e),
            }),
        }
    }
}
