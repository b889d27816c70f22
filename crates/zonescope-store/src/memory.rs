//! In-memory feature cache.
//!
//! Holds a single entry; useful for tests and for hosts that keep the session
//! alive themselves.

use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use zonescope_core::error::{Result, ZonescopeError};
use zonescope_core::models::Feature;
use zonescope_core::ports::FeatureCache;

use crate::freshness::Freshness;

#[derive(Debug, Clone)]
struct Entry {
    saved_at: DateTime<Utc>,
    features: Vec<Feature>,
}

/// In-memory implementation of FeatureCache
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entry: Arc<RwLock<Option<Entry>>>,
    freshness: Freshness,
}

impl MemoryCache {
    /// Create a new in-memory cache with the default freshness window
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_freshness(freshness: Freshness) -> Self {
        Self {
            entry: Arc::default(),
            freshness,
        }
    }

    fn load_at(&self, now: DateTime<Utc>) -> Result<Option<Vec<Feature>>> {
        let mut entry = self.entry.write().map_err(poisoned)?;

        match entry.as_ref() {
            Some(cached) if self.freshness.is_fresh(cached.saved_at, now) => {
                Ok(Some(cached.features.clone()))
            }
            Some(_) => {
                tracing::debug!("In-memory cache entry expired");
                *entry = None;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    #[cfg(test)]
    fn backdate(&self, saved_at: DateTime<Utc>) {
        if let Some(entry) = self.entry.write().unwrap().as_mut() {
            entry.saved_at = saved_at;
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> ZonescopeError {
    ZonescopeError::CacheUnavailable {
        reason: "cache lock poisoned".to_string(),
    }
}

impl FeatureCache for MemoryCache {
    fn save(&self, features: &[Feature]) -> Result<()> {
        let mut entry = self.entry.write().map_err(poisoned)?;
        *entry = Some(Entry {
            saved_at: Utc::now(),
            features: features.to_vec(),
        });
        Ok(())
    }

    fn load(&self) -> Result<Option<Vec<Feature>>> {
        self.load_at(Utc::now())
    }

    fn clear(&self) -> Result<()> {
        *self.entry.write().map_err(poisoned)? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn features() -> Vec<Feature> {
        vec![Feature::from_pairs([("Zip", "75001")])]
    }

    #[test]
    fn test_empty_cache_loads_none() {
        assert!(MemoryCache::new().load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_clear() {
        let cache = MemoryCache::new();
        cache.save(&features()).unwrap();
        assert_eq!(cache.load().unwrap(), Some(features()));

        cache.clear().unwrap();
        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let cache = MemoryCache::with_freshness(Freshness::hours(1));
        cache.save(&features()).unwrap();
        cache.backdate(Utc::now() - Duration::hours(2));

        assert!(cache.load().unwrap().is_none());
        // the expired entry is gone even for a later, lenient read
        assert!(cache.load_at(Utc::now() - Duration::hours(2)).unwrap().is_none());
    }

    #[test]
    fn test_clones_share_the_entry() {
        let cache = MemoryCache::new();
        let other = cache.clone();
        cache.save(&features()).unwrap();
        assert!(other.load().unwrap().is_some());
    }
}
