//! Cache command implementation

use crate::cli::{CacheArgs, CacheCommand};
use crate::config_loader::file_cache;
use crate::output::OutputWriter;
use crate::output_types::CacheStatusOutput;
use anyhow::{Context, Result};
use chrono::Utc;
use zonescope_core::config::LayeredConfig;
use zonescope_core::FeatureCache;
use zonescope_store::Freshness;

pub fn execute(args: CacheArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    match args.command {
        CacheCommand::Status => status(config, output),
        CacheCommand::Clear => clear(config, output),
    }
}

fn status(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let cache = file_cache(config);
    let ttl_hours = config.cache_ttl_hours.value;

    let saved_at = match cache.saved_at() {
        Ok(saved_at) => saved_at,
        Err(e) if e.is_cache_miss() => {
            output.warning(format!("Cache entry unreadable: {}", e));
            None
        }
        Err(e) => return Err(e).context("Failed to inspect feature cache"),
    };
    let fresh = saved_at
        .map(|at| Freshness::hours(ttl_hours).is_fresh(at, Utc::now()))
        .unwrap_or(false);
    let feature_count = if fresh {
        cache
            .load()
            .context("Failed to read feature cache")?
            .map(|features| features.len())
            .unwrap_or(0)
    } else {
        0
    };

    let result = CacheStatusOutput {
        path: cache.path().display().to_string(),
        saved_at: saved_at.map(|at| at.to_rfc3339()),
        ttl_hours,
        fresh,
        feature_count,
    };

    if output.is_json() {
        return output.result(result);
    }

    output.section("Feature Cache");
    output.kv("Path", &result.path);
    output.kv("TTL (hours)", result.ttl_hours);
    match &result.saved_at {
        Some(at) if result.fresh => {
            output.kv("Saved at", at);
            output.kv("Features", result.feature_count);
            output.success("Cache is fresh");
        }
        Some(at) => {
            output.kv("Saved at", at);
            output.warning("Cache has expired and will be discarded on next use");
        }
        None => output.info("No cached collection"),
    }

    Ok(())
}

fn clear(config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let cache = file_cache(config);
    cache.clear().context("Failed to clear feature cache")?;
    output.success(format!("Cleared cache at {}", cache.path().display()));
    Ok(())
}
