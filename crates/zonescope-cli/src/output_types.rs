use serde::Serialize;
use std::collections::BTreeMap;
use zonescope_core::{FieldStats, PropertyBag, RankedGroup, SchemaEntry, Summary};

/// Output for load command
#[derive(Debug, Serialize)]
pub struct LoadOutput {
    pub source: String,
    pub feature_count: usize,
    pub column_count: usize,
    pub group_count: usize,
    pub ungrouped_count: usize,
    pub cached: bool,
}

/// Output for schema command
#[derive(Debug, Serialize)]
pub struct SchemaOutput<'a> {
    pub feature_count: usize,
    pub fields: &'a [SchemaEntry],
}

/// Output for groups command
#[derive(Debug, Serialize)]
pub struct GroupsOutput {
    pub groups: Vec<GroupInfo>,
    pub ungrouped_count: usize,
}

#[derive(Debug, Serialize)]
pub struct GroupInfo {
    pub zip: String,
    pub records: usize,
    pub total: f64,
    pub female: f64,
    pub male: f64,
    pub schools: f64,
}

/// Output for summary command
#[derive(Debug, Serialize)]
pub struct SummaryOutput<'a> {
    pub selection: Vec<String>,
    pub unknown: Vec<String>,
    pub summary: &'a Summary,
}

/// Output for rank command
#[derive(Debug, Serialize)]
pub struct RankOutput {
    pub metric: String,
    pub groups: Vec<RankedGroup>,
}

/// Output for browse command
#[derive(Debug, Serialize)]
pub struct BrowseOutput<'a> {
    pub search: String,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub features: Vec<&'a PropertyBag>,
}

/// Output for stats command
#[derive(Debug, Serialize)]
pub struct StatsOutput {
    pub search: String,
    pub stats: Option<FieldStats>,
}

/// Output for cache status command
#[derive(Debug, Serialize)]
pub struct CacheStatusOutput {
    pub path: String,
    pub saved_at: Option<String>,
    pub ttl_hours: u64,
    pub fresh: bool,
    pub feature_count: usize,
}

/// Output for config command
#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub values: BTreeMap<String, ConfigValue>,
}

#[derive(Debug, Serialize)]
pub struct ConfigValue {
    pub value: String,
    pub source: String,
}
