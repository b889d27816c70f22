use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Zonescope - school zone attribute explorer
#[derive(Parser, Debug)]
#[command(name = "zonescope")]
#[command(about = "Explore and aggregate school zone demographics by ZIP code", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to zonescope.toml in the current directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Feature cache location
    #[arg(long, global = true, value_name = "PATH")]
    pub cache_path: Option<PathBuf>,

    /// Hours before a cached collection expires
    #[arg(long, global = true, value_name = "HOURS")]
    pub cache_ttl_hours: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a shapefile (or GeoJSON) and cache the feature collection
    Load(LoadArgs),

    /// Show the discovered attribute schema
    Schema,

    /// List ZIP groups with their totals
    Groups(GroupsArgs),

    /// Summarize one or more ZIP groups as a single selection
    Summary(SummaryArgs),

    /// Rank ZIP groups by a metric
    Rank(RankArgs),

    /// Page through features, optionally filtered and sorted
    Browse(BrowseArgs),

    /// Show numeric statistics for one attribute
    Stats(StatsArgs),

    /// Manage the feature cache
    Cache(CacheArgs),

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct LoadArgs {
    /// Path to the .shp file, or a .geojson/.json FeatureCollection
    pub path: PathBuf,

    /// Attribute table (defaults to the .dbf next to the .shp)
    #[arg(long, value_name = "PATH")]
    pub dbf: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct GroupsArgs {
    /// Only list ZIP codes containing this text
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Parser, Debug)]
pub struct SummaryArgs {
    /// ZIP code to include (repeatable, order is kept)
    #[arg(long = "zip", short = 'z', required = true, value_name = "ZIP")]
    pub zips: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct RankArgs {
    /// Metric: total, female, male, records, schools, avg-per-school,
    /// female-male-ratio, or field:<attribute>
    #[arg(long, short = 'm', default_value = "total")]
    pub metric: String,

    /// ZIP codes to rank (defaults to every group)
    #[arg(long = "zip", short = 'z', value_name = "ZIP")]
    pub zips: Vec<String>,

    /// Number of rows to show (overrides top_n)
    #[arg(long, short = 'n')]
    pub top: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct BrowseArgs {
    /// Case-insensitive text to match against any attribute
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Page number, starting at 1
    #[arg(long, short = 'p', default_value = "1")]
    pub page: usize,

    /// Rows per page (overrides page_size)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Attribute to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Attributes to show (defaults to the first few schema columns)
    #[arg(long = "column", short = 'c', value_name = "KEY")]
    pub columns: Vec<String>,
}

#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Attribute to describe
    pub field: String,

    /// Only include features matching this text
    #[arg(long, short = 's')]
    pub search: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Show whether a usable cached collection exists
    Status,

    /// Remove the cached collection
    Clear,
}
