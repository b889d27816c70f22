//! Zonescope Core - attribute analytics over school zone feature collections
//!
//! Schema discovery, ZIP grouping, selection aggregates, search filtering and
//! paging for features decoded from shapefiles.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod formats;
pub mod grouping;
pub mod models;
pub mod pagination;
pub mod ports;
pub mod schema;
pub mod selection;
pub mod session;

pub use aggregate::{
    describe_field, rank_groups, summarize_group, summarize_selection, FieldStats, Metric,
    RankedGroup, Ratio, Summary, Totals,
};
pub use error::{Result, ZonescopeError};
pub use grouping::{resolve_group_key, GroupAggregate, GroupIndex, GroupIndexBuilder, GroupKey};
pub use models::{Feature, FieldCatalog, PropertyBag, PropertyValue};
pub use pagination::{project, total_pages, Page, PageRequest, SortOrder};
pub use ports::{FeatureCache, FeatureDecoder};
pub use schema::{discover_schema, FieldKind, Schema, SchemaBuilder, SchemaEntry};
pub use selection::{filter_features, matches_search, ExplorerState, Phase, Selection};
pub use session::Session;
