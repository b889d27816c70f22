//! Zonescope Store - feature cache adapters
//!
//! Implementations of the `FeatureCache` port: an in-memory cache for tests
//! and embedding, and a file-backed GeoJSON cache for the CLI.

pub mod file;
pub mod freshness;
pub mod memory;

pub use file::FileCache;
pub use freshness::Freshness;
pub use memory::MemoryCache;
