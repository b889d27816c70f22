//! Source format adapters
//!
//! Each adapter converts an external representation into the generic
//! [`Feature`](crate::models::Feature) collection the analytics engine works on.

pub mod geojson;
pub mod shapefile;

pub use self::geojson::{features_to_collection, parse_features, write_features};
pub use self::shapefile::ShapefileDecoder;
