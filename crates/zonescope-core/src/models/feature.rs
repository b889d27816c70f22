use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::PropertyValue;

/// Ordered attribute bag; iteration follows the source column order
pub type PropertyBag = IndexMap<String, PropertyValue>;

/// One geographic record: opaque geometry plus a property bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Geometry (GeoJSON-like structure), passed through untouched
    pub geometry: Option<serde_json::Value>,

    /// Feature properties
    pub properties: PropertyBag,
}

impl Feature {
    /// Create a feature with geometry
    pub fn with_geometry(geometry: serde_json::Value, properties: PropertyBag) -> Self {
        Self {
            geometry: Some(geometry),
            properties,
        }
    }

    /// Create a feature without geometry
    pub fn without_geometry(properties: PropertyBag) -> Self {
        Self {
            geometry: None,
            properties,
        }
    }

    /// Build a geometry-less feature from key/value pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        Self::without_geometry(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Look up a property by exact key
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }
}
