//! Schema discovery over schema-less property bags
//!
//! Scans a feature collection once and infers, for every property key, a value
//! kind and its cardinality. The kind of a key is fixed by the first value seen
//! for it; later values that disagree in shape do not revise it.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Feature, PropertyValue};

/// Number of distinct sample values retained per key
pub const SAMPLE_SIZE: usize = 3;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%d-%b-%Y", "%b %d, %Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Inferred kind of a property key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Date,
    Text,
    Unknown,
}

impl FieldKind {
    /// Classify a single value: numeric parse first, then date parse, else text
    pub fn infer(value: &PropertyValue) -> Self {
        match value {
            PropertyValue::Null => FieldKind::Unknown,
            PropertyValue::Number(n) if n.is_finite() => FieldKind::Numeric,
            PropertyValue::Number(_) => FieldKind::Unknown,
            PropertyValue::Text(s) => {
                if value.as_number().is_some() {
                    FieldKind::Numeric
                } else if looks_like_date(s) {
                    FieldKind::Date
                } else {
                    FieldKind::Text
                }
            }
        }
    }
}

/// Whether text parses as one of the recognised date or timestamp shapes
pub fn looks_like_date(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }

    DateTime::parse_from_rfc3339(text).is_ok()
        || DATE_FORMATS
            .iter()
            .any(|fmt| NaiveDate::parse_from_str(text, fmt).is_ok())
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(text, fmt).is_ok())
}

/// Schema metadata for one property key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaEntry {
    pub key: String,
    pub kind: FieldKind,
    pub distinct_count: usize,
    pub samples: Vec<PropertyValue>,
}

/// Distinct-value identity; a number and the text spelling it stay separate
#[derive(Debug, PartialEq, Eq, Hash)]
enum DistinctValue {
    Number(u64),
    Text(String),
}

impl DistinctValue {
    fn of(value: &PropertyValue) -> Option<Self> {
        match value {
            PropertyValue::Null => None,
            // -0.0 and 0.0 are the same value
            PropertyValue::Number(n) => Some(Self::Number((n + 0.0).to_bits())),
            PropertyValue::Text(text) => Some(Self::Text(text.clone())),
        }
    }
}

#[derive(Debug, Default)]
struct KeyObservation {
    kind: Option<FieldKind>,
    distinct: HashSet<DistinctValue>,
    samples: Vec<PropertyValue>,
}

/// Incremental schema builder.
///
/// Features can be observed in bounded chunks; `finish` yields the same result
/// as a single `discover_schema` call over the concatenated input.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    keys: IndexMap<String, KeyObservation>,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one feature into the schema
    pub fn observe(&mut self, feature: &Feature) {
        for (key, value) in &feature.properties {
            let observation = self.keys.entry(key.clone()).or_default();

            if observation.kind.is_none() {
                observation.kind = Some(FieldKind::infer(value));
            }

            let Some(distinct) = DistinctValue::of(value) else {
                continue;
            };

            if observation.distinct.insert(distinct)
                && observation.samples.len() < SAMPLE_SIZE
            {
                observation.samples.push(value.clone());
            }
        }
    }

    pub fn observe_all<'a>(&mut self, features: impl IntoIterator<Item = &'a Feature>) {
        for feature in features {
            self.observe(feature);
        }
    }

    pub fn finish(self) -> Schema {
        let entries = self
            .keys
            .into_iter()
            .map(|(key, observation)| SchemaEntry {
                key,
                kind: observation.kind.unwrap_or(FieldKind::Unknown),
                distinct_count: observation.distinct.len(),
                samples: observation.samples,
            })
            .collect();

        Schema { entries }
    }
}

/// Discovered schema, entries in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Keys whose inferred kind is numeric, in schema order
    pub fn numeric_keys(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.kind == FieldKind::Numeric)
            .map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SchemaEntry> {
        self.entries.iter()
    }
}

/// Infer the schema of a feature collection in one pass
pub fn discover_schema(features: &[Feature]) -> Schema {
    let mut builder = SchemaBuilder::new();
    builder.observe_all(features);
    builder.finish()
}
