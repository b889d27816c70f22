//! Group index: partitions features by a ZIP-like key
//!
//! The key is resolved by probing an ordered alias list; the first non-blank
//! value wins. Each group owns one accumulator record built in a single pass and
//! never mutated afterwards. A new feature collection means a new index.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::aggregate::Totals;
use crate::models::{Feature, FieldCatalog, PropertyBag};

/// Identity of an analytic group (a ZIP code)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupKey(pub String);

impl GroupKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for GroupKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        GroupKey(value.to_string())
    }
}

impl From<String> for GroupKey {
    fn from(value: String) -> Self {
        GroupKey(value)
    }
}

/// Resolve the group key of a property bag.
///
/// Aliases are tried in order and the first present, non-blank value wins.
/// Returns `None` when no alias is present; such features are left out of
/// every group.
pub fn resolve_group_key<S: AsRef<str>>(
    properties: &PropertyBag,
    aliases: &[S],
) -> Option<GroupKey> {
    aliases.iter().find_map(|alias| {
        properties
            .get(alias.as_ref())
            .filter(|value| !value.is_blank())
            .map(|value| GroupKey(value.to_string().trim().to_string()))
    })
}

/// Accumulated totals for every feature sharing a group key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub key: GroupKey,

    /// Indices of member features in the source collection, in feature order
    pub members: Vec<usize>,

    pub totals: Totals,
}

impl GroupAggregate {
    fn new(key: GroupKey) -> Self {
        Self {
            key,
            members: Vec::new(),
            totals: Totals::default(),
        }
    }

    pub fn record_count(&self) -> usize {
        self.members.len()
    }

    /// Member features borrowed from the collection the index was built from
    pub fn member_features<'a>(
        &'a self,
        features: &'a [Feature],
    ) -> impl Iterator<Item = &'a Feature> {
        self.members.iter().filter_map(move |&idx| features.get(idx))
    }
}

/// Single-pass builder for a [`GroupIndex`].
///
/// Hosts with large collections can feed features in bounded chunks through
/// [`GroupIndexBuilder::fold`]; the result equals a one-shot build.
#[derive(Debug)]
pub struct GroupIndexBuilder<'a> {
    catalog: &'a FieldCatalog,
    groups: IndexMap<GroupKey, GroupAggregate>,
    ungrouped: usize,
    seen: usize,
}

impl<'a> GroupIndexBuilder<'a> {
    pub fn new(catalog: &'a FieldCatalog) -> Self {
        Self {
            catalog,
            groups: IndexMap::new(),
            ungrouped: 0,
            seen: 0,
        }
    }

    /// Fold the next feature of the collection into its group
    pub fn fold(&mut self, feature: &Feature) {
        let index = self.seen;
        self.seen += 1;

        let Some(key) = resolve_group_key(&feature.properties, &self.catalog.zip_aliases) else {
            self.ungrouped += 1;
            return;
        };

        let aggregate = self
            .groups
            .entry(key.clone())
            .or_insert_with(|| GroupAggregate::new(key));
        aggregate.members.push(index);
        aggregate.totals.fold_feature(feature, self.catalog);
    }

    pub fn fold_all<'f>(&mut self, features: impl IntoIterator<Item = &'f Feature>) {
        for feature in features {
            self.fold(feature);
        }
    }

    pub fn finish(self) -> GroupIndex {
        GroupIndex {
            groups: self.groups,
            ungrouped: self.ungrouped,
            feature_count: self.seen,
        }
    }
}

/// Mapping from group key to its aggregate, in first-seen key order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupIndex {
    groups: IndexMap<GroupKey, GroupAggregate>,
    ungrouped: usize,
    feature_count: usize,
}

impl GroupIndex {
    /// Build the index over a whole feature collection
    pub fn build(features: &[Feature], catalog: &FieldCatalog) -> Self {
        let mut builder = GroupIndexBuilder::new(catalog);
        builder.fold_all(features);
        builder.finish()
    }

    pub fn get(&self, key: &str) -> Option<&GroupAggregate> {
        self.groups.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.groups.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of features without any group key alias
    pub fn ungrouped_count(&self) -> usize {
        self.ungrouped
    }

    /// Number of features the index was built from
    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    pub fn keys(&self) -> impl Iterator<Item = &GroupKey> {
        self.groups.keys()
    }

    pub fn aggregates(&self) -> impl Iterator<Item = &GroupAggregate> {
        self.groups.values()
    }

    /// Keys sorted ascending
    pub fn sorted_keys(&self) -> Vec<&GroupKey> {
        let mut keys: Vec<&GroupKey> = self.groups.keys().collect();
        keys.sort();
        keys
    }

    /// Keys containing `term` (case-insensitive), sorted ascending
    pub fn keys_matching(&self, term: &str) -> Vec<&GroupKey> {
        let needle = term.trim().to_lowercase();
        let mut keys: Vec<&GroupKey> = self
            .groups
            .keys()
            .filter(|key| needle.is_empty() || key.as_str().to_lowercase().contains(&needle))
            .collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyValue;

    fn scenario() -> Vec<Feature> {
        vec![
            Feature::from_pairs([
                ("Zip", PropertyValue::from("75001")),
                ("Female", PropertyValue::Number(10.0)),
                ("Male", PropertyValue::Number(5.0)),
            ]),
            Feature::from_pairs([
                ("Zip", PropertyValue::from("75001")),
                ("Female", PropertyValue::Number(3.0)),
                ("Male", PropertyValue::Number(2.0)),
            ]),
            Feature::from_pairs([
                ("Zip", PropertyValue::from("75002")),
                ("Female", PropertyValue::Number(0.0)),
                ("Male", PropertyValue::Number(0.0)),
            ]),
        ]
    }

    #[test]
    fn test_alias_priority() {
        let feature = Feature::from_pairs([("ZIP", "75002"), ("Zip", "75001")]);
        let aliases = FieldCatalog::default().zip_aliases;
        assert_eq!(
            resolve_group_key(&feature.properties, &aliases),
            Some(GroupKey::from("75001"))
        );
    }

    #[test]
    fn test_blank_alias_falls_through() {
        let feature = Feature::from_pairs([("Zip", " "), ("zip", "75080")]);
        assert_eq!(
            resolve_group_key(&feature.properties, &["Zip", "ZIP", "zip"][..]),
            Some(GroupKey::from("75080"))
        );
    }

    #[test]
    fn test_numeric_zip_renders_without_fraction() {
        let feature = Feature::from_pairs([("ZIP", PropertyValue::Number(75001.0))]);
        assert_eq!(
            resolve_group_key(&feature.properties, &["Zip", "ZIP"][..]),
            Some(GroupKey::from("75001"))
        );
    }

    #[test]
    fn test_missing_alias_is_excluded() {
        let mut features = scenario();
        features.push(Feature::from_pairs([("Name", "No zip here")]));

        let index = GroupIndex::build(&features, &FieldCatalog::default());
        assert_eq!(index.len(), 2);
        assert_eq!(index.ungrouped_count(), 1);
        assert_eq!(index.feature_count(), 4);
    }

    #[test]
    fn test_scenario_totals() {
        let index = GroupIndex::build(&scenario(), &FieldCatalog::default());
        assert_eq!(index.len(), 2);

        let first = index.get("75001").unwrap();
        assert_eq!(first.members, vec![0, 1]);
        assert_eq!(first.totals.female, 13.0);
        assert_eq!(first.totals.male, 7.0);
        assert_eq!(first.totals.total(), 20.0);

        let second = index.get("75002").unwrap();
        assert_eq!(second.totals.total(), 0.0);
        assert_eq!(second.record_count(), 1);
    }

    #[test]
    fn test_member_features() {
        let features = scenario();
        let index = GroupIndex::build(&features, &FieldCatalog::default());
        let members: Vec<&Feature> =
            index.get("75001").unwrap().member_features(&features).collect();
        assert_eq!(members, vec![&features[0], &features[1]]);
    }

    #[test]
    fn test_chunked_build_matches_single_pass() {
        let features = scenario();
        let catalog = FieldCatalog::default();

        let mut builder = GroupIndexBuilder::new(&catalog);
        for chunk in features.chunks(2) {
            builder.fold_all(chunk);
        }

        assert_eq!(builder.finish(), GroupIndex::build(&features, &catalog));
    }

    #[test]
    fn test_keys_matching() {
        let index = GroupIndex::build(&scenario(), &FieldCatalog::default());
        assert_eq!(index.keys_matching("002"), vec![&GroupKey::from("75002")]);
        assert_eq!(index.keys_matching("").len(), 2);
        assert!(index.keys_matching("9999").is_empty());
    }
}
