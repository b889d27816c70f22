//! Selection and search filter state

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::grouping::GroupKey;
use crate::models::Feature;

/// Ordered, duplicate-free set of selected group keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<GroupKey>", into = "Vec<GroupKey>")]
pub struct Selection {
    keys: Vec<GroupKey>,
    members: HashSet<GroupKey>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `key` if absent, remove it if present.
    ///
    /// Returns `true` when the key is selected after the call.
    pub fn toggle(&mut self, key: GroupKey) -> bool {
        if self.members.remove(&key) {
            self.keys.retain(|k| *k != key);
            false
        } else {
            self.insert(key)
        }
    }

    /// Add `key` if absent; returns whether it was newly added
    pub fn insert(&mut self, key: GroupKey) -> bool {
        if self.members.contains(&key) {
            return false;
        }
        self.members.insert(key.clone());
        self.keys.push(key);
        true
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.members.clear();
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.contains(key)
    }

    /// Keys in the order they were first selected
    pub fn keys(&self) -> &[GroupKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl Extend<GroupKey> for Selection {
    fn extend<I: IntoIterator<Item = GroupKey>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl FromIterator<GroupKey> for Selection {
    fn from_iter<I: IntoIterator<Item = GroupKey>>(iter: I) -> Self {
        let mut selection = Selection::new();
        selection.extend(iter);
        selection
    }
}

impl From<Vec<GroupKey>> for Selection {
    fn from(keys: Vec<GroupKey>) -> Self {
        keys.into_iter().collect()
    }
}

impl From<Selection> for Vec<GroupKey> {
    fn from(selection: Selection) -> Self {
        selection.keys
    }
}

/// Coarse state of the explorer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No selection and no search text
    Idle,
    /// Search text set, nothing selected
    Searching,
    /// One or more groups selected, regardless of search text
    Selecting,
}

/// Active search text and group selection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerState {
    search: String,
    selection: Selection,
}

impl ExplorerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        if !self.selection.is_empty() {
            Phase::Selecting
        } else if !self.search.is_empty() {
            Phase::Searching
        } else {
            Phase::Idle
        }
    }

    /// Toggle a group in the selection; the search text is untouched
    pub fn toggle_group(&mut self, key: impl Into<GroupKey>) -> bool {
        self.selection.toggle(key.into())
    }

    /// Add every key not already selected, keeping first-seen order
    pub fn select_groups(&mut self, keys: impl IntoIterator<Item = GroupKey>) {
        self.selection.extend(keys);
    }

    /// Replace the search text; the selection is untouched
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Empty the selection; the search text is untouched
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }
}

/// Case-insensitive substring match over every property's textual form.
///
/// An empty (or all-whitespace) term matches every feature.
pub fn matches_search(feature: &Feature, term: &str) -> bool {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    matches_lowercase(feature, &needle)
}

fn matches_lowercase(feature: &Feature, needle: &str) -> bool {
    feature
        .properties
        .values()
        .any(|value| value.to_string().to_lowercase().contains(needle))
}

/// Features matching `term`, in collection order
pub fn filter_features<'a>(features: &'a [Feature], term: &str) -> Vec<&'a Feature> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return features.iter().collect();
    }
    features
        .iter()
        .filter(|feature| matches_lowercase(feature, &needle))
        .collect()
}
