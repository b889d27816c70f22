//! Explorer session: owns the loaded collection and everything derived from it
//!
//! Every trigger (new data, search change, selection toggle) recomputes its
//! dependents synchronously. Replacing the collection rebuilds schema and
//! group index from scratch.

use std::sync::Arc;

use crate::aggregate::{rank_groups, summarize_selection, Metric, RankedGroup, Summary};
use crate::error::{Result, ZonescopeError};
use crate::grouping::{GroupIndex, GroupKey};
use crate::models::{Feature, FieldCatalog};
use crate::pagination::{project, sort_by_property, Page, PageRequest, SortOrder};
use crate::ports::{FeatureCache, FeatureDecoder};
use crate::schema::{discover_schema, Schema};
use crate::selection::{filter_features, ExplorerState, Phase};

/// Interactive exploration state over one feature collection
pub struct Session<C: FeatureCache> {
    cache: C,
    catalog: FieldCatalog,
    features: Arc<[Feature]>,
    schema: Schema,
    index: GroupIndex,
    state: ExplorerState,
    summary: Summary,
    persisted: bool,
}

impl<C: FeatureCache> Session<C> {
    /// Create an empty session without consulting the cache
    pub fn new(cache: C, catalog: FieldCatalog) -> Self {
        Self {
            cache,
            catalog,
            features: Arc::from(Vec::new()),
            schema: Schema::default(),
            index: GroupIndex::default(),
            state: ExplorerState::new(),
            summary: Summary::empty(),
            persisted: false,
        }
    }

    /// Create a session seeded from the cache.
    ///
    /// A missing, expired, unavailable or corrupt cache leaves the session
    /// empty; corrupt entries are cleared so the next start does not retry them.
    pub fn open(cache: C, catalog: FieldCatalog) -> Self {
        let mut session = Self::new(cache, catalog);

        match session.cache.load() {
            Ok(Some(features)) => {
                tracing::info!(features = features.len(), "Restored feature collection from cache");
                session.install(features);
                session.persisted = true;
            }
            Ok(None) => tracing::debug!("No cached feature collection"),
            Err(e) => {
                tracing::warn!(error = %e, "Feature cache unreadable, starting empty");
                if matches!(e, ZonescopeError::CacheCorrupt { .. }) {
                    if let Err(e) = session.cache.clear() {
                        tracing::warn!(error = %e, "Failed to clear unreadable cache entry");
                    }
                }
            }
        }

        session
    }

    /// Decode new source buffers and replace the collection.
    ///
    /// On a decode failure the error is returned and the previously loaded
    /// state is left untouched. A failed cache save is logged, not returned.
    pub fn ingest<D: FeatureDecoder + ?Sized>(
        &mut self,
        decoder: &D,
        geometry: &[u8],
        attributes: &[u8],
    ) -> Result<usize> {
        let features = decoder.decode(geometry, attributes)?;
        Ok(self.replace_features(features))
    }

    /// Replace the collection atomically and persist it to the cache
    pub fn replace_features(&mut self, features: Vec<Feature>) -> usize {
        self.persisted = match self.cache.save(&features) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to cache feature collection");
                false
            }
        };
        self.install(features);
        self.features.len()
    }

    fn install(&mut self, features: Vec<Feature>) {
        let features: Arc<[Feature]> = Arc::from(features);
        let schema = discover_schema(&features);
        let index = GroupIndex::build(&features, &self.catalog);

        tracing::debug!(
            features = features.len(),
            columns = schema.len(),
            groups = index.len(),
            ungrouped = index.ungrouped_count(),
            "Rebuilt schema and group index"
        );

        self.features = features;
        self.schema = schema;
        self.index = index;
        self.refresh_summary();
    }

    fn refresh_summary(&mut self) {
        self.summary = summarize_selection(&self.index, self.state.selection().keys());
    }

    /// Toggle a group in the selection; returns whether it is now selected
    pub fn toggle_group(&mut self, key: impl Into<GroupKey>) -> bool {
        let selected = self.state.toggle_group(key);
        self.refresh_summary();
        selected
    }

    /// Add several groups to the selection, recomputing the summary once
    pub fn select_groups(&mut self, keys: impl IntoIterator<Item = GroupKey>) {
        self.state.select_groups(keys);
        self.refresh_summary();
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.set_search(text);
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
        self.refresh_summary();
    }

    /// Whether the current collection came from, or was written to, the cache
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    /// Drop the cached collection; the in-memory state is kept
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear()
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Shared handle to the collection
    pub fn shared_features(&self) -> Arc<[Feature]> {
        Arc::clone(&self.features)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn index(&self) -> &GroupIndex {
        &self.index
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &ExplorerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Summary of the current selection, kept current on every change
    pub fn selection_summary(&self) -> &Summary {
        &self.summary
    }

    /// Rank the selected groups by `metric`
    pub fn ranking(&self, metric: &Metric, top_n: usize) -> Vec<RankedGroup> {
        rank_groups(&self.index, self.state.selection().keys(), metric, top_n)
    }

    /// Features matching the current search text, in collection order
    pub fn filtered_features(&self) -> Vec<&Feature> {
        filter_features(&self.features, self.state.search())
    }

    /// One page of the filtered features, optionally ordered by a property.
    ///
    /// The request is validated against the current filtered count, so a page
    /// past the end yields an empty window.
    pub fn page(&self, request: PageRequest, sort: Option<(&str, SortOrder)>) -> Page<&Feature> {
        let mut filtered = self.filtered_features();
        if let Some((key, order)) = sort {
            sort_by_property(&mut filtered, key, order);
        }
        project(&filtered, request).map(|feature| *feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PropertyValue;
    use std::cell::RefCell;

    #[derive(Default)]
    struct StubCache {
        stored: RefCell<Option<Vec<Feature>>>,
        corrupt: bool,
        read_only: bool,
        cleared: RefCell<usize>,
    }

    impl FeatureCache for StubCache {
        fn save(&self, features: &[Feature]) -> Result<()> {
            if self.read_only {
                return Err(ZonescopeError::CacheUnavailable {
                    reason: "read-only".to_string(),
                });
            }
            *self.stored.borrow_mut() = Some(features.to_vec());
            Ok(())
        }

        fn load(&self) -> Result<Option<Vec<Feature>>> {
            if self.corrupt {
                return Err(ZonescopeError::CacheCorrupt {
                    reason: "truncated".to_string(),
                });
            }
            Ok(self.stored.borrow().clone())
        }

        fn clear(&self) -> Result<()> {
            *self.cleared.borrow_mut() += 1;
            *self.stored.borrow_mut() = None;
            Ok(())
        }
    }

    struct StubDecoder(Result<Vec<Feature>>);

    impl FeatureDecoder for StubDecoder {
        fn decode(&self, _geometry: &[u8], _attributes: &[u8]) -> Result<Vec<Feature>> {
            match &self.0 {
                Ok(features) => Ok(features.clone()),
                Err(_) => Err(ZonescopeError::decode("Stub", "mismatched buffers")),
            }
        }
    }

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
    fn test_open_with_empty_cache() {
        let session = Session::open(StubCache::default(), FieldCatalog::default());
        assert!(session.features().is_empty());
        assert!(session.index().is_empty());
        assert_eq!(session.phase(), Phase::Idle);
    }

    #[test]
    fn test_open_clears_corrupt_cache() {
        let cache = StubCache {
            corrupt: true,
            ..Default::default()
        };
        let session = Session::open(cache, FieldCatalog::default());
        assert!(session.features().is_empty());
        assert_eq!(*session.cache.cleared.borrow(), 1);
    }

    #[test]
    fn test_ingest_rebuilds_and_caches() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        let count = session.ingest(&StubDecoder(Ok(scenario())), b"", b"").unwrap();

        assert_eq!(count, 3);
        assert_eq!(session.index().len(), 2);
        assert_eq!(session.schema().len(), 3);
        assert_eq!(session.cache.stored.borrow().as_ref().unwrap().len(), 3);
        assert!(session.is_persisted());
    }

    #[test]
    fn test_failed_save_is_reported_even_with_older_entry() {
        let cache = StubCache {
            stored: RefCell::new(Some(scenario())),
            read_only: true,
            ..Default::default()
        };
        let mut session = Session::open(cache, FieldCatalog::default());
        assert!(session.is_persisted());

        let count = session.replace_features(scenario()[..1].to_vec());

        assert_eq!(count, 1);
        assert_eq!(session.features().len(), 1);
        assert!(!session.is_persisted());
        assert_eq!(session.cache.stored.borrow().as_ref().unwrap().len(), 3);
    }

    #[test]
    fn test_failed_ingest_keeps_previous_state() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());

        let decoder = StubDecoder(Err(ZonescopeError::decode("Stub", "bad")));
        let err = session.ingest(&decoder, b"", b"").unwrap_err();

        assert!(matches!(err, ZonescopeError::Decode { .. }));
        assert_eq!(session.features().len(), 3);
        assert_eq!(session.index().len(), 2);
    }

    #[test]
    fn test_selection_summary_tracks_toggles() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());

        assert!(session.selection_summary().is_empty());

        session.toggle_group("75001");
        session.toggle_group("75002");
        assert_eq!(session.selection_summary().total, 20.0);
        assert_eq!(session.phase(), Phase::Selecting);

        session.toggle_group("75001");
        assert_eq!(session.selection_summary().total, 0.0);

        session.clear_selection();
        assert!(session.selection_summary().is_empty());
    }

    #[test]
    fn test_stale_selection_after_reload() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());
        session.toggle_group("75001");
        session.toggle_group("75002");

        session.replace_features(vec![Feature::from_pairs([
            ("Zip", PropertyValue::from("75002")),
            ("Female", PropertyValue::Number(4.0)),
            ("Male", PropertyValue::Number(4.0)),
        ])]);

        assert_eq!(session.state().selection().len(), 2);
        assert_eq!(session.selection_summary().total, 8.0);
    }

    #[test]
    fn test_search_and_pages() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());

        session.set_search("750");
        let page = session.page(PageRequest::new(1, 2).unwrap(), None);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 2);

        let beyond = session.page(PageRequest::new(5, 2).unwrap(), None);
        assert!(beyond.is_empty());

        session.set_search("9999");
        let none = session.page(PageRequest::new(1, 2).unwrap(), None);
        assert!(none.is_empty());
        assert_eq!(none.total_pages, 0);
    }

    #[test]
    fn test_sorted_page() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());

        let page = session.page(
            PageRequest::first(10).unwrap(),
            Some(("Female", SortOrder::Descending)),
        );
        let female: Vec<String> = page
            .items
            .iter()
            .map(|f| f.get("Female").unwrap().to_string())
            .collect();
        assert_eq!(female, vec!["10", "3", "0"]);
    }

    #[test]
    fn test_ranking_uses_selection() {
        let mut session = Session::new(StubCache::default(), FieldCatalog::default());
        session.replace_features(scenario());
        session.toggle_group("75002");
        session.toggle_group("75001");

        let ranked = session.ranking(&Metric::Total, 10);
        assert_eq!(ranked[0].key.as_str(), "75001");
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_select_groups_matches_individual_toggles() {
        let mut bulk = Session::new(StubCache::default(), FieldCatalog::default());
        bulk.replace_features(scenario());
        bulk.select_groups(["75002", "75001", "75002", "99999"].into_iter().map(GroupKey::from));

        let mut single = Session::new(StubCache::default(), FieldCatalog::default());
        single.replace_features(scenario());
        single.toggle_group("75002");
        single.toggle_group("75001");
        single.toggle_group("99999");

        assert_eq!(bulk.selection_summary(), single.selection_summary());
        assert_eq!(bulk.selection_summary().total, 20.0);
        let keys: Vec<&str> = bulk.state().selection().keys().iter().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["75002", "75001", "99999"]);
    }
}
