//! Property tests for schema, aggregate and paging invariants

use proptest::prelude::*;
use zonescope_core::{
    discover_schema, project, summarize_selection, FieldCatalog, Feature, GroupIndex, GroupKey,
    PageRequest, PropertyValue, Ratio,
};

const ZIPS: &[&str] = &["75001", "75002", "75003", "75004", "75005", "75006"];

fn zone_strategy() -> impl Strategy<Value = Feature> {
    (
        0..ZIPS.len(),
        0u32..500,
        0u32..500,
        0u32..5,
        prop::option::of(0u32..100),
    )
        .prop_map(|(zip, female, male, schools, grade)| {
            let mut pairs = vec![
                ("Zip", PropertyValue::from(ZIPS[zip])),
                ("Female", PropertyValue::Number(female as f64)),
                ("Male", PropertyValue::Number(male as f64)),
                ("Schools", PropertyValue::Number(schools as f64)),
            ];
            if let Some(grade) = grade {
                pairs.push(("Grade_3", PropertyValue::from(grade.to_string())));
            }
            Feature::from_pairs(pairs)
        })
}

proptest! {
    #[test]
    fn schema_is_stable(features in prop::collection::vec(zone_strategy(), 0..40)) {
        prop_assert_eq!(discover_schema(&features), discover_schema(&features));
    }

    #[test]
    fn selection_totals_are_additive(
        features in prop::collection::vec(zone_strategy(), 0..60),
        split in 0..=ZIPS.len(),
    ) {
        let index = GroupIndex::build(&features, &FieldCatalog::default());
        let all: Vec<GroupKey> = ZIPS.iter().map(|z| GroupKey::from(*z)).collect();
        let (left, right) = all.split_at(split);

        let union = summarize_selection(&index, &all);
        let mut combined = summarize_selection(&index, left).totals;
        combined += &summarize_selection(&index, right).totals;

        prop_assert_eq!(union.totals, combined);
    }

    #[test]
    fn ratios_never_leak_non_finite_values(
        features in prop::collection::vec(zone_strategy(), 0..30),
    ) {
        let index = GroupIndex::build(&features, &FieldCatalog::default());
        for key in index.keys() {
            let summary = summarize_selection(&index, std::slice::from_ref(key));
            if let Ratio::Value(v) = summary.female_male_ratio {
                prop_assert!(v.is_finite());
            } else {
                prop_assert_eq!(summary.totals.male, 0.0);
            }
            prop_assert!(summary.average_per_school.is_finite());
        }
    }

    #[test]
    fn pages_are_bounded(count in 0usize..200, page in 1usize..30, page_size in 1usize..50) {
        let items: Vec<usize> = (0..count).collect();
        let window = project(&items, PageRequest::new(page, page_size).unwrap());

        prop_assert!(window.items.len() <= page_size);
        if page > window.total_pages {
            prop_assert!(window.items.is_empty());
        }
    }
}

#[test]
fn empty_selection_is_zero() {
    let index = GroupIndex::build(&[], &FieldCatalog::default());
    let summary = summarize_selection(&index, &[]);

    assert_eq!(summary.total, 0.0);
    assert_eq!(summary.record_count(), 0);
    assert_eq!(summary.female_male_ratio, Ratio::NotApplicable);
    assert_eq!(summary.average_ratio, Ratio::NotApplicable);
}
