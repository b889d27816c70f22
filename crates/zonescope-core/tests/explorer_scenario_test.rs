//! End-to-end scenarios over a small school zone collection

use zonescope_core::{
    discover_schema, filter_features, rank_groups, summarize_group, summarize_selection,
    FieldCatalog, FieldKind, Feature, GroupIndex, GroupKey, Metric, PageRequest, PropertyValue,
    Ratio,
};

fn zone(zip: &str, female: f64, male: f64) -> Feature {
    Feature::from_pairs([
        ("Zip", PropertyValue::from(zip)),
        ("Female", PropertyValue::Number(female)),
        ("Male", PropertyValue::Number(male)),
    ])
}

fn scenario() -> Vec<Feature> {
    vec![zone("75001", 10.0, 5.0), zone("75001", 3.0, 2.0), zone("75002", 0.0, 0.0)]
}

#[test]
fn test_group_totals() {
    let index = GroupIndex::build(&scenario(), &FieldCatalog::default());
    assert_eq!(index.len(), 2);

    let first = summarize_group(index.get("75001").unwrap());
    assert_eq!(first.total, 20.0);
    assert_eq!(first.totals.female, 13.0);
    assert_eq!(first.totals.male, 7.0);

    let second = summarize_group(index.get("75002").unwrap());
    assert_eq!(second.total, 0.0);
    assert_eq!(second.female_male_ratio, Ratio::NotApplicable);
}

#[test]
fn test_search_scenarios() {
    let features = scenario();

    let matched = filter_features(&features, "750");
    assert_eq!(matched.len(), 3);

    let none = filter_features(&features, "9999");
    assert!(none.is_empty());
    let page = zonescope_core::project(&none, PageRequest::first(10).unwrap());
    assert_eq!(page.total_pages, 0);
}

#[test]
fn test_selection_total() {
    let index = GroupIndex::build(&scenario(), &FieldCatalog::default());
    let selection = vec![GroupKey::from("75001"), GroupKey::from("75002")];

    let summary = summarize_selection(&index, &selection);
    assert_eq!(summary.total, 20.0);

    let separately = summarize_selection(&index, &selection[..1]).total
        + summarize_selection(&index, &selection[1..]).total;
    assert_eq!(summary.total, separately);
}

#[test]
fn test_alias_priority_with_conflicting_values() {
    let feature = Feature::from_pairs([("ZIP", "75009"), ("Zip", "75001")]);
    let index = GroupIndex::build(&[feature], &FieldCatalog::default());

    assert!(index.contains("75001"));
    assert!(!index.contains("75009"));
}

#[test]
fn test_schema_follows_column_order() {
    let schema = discover_schema(&scenario());
    let keys: Vec<&str> = schema.iter().map(|entry| entry.key.as_str()).collect();

    assert_eq!(keys, vec!["Zip", "Female", "Male"]);
    assert_eq!(schema.get("Zip").unwrap().kind, FieldKind::Numeric);
    assert_eq!(schema.get("Zip").unwrap().distinct_count, 2);
}

#[test]
fn test_ranking_top_n() {
    let features = vec![
        zone("75001", 1.0, 1.0),
        zone("75002", 5.0, 5.0),
        zone("75003", 3.0, 3.0),
    ];
    let index = GroupIndex::build(&features, &FieldCatalog::default());
    let selection: Vec<GroupKey> = index.keys().cloned().collect();

    let ranked = rank_groups(&index, &selection, &Metric::Total, 2);
    let keys: Vec<&str> = ranked.iter().map(|row| row.key.as_str()).collect();
    assert_eq!(keys, vec!["75002", "75003"]);
    assert_eq!(ranked[0].value, Some(10.0));
}
