//! Aggregate engine: per-group and per-selection summaries and rankings
//!
//! Selection summaries are element-wise sums of group totals; derived ratios
//! are always recomputed from the summed totals, never averaged across groups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;

use crate::error::{Result, ZonescopeError};
use crate::grouping::{GroupAggregate, GroupIndex, GroupKey};
use crate::models::{Feature, FieldCatalog};

/// Result of a ratio whose denominator may be zero.
///
/// Serializes as a number, or `null` when not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Ratio {
    Value(f64),
    NotApplicable,
}

impl Ratio {
    /// Divide, yielding `NotApplicable` for a zero denominator or a non-finite result
    pub fn of(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Ratio::NotApplicable;
        }
        let value = numerator / denominator;
        if value.is_finite() {
            Ratio::Value(value)
        } else {
            Ratio::NotApplicable
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Ratio::Value(v) => Some(*v),
            Ratio::NotApplicable => None,
        }
    }

    pub fn is_applicable(&self) -> bool {
        matches!(self, Ratio::Value(_))
    }
}

impl From<Option<f64>> for Ratio {
    fn from(value: Option<f64>) -> Self {
        value.map(Ratio::Value).unwrap_or(Ratio::NotApplicable)
    }
}

impl From<Ratio> for Option<f64> {
    fn from(ratio: Ratio) -> Self {
        ratio.value()
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ratio::Value(v) => write!(f, "{:.2}", v),
            Ratio::NotApplicable => f.write_str("n/a"),
        }
    }
}

/// Running totals for a group or a selection of groups
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub records: usize,
    pub female: f64,
    pub male: f64,
    pub grades: IndexMap<String, f64>,
    pub schools: f64,
    pub ratio: f64,

    /// Sum of every attribute that parsed as a non-negative number
    pub fields: IndexMap<String, f64>,
}

impl Totals {
    /// Primary population figure: female plus male
    pub fn total(&self) -> f64 {
        self.female + self.male
    }

    pub fn grade(&self, name: &str) -> f64 {
        self.grades.get(name).copied().unwrap_or(0.0)
    }

    pub fn field(&self, name: &str) -> f64 {
        self.fields.get(name).copied().unwrap_or(0.0)
    }

    /// Fold one member feature into these totals.
    ///
    /// Absent fields contribute zero and non-numeric values are skipped for
    /// the sum they would have fed; neither invalidates the feature.
    pub fn fold_feature(&mut self, feature: &Feature, catalog: &FieldCatalog) {
        let number = |key: &str| feature.get(key).and_then(|value| value.as_number());

        self.records += 1;

        if let Some(n) = number(&catalog.female) {
            self.female += n;
        }
        if let Some(n) = number(&catalog.male) {
            self.male += n;
        }
        for grade in &catalog.grades {
            if let Some(n) = number(grade) {
                *self.grades.entry(grade.clone()).or_insert(0.0) += n;
            }
        }
        if let Some(n) = number(&catalog.schools) {
            self.schools += n;
        }
        if let Some(n) = number(&catalog.ratio) {
            self.ratio += n;
        }

        for (key, value) in &feature.properties {
            if let Some(n) = value.as_number().filter(|n| *n >= 0.0) {
                *self.fields.entry(key.clone()).or_insert(0.0) += n;
            }
        }
    }
}

impl AddAssign<&Totals> for Totals {
    fn add_assign(&mut self, other: &Totals) {
        self.records += other.records;
        self.female += other.female;
        self.male += other.male;
        self.schools += other.schools;
        self.ratio += other.ratio;
        for (key, value) in &other.grades {
            *self.grades.entry(key.clone()).or_insert(0.0) += value;
        }
        for (key, value) in &other.fields {
            *self.fields.entry(key.clone()).or_insert(0.0) += value;
        }
    }
}

/// Totals plus the ratios derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub totals: Totals,
    pub total: f64,
    pub female_male_ratio: Ratio,

    /// Primary total per school; zero when there are no schools
    pub average_per_school: f64,

    /// Mean of the ratio field per record
    pub average_ratio: Ratio,
}

impl Summary {
    pub fn from_totals(totals: Totals) -> Self {
        let total = totals.total();
        let average_per_school = Ratio::of(total, totals.schools).value().unwrap_or(0.0);

        Self {
            female_male_ratio: Ratio::of(totals.female, totals.male),
            average_ratio: Ratio::of(totals.ratio, totals.records as f64),
            average_per_school,
            total,
            totals,
        }
    }

    /// The "no selection" summary: zero totals and not-applicable ratios
    pub fn empty() -> Self {
        Self::from_totals(Totals::default())
    }

    pub fn is_empty(&self) -> bool {
        self.totals.records == 0
    }

    pub fn record_count(&self) -> usize {
        self.totals.records
    }
}

impl Default for Summary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Summarize a single group
pub fn summarize_group(aggregate: &GroupAggregate) -> Summary {
    Summary::from_totals(aggregate.totals.clone())
}

/// Summarize the union of the selected groups.
///
/// Keys with no aggregate in the index contribute nothing; repeated keys are
/// counted once.
pub fn summarize_selection(index: &GroupIndex, selection: &[GroupKey]) -> Summary {
    let mut totals = Totals::default();
    for aggregate in resolve_selection(index, selection) {
        totals += &aggregate.totals;
    }
    Summary::from_totals(totals)
}

fn resolve_selection<'a>(
    index: &'a GroupIndex,
    selection: &'a [GroupKey],
) -> impl Iterator<Item = &'a GroupAggregate> {
    let mut seen = HashSet::new();
    selection
        .iter()
        .filter(move |key: &&'a GroupKey| {
            let key: &'a GroupKey = *key;
            seen.insert(key.as_str())
        })
        .filter_map(|key| index.get(key.as_str()))
}

/// Value a ranking orders groups by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Total,
    Female,
    Male,
    Records,
    Schools,
    AveragePerSchool,
    FemaleMaleRatio,
    /// Generic per-attribute sum
    Field(String),
}

impl Metric {
    /// Value of this metric for a summary; `None` when it is not applicable
    pub fn value(&self, summary: &Summary) -> Option<f64> {
        match self {
            Metric::Total => Some(summary.total),
            Metric::Female => Some(summary.totals.female),
            Metric::Male => Some(summary.totals.male),
            Metric::Records => Some(summary.totals.records as f64),
            Metric::Schools => Some(summary.totals.schools),
            Metric::AveragePerSchool => Some(summary.average_per_school),
            Metric::FemaleMaleRatio => summary.female_male_ratio.value(),
            Metric::Field(name) => Some(summary.totals.field(name)),
        }
    }
}

impl FromStr for Metric {
    type Err = ZonescopeError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(field) = s.strip_prefix("field:") {
            if field.is_empty() {
                return Err(ZonescopeError::ConfigInvalid {
                    key: "metric".to_string(),
                    reason: "field: requires an attribute name".to_string(),
                });
            }
            return Ok(Metric::Field(field.to_string()));
        }

        match s.to_lowercase().replace('_', "-").as_str() {
            "total" | "population" => Ok(Metric::Total),
            "female" => Ok(Metric::Female),
            "male" => Ok(Metric::Male),
            "records" | "count" => Ok(Metric::Records),
            "schools" => Ok(Metric::Schools),
            "avg-per-school" | "average-per-school" => Ok(Metric::AveragePerSchool),
            "female-male-ratio" | "ratio" => Ok(Metric::FemaleMaleRatio),
            _ => Err(ZonescopeError::ConfigInvalid {
                key: "metric".to_string(),
                reason: format!(
                    "Unknown metric: {}. Use total, female, male, records, schools, \
                     avg-per-school, female-male-ratio, or field:<name>",
                    s
                ),
            }),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Total => f.write_str("total"),
            Metric::Female => f.write_str("female"),
            Metric::Male => f.write_str("male"),
            Metric::Records => f.write_str("records"),
            Metric::Schools => f.write_str("schools"),
            Metric::AveragePerSchool => f.write_str("avg-per-school"),
            Metric::FemaleMaleRatio => f.write_str("female-male-ratio"),
            Metric::Field(name) => write!(f, "field:{}", name),
        }
    }
}

/// One row of a ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedGroup {
    pub key: GroupKey,
    pub value: Option<f64>,
}

/// Rank the selected groups by `metric`, descending.
///
/// Ties break on key ascending; not-applicable values sort after every
/// defined value. At most `top_n` rows are returned.
pub fn rank_groups(
    index: &GroupIndex,
    selection: &[GroupKey],
    metric: &Metric,
    top_n: usize,
) -> Vec<RankedGroup> {
    let mut ranked: Vec<RankedGroup> = resolve_selection(index, selection)
        .map(|aggregate| RankedGroup {
            key: aggregate.key.clone(),
            value: metric.value(&summarize_group(aggregate)),
        })
        .collect();

    ranked.sort_by(|a, b| compare_desc(a.value, b.value).then_with(|| a.key.cmp(&b.key)));
    ranked.truncate(top_n);
    ranked
}

fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numeric statistics for one attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub key: String,
    pub count: usize,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Describe the numeric values of `key` across `features`.
///
/// Returns `None` when no feature carries a numeric value for the key.
pub fn describe_field<'a>(
    features: impl IntoIterator<Item = &'a Feature>,
    key: &str,
) -> Option<FieldStats> {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for n in features
        .into_iter()
        .filter_map(|feature| feature.get(key).and_then(|value| value.as_number()))
    {
        count += 1;
        sum += n;
        min = min.min(n);
        max = max.max(n);
    }

    (count > 0).then(|| FieldStats {
        key: key.to_string(),
        count,
        sum,
        min,
        max,
        mean: sum / count as f64,
    })
}
