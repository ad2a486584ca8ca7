use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::SeqCategory;

/// One parsed row of a BLAST hit report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitRecord {
    /// Subject identifier exactly as it appeared in the report
    pub composite_id: String,

    /// Catalog sample the subject came from (e.g. `HOT234_1_0200m`)
    pub sample_name: String,

    /// Identifier used to look the record up in the sample's reference file
    pub sequence_id: String,
}

/// Matched sequence ids grouped by the sample they came from.
///
/// Both levels are sorted, so iterating an aggregation visits samples
/// and ids in a deterministic order. Duplicate hits collapse to one id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitAggregation {
    samples: BTreeMap<String, BTreeSet<String>>,

    /// Number of report rows folded into this aggregation
    #[serde(default)]
    rows: usize,
}

impl HitAggregation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed hit. Returns `true` if the id was not already present.
    pub fn insert(&mut self, hit: HitRecord) -> bool {
        self.rows += 1;
        self.samples
            .entry(hit.sample_name)
            .or_default()
            .insert(hit.sequence_id)
    }

    /// Fold another aggregation into this one
    pub fn merge(&mut self, other: HitAggregation) {
        self.rows += other.rows;
        for (sample, ids) in other.samples {
            self.samples.entry(sample).or_default().extend(ids);
        }
    }

    #[must_use]
    pub fn get(&self, sample: &str) -> Option<&BTreeSet<String>> {
        self.samples.get(sample)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.samples.iter()
    }

    pub fn sample_names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    /// Number of distinct samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of distinct (sample, id) pairs
    #[must_use]
    pub fn total_ids(&self) -> usize {
        self.samples.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.samples
    }
}

impl<'a> IntoIterator for &'a HitAggregation {
    type Item = (&'a String, &'a BTreeSet<String>);
    type IntoIter = std::collections::btree_map::Iter<'a, String, BTreeSet<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}

/// Hit aggregations for a whole BLAST output directory, one per category
pub type CategoryHits = BTreeMap<SeqCategory, HitAggregation>;
