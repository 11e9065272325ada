//! Comparison statistics.
//!
//! A [`ComparisonStats`] collector is created by the pipeline run and handed
//! to the [`crate::SimilarityEngine`] that should report into it. Nothing is
//! global, so parallel runs and tests never see each other's records.

use crate::word_pair::WordPair;
use ahash::AHashSet;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureResult {
    pub measure: &'static str,
    pub accepted: bool,
    /// NaN when the measure has no graded answer.
    pub score: f64,
}

/// One engine decision with the measure results that led to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub results: Vec<MeasureResult>,
    pub accepted: bool,
}

impl Comparison {
    pub fn word_pair(&self) -> WordPair {
        WordPair::new(self.first.clone(), self.second.clone())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MeasureSummary {
    pub accepted: usize,
    pub denied: usize,
}

#[derive(Debug, Default)]
pub struct ComparisonStats {
    comparisons: Mutex<Vec<Comparison>>,
}

impl ComparisonStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, comparison: Comparison) {
        self.comparisons.lock().push(comparison);
    }

    pub fn len(&self) -> usize {
        self.comparisons.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparisons.lock().is_empty()
    }

    /// Snapshot of every recorded comparison, in recording order.
    pub fn comparisons(&self) -> Vec<Comparison> {
        self.comparisons.lock().clone()
    }

    /// First comparison per word pair; `(a, b)` and `(b, a)` count once.
    pub fn unique_comparisons(&self) -> Vec<Comparison> {
        let mut seen = AHashSet::new();
        self.comparisons
            .lock()
            .iter()
            .filter(|c| seen.insert(c.word_pair()))
            .cloned()
            .collect()
    }

    /// Accept/deny counts per measure over the unique comparisons.
    pub fn summaries(&self) -> BTreeMap<&'static str, MeasureSummary> {
        let mut summaries: BTreeMap<&'static str, MeasureSummary> = BTreeMap::new();
        for comparison in self.unique_comparisons() {
            for result in &comparison.results {
                let summary = summaries.entry(result.measure).or_default();
                if result.accepted {
                    summary.accepted += 1;
                } else {
                    summary.denied += 1;
                }
            }
        }
        summaries
    }

    pub fn clear(&self) {
        self.comparisons.lock().clear();
    }
}
