use crate::context::ComparisonContext;
use crate::error::{validate_threshold, ConfigError};
use crate::measure::WordSimMeasure;
use serde::{Deserialize, Serialize};

/// Edit-distance measure over lower-cased terms.
///
/// Terms no longer than `min_length` only match when one contains the other
/// and the distance stays within `max_distance`. Longer terms may differ by
/// `min(max_distance, threshold * shorter_length)` edits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevenshteinMeasure {
    min_length: usize,
    max_distance: usize,
    threshold: f64,
}

impl LevenshteinMeasure {
    pub fn new(min_length: usize, max_distance: usize, threshold: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            min_length,
            max_distance,
            threshold: validate_threshold("levenshtein", threshold)?,
        })
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_distance(&self) -> usize {
        self.max_distance
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl WordSimMeasure for LevenshteinMeasure {
    fn id(&self) -> &'static str {
        "levenshtein"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        let first = ctx.first_term().to_lowercase();
        let second = ctx.second_term().to_lowercase();
        let shorter = first.chars().count().min(second.chars().count());
        let distance = strsim::levenshtein(&first, &second);

        if shorter <= self.min_length {
            return distance <= self.max_distance
                && (first.contains(second.as_str()) || second.contains(first.as_str()));
        }

        let dynamic = (self.threshold * shorter as f64).floor() as usize;
        distance <= self.max_distance.min(dynamic)
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        strsim::normalized_levenshtein(
            &ctx.first_term().to_lowercase(),
            &ctx.second_term().to_lowercase(),
        )
    }
}
