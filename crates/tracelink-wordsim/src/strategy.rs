//! How the answers of several measures are combined.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Combines per-measure yes/no decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComparisonStrategy {
    #[default]
    AtLeastOne,
    Majority,
    Consensus,
}

impl ComparisonStrategy {
    /// `decisions` is consumed lazily; `AtLeastOne` stops at the first
    /// acceptance and `Consensus` at the first rejection. No measures means
    /// not similar.
    pub fn decide(&self, total: usize, mut decisions: impl Iterator<Item = bool>) -> bool {
        if total == 0 {
            return false;
        }
        match self {
            Self::AtLeastOne => decisions.any(|accepted| accepted),
            Self::Consensus => decisions.all(|accepted| accepted),
            Self::Majority => decisions.filter(|accepted| *accepted).count() * 2 > total,
        }
    }
}

impl FromStr for ComparisonStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AT_LEAST_ONE" => Ok(Self::AtLeastOne),
            "MAJORITY" => Ok(Self::Majority),
            "CONSENSUS" => Ok(Self::Consensus),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Combines per-measure scores. NaN scores are ignored; with nothing left
/// the result is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SimilarityStrategy {
    #[default]
    Average,
    Maximum,
    Minimum,
}

impl SimilarityStrategy {
    pub fn combine(&self, scores: impl IntoIterator<Item = f64>) -> f64 {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut max = f64::NEG_INFINITY;
        let mut min = f64::INFINITY;
        for score in scores.into_iter().filter(|s| !s.is_nan()) {
            count += 1;
            sum += score;
            max = max.max(score);
            min = min.min(score);
        }
        if count == 0 {
            return 0.0;
        }
        match self {
            Self::Average => sum / count as f64,
            Self::Maximum => max,
            Self::Minimum => min,
        }
    }
}

impl FromStr for SimilarityStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVERAGE" => Ok(Self::Average),
            "MAXIMUM" | "MAX" => Ok(Self::Maximum),
            "MINIMUM" | "MIN" => Ok(Self::Minimum),
            _ => Err(ConfigError::UnknownStrategy(s.to_string())),
        }
    }
}
