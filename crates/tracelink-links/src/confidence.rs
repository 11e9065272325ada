//! Confidence: probabilities claimed by pipeline steps, and how they combine.
//!
//! ```text
//! claims (raw, in order)          (c1, 0.4) (c2, 0.7) (c1, 0.6)
//!        │ group by claimant, MAX        │
//!        ▼                               ▼
//! per-claimant values              c1: 0.6   c2: 0.7
//!        │ global aggregator             │
//!        ▼                               ▼
//! value()                          Max → 0.7, Average → 0.65, ...
//! ```
//!
//! `RollingAverage` and `Replace` skip the grouping and look at the raw
//! sequence, since both depend on claim order.

use crate::error::{validate_probability, LinkError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use tracelink_model::Claimant;

// ============================================================================
// Aggregation functions
// ============================================================================

type AggregateFn = dyn Fn(&[f64]) -> f64 + Send + Sync;

/// A caller-supplied aggregation. Equality is by name.
#[derive(Clone)]
pub struct CustomAggregation {
    name: String,
    function: Arc<AggregateFn>,
}

impl CustomAggregation {
    pub fn new(
        name: impl Into<String>,
        function: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            function: Arc::new(function),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for CustomAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAggregation")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomAggregation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AggregationFunction {
    #[default]
    Max,
    Min,
    Average,
    Median,
    /// Sum clipped to 1.
    Sum,
    /// Halves towards each new value: `avg = (avg + next) / 2`.
    RollingAverage,
    /// `1 - Π(1 - p)`: independent signals reinforcing each other.
    NoisyOr,
    /// The latest claim wins.
    Replace,
    #[serde(skip)]
    Custom(CustomAggregation),
}

impl AggregationFunction {
    pub fn custom(
        name: impl Into<String>,
        function: impl Fn(&[f64]) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::Custom(CustomAggregation::new(name, function))
    }

    /// Empty input aggregates to 0.
    pub fn apply(&self, values: &[f64]) -> f64 {
        let Some((first, rest)) = values.split_first() else {
            return 0.0;
        };
        match self {
            Self::Max => rest.iter().copied().fold(*first, f64::max),
            Self::Min => rest.iter().copied().fold(*first, f64::min),
            Self::Average => values.iter().sum::<f64>() / values.len() as f64,
            Self::Median => {
                let mut sorted = values.to_vec();
                sorted.sort_by(f64::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) / 2.0
                } else {
                    sorted[mid]
                }
            }
            Self::Sum => values.iter().sum::<f64>().min(1.0),
            Self::RollingAverage => rest.iter().fold(*first, |avg, value| (avg + value) / 2.0),
            Self::NoisyOr => 1.0 - values.iter().map(|p| 1.0 - p).product::<f64>(),
            Self::Replace => values.last().copied().unwrap_or(*first),
            Self::Custom(custom) => (custom.function)(values),
        }
    }

    fn uses_raw_sequence(&self) -> bool {
        matches!(self, Self::RollingAverage | Self::Replace)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Max => "MAX",
            Self::Min => "MIN",
            Self::Average => "AVERAGE",
            Self::Median => "MEDIAN",
            Self::Sum => "SUM",
            Self::RollingAverage => "ROLLING_AVERAGE",
            Self::NoisyOr => "NOISY_OR",
            Self::Replace => "REPLACE",
            Self::Custom(custom) => custom.name(),
        }
    }
}

impl fmt::Display for AggregationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Confidence
// ============================================================================

/// One probability asserted by one claimant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claimant: Claimant,
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Confidence {
    aggregator: AggregationFunction,
    claims: Vec<Claim>,
}

impl Confidence {
    pub fn new(aggregator: AggregationFunction) -> Self {
        Self {
            aggregator,
            claims: Vec::new(),
        }
    }

    /// A confidence seeded with one claim.
    pub fn with_claim(
        aggregator: AggregationFunction,
        claimant: Claimant,
        probability: f64,
    ) -> Result<Self, LinkError> {
        let mut confidence = Self::new(aggregator);
        confidence.add_claim(claimant, probability)?;
        Ok(confidence)
    }

    /// Same claims, different aggregation.
    pub fn with_aggregator(mut self, aggregator: AggregationFunction) -> Self {
        self.aggregator = aggregator;
        self
    }

    /// Records a claim. Unless the aggregator reads the raw sequence, a claim
    /// identical to one already recorded is dropped: it cannot change the
    /// value.
    pub fn add_claim(&mut self, claimant: Claimant, probability: f64) -> Result<(), LinkError> {
        let probability = validate_probability(probability)?;
        let claim = Claim {
            claimant,
            probability,
        };
        if self.aggregator.uses_raw_sequence() || !self.claims.contains(&claim) {
            self.claims.push(claim);
        }
        Ok(())
    }

    /// Appends the claims of `other` that are not recorded yet. Absorbing the
    /// same confidence twice changes nothing.
    pub fn absorb(&mut self, other: &Confidence) {
        for claim in &other.claims {
            if !self.claims.contains(claim) {
                self.claims.push(claim.clone());
            }
        }
    }

    /// Drops every claim of `claimant`; returns whether any existed.
    pub fn remove_claimant(&mut self, claimant: &Claimant) -> bool {
        let before = self.claims.len();
        self.claims.retain(|claim| &claim.claimant != claimant);
        self.claims.len() != before
    }

    pub fn value(&self) -> f64 {
        if self.claims.is_empty() {
            return 0.0;
        }
        if self.aggregator.uses_raw_sequence() {
            let raw: Vec<f64> = self.claims.iter().map(|claim| claim.probability).collect();
            return self.aggregator.apply(&raw);
        }
        self.aggregator.apply(&self.per_claimant())
    }

    /// Highest probability of each claimant, in order of first claim.
    fn per_claimant(&self) -> Vec<f64> {
        let mut grouped: Vec<(&Claimant, f64)> = Vec::new();
        for claim in &self.claims {
            match grouped.iter_mut().find(|(claimant, _)| *claimant == &claim.claimant) {
                Some((_, best)) => *best = best.max(claim.probability),
                None => grouped.push((&claim.claimant, claim.probability)),
            }
        }
        grouped.into_iter().map(|(_, value)| value).collect()
    }

    /// Combines two confidences claim by claim. A claimant present in both
    /// gets `local` applied to its first claim on each side; the result
    /// aggregates with `global`.
    pub fn merge(
        a: &Confidence,
        b: &Confidence,
        global: AggregationFunction,
        local: &AggregationFunction,
    ) -> Confidence {
        let mut result = Confidence::new(global);
        for claim in &a.claims {
            let probability = match b.claims.iter().find(|other| other.claimant == claim.claimant) {
                Some(other) => local.apply(&[claim.probability, other.probability]),
                None => claim.probability,
            };
            result.claims.push(Claim {
                claimant: claim.claimant.clone(),
                probability,
            });
        }
        for claim in &b.claims {
            if !a.claims.iter().any(|other| other.claimant == claim.claimant) {
                result.claims.push(claim.clone());
            }
        }
        result
    }

    pub fn aggregator(&self) -> &AggregationFunction {
        &self.aggregator
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn claimants(&self) -> BTreeSet<&Claimant> {
        self.claims.iter().map(|claim| &claim.claimant).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Confidence{{{}=>{}}}", self.aggregator, self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const A: Claimant = Claimant::fixed("a");
    const B: Claimant = Claimant::fixed("b");

    fn confidence(aggregator: AggregationFunction, claims: &[(Claimant, f64)]) -> Confidence {
        let mut confidence = Confidence::new(aggregator);
        for (claimant, probability) in claims {
            confidence.add_claim(claimant.clone(), *probability).unwrap();
        }
        confidence
    }

    #[test]
    fn empty_confidence_is_zero() {
        assert_eq!(Confidence::new(AggregationFunction::Max).value(), 0.0);
        assert_eq!(AggregationFunction::Average.apply(&[]), 0.0);
    }

    #[test]
    fn builtin_functions() {
        let values = [0.2, 0.8, 0.5, 0.4];
        assert_eq!(AggregationFunction::Max.apply(&values), 0.8);
        assert_eq!(AggregationFunction::Min.apply(&values), 0.2);
        assert_relative_eq!(AggregationFunction::Average.apply(&values), 0.475);
        assert_relative_eq!(AggregationFunction::Median.apply(&values), 0.45);
        assert_relative_eq!(AggregationFunction::Median.apply(&[0.9, 0.1, 0.3]), 0.3);
        assert_eq!(AggregationFunction::Sum.apply(&values), 1.0);
        assert_relative_eq!(AggregationFunction::Sum.apply(&[0.2, 0.3]), 0.5);
        assert_relative_eq!(AggregationFunction::RollingAverage.apply(&[0.2, 0.6, 1.0]), 0.7);
        assert_relative_eq!(AggregationFunction::NoisyOr.apply(&[0.5, 0.5]), 0.75);
        assert_eq!(AggregationFunction::Replace.apply(&values), 0.4);
    }

    #[test]
    fn claims_group_by_claimant_with_max() {
        let c = confidence(AggregationFunction::Average, &[(A, 0.4), (B, 0.7), (A, 0.6)]);
        assert_relative_eq!(c.value(), 0.65);
        assert_eq!(c.claimants().len(), 2);
    }

    #[test]
    fn raw_sequence_functions_see_every_claim() {
        let c = confidence(AggregationFunction::Replace, &[(A, 0.9), (B, 0.3), (A, 0.5)]);
        assert_eq!(c.value(), 0.5);
        let c = confidence(AggregationFunction::RollingAverage, &[(A, 0.2), (A, 0.6)]);
        assert_relative_eq!(c.value(), 0.4);
    }

    #[test]
    fn identical_claims_collapse_unless_order_matters() {
        let mut c = Confidence::new(AggregationFunction::Max);
        for _ in 0..100 {
            c.add_claim(A, 0.7).unwrap();
        }
        c.add_claim(B, 0.7).unwrap();
        c.add_claim(A, 0.7).unwrap();
        assert_eq!(c.claims().len(), 2);
        assert_eq!(c.value(), 0.7);

        let rolling = confidence(AggregationFunction::RollingAverage, &[(A, 0.2), (A, 0.2), (A, 1.0), (A, 0.2)]);
        assert_eq!(rolling.claims().len(), 4);
        assert_relative_eq!(rolling.value(), 0.4);
    }

    #[test]
    fn absorb_adds_only_unseen_claims() {
        let mut a = confidence(AggregationFunction::Sum, &[(A, 0.5)]);
        let b = confidence(AggregationFunction::Sum, &[(A, 0.5), (B, 0.2)]);
        a.absorb(&b);
        a.absorb(&b);
        assert_eq!(a.claims().len(), 2);
        assert_relative_eq!(a.value(), 0.7);
    }

    #[test]
    fn invalid_probabilities_are_rejected() {
        let mut c = Confidence::new(AggregationFunction::Max);
        assert!(c.add_claim(A, 1.2).is_err());
        assert!(c.add_claim(A, f64::NAN).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn remove_claimant_drops_all_its_claims() {
        let mut c = confidence(AggregationFunction::Max, &[(A, 0.9), (B, 0.3), (A, 0.5)]);
        assert!(c.remove_claimant(&A));
        assert!(!c.remove_claimant(&A));
        assert_eq!(c.value(), 0.3);
    }

    #[test]
    fn merge_applies_local_function_to_shared_claimants() {
        let a = confidence(AggregationFunction::Max, &[(A, 0.4), (B, 0.2)]);
        let c = Claimant::fixed("c");
        let b = confidence(AggregationFunction::Max, &[(A, 0.8), (c.clone(), 0.6)]);
        let merged = Confidence::merge(&a, &b, AggregationFunction::Average, &AggregationFunction::Average);

        let claims: Vec<_> = merged.claims().iter().map(|cl| (cl.claimant.clone(), cl.probability)).collect();
        assert_eq!(claims.len(), 3);
        assert_eq!(claims[0].0, A);
        assert_relative_eq!(claims[0].1, 0.6);
        assert_eq!(claims[1], (B, 0.2));
        assert_eq!(claims[2], (c, 0.6));
        assert_relative_eq!(merged.value(), (0.6 + 0.2 + 0.6) / 3.0);
    }

    #[test]
    fn custom_aggregation() {
        let product = AggregationFunction::custom("PRODUCT", |values| values.iter().product());
        let c = confidence(product.clone(), &[(A, 0.5), (B, 0.5)]);
        assert_relative_eq!(c.value(), 0.25);
        assert_eq!(product.to_string(), "PRODUCT");
        assert_eq!(product, AggregationFunction::custom("PRODUCT", |_| 0.0));
    }

    #[test]
    fn builtin_functions_serialize_by_name() {
        let json = serde_json::to_string(&AggregationFunction::NoisyOr).unwrap();
        assert_eq!(json, "\"NOISY_OR\"");
        let parsed: AggregationFunction = serde_json::from_str("\"ROLLING_AVERAGE\"").unwrap();
        assert_eq!(parsed, AggregationFunction::RollingAverage);
        assert!(serde_json::to_string(&AggregationFunction::custom("X", |_| 0.0)).is_err());
    }
}
