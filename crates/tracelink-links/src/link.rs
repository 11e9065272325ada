//! Instance links and the trace links derived from them.

use crate::confidence::{AggregationFunction, Confidence};
use crate::error::LinkError;
use crate::recommended::{RecommendedInstance, RecommendedInstanceKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use tracelink_model::{Claimant, ModelInstance, Word};

/// Dedup key of an instance link: the candidate key plus the model id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkKey {
    pub recommended: RecommendedInstanceKey,
    pub model_instance_id: String,
}

impl fmt::Display for LinkKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.recommended, self.model_instance_id)
    }
}

/// The bit-relevant output: one model element mentioned in one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TraceLink {
    pub model_instance_id: String,
    pub sentence_number: usize,
}

/// A trace link that still knows the link and the word it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordTraceLink {
    pub link: LinkKey,
    pub word: Word,
}

impl WordTraceLink {
    pub fn trace_link(&self) -> TraceLink {
        TraceLink {
            model_instance_id: self.link.model_instance_id.clone(),
            sentence_number: self.word.sentence_number,
        }
    }
}

/// A candidate matched to a model element, with a confidence.
///
/// Identity is the [`LinkKey`]; the confidence and the candidate's mappings
/// change as further claims arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstanceLink {
    recommended: RecommendedInstance,
    model_instance: ModelInstance,
    confidence: Confidence,
}

impl InstanceLink {
    /// A link aggregated with `Max`.
    pub fn new(
        recommended: RecommendedInstance,
        model_instance: ModelInstance,
        claimant: Claimant,
        probability: f64,
    ) -> Result<Self, LinkError> {
        Self::with_aggregator(
            recommended,
            model_instance,
            claimant,
            probability,
            AggregationFunction::Max,
        )
    }

    pub fn with_aggregator(
        recommended: RecommendedInstance,
        model_instance: ModelInstance,
        claimant: Claimant,
        probability: f64,
        aggregator: AggregationFunction,
    ) -> Result<Self, LinkError> {
        Ok(Self {
            recommended,
            model_instance,
            confidence: Confidence::with_claim(aggregator, claimant, probability)?,
        })
    }

    pub fn key(&self) -> LinkKey {
        LinkKey {
            recommended: self.recommended.key().clone(),
            model_instance_id: self.model_instance.id().to_string(),
        }
    }

    /// Folds a repeated claim for the same pair into this link.
    pub fn merge_claim(
        &mut self,
        recommended: &RecommendedInstance,
        claimant: Claimant,
        probability: f64,
    ) -> Result<(), LinkError> {
        self.confidence.add_claim(claimant, probability)?;
        self.recommended
            .add_mappings(recommended.name_mappings(), recommended.type_mappings());
        Ok(())
    }

    pub fn recommended_instance(&self) -> &RecommendedInstance {
        &self.recommended
    }

    pub fn model_instance(&self) -> &ModelInstance {
        &self.model_instance
    }

    pub fn confidence(&self) -> &Confidence {
        &self.confidence
    }

    pub fn probability(&self) -> f64 {
        self.confidence.value()
    }

    /// One entry per word occurrence (coreferences included) of every name
    /// mapping.
    pub fn word_trace_links(&self) -> impl Iterator<Item = WordTraceLink> + '_ {
        let key = self.key();
        self.recommended
            .name_mappings()
            .iter()
            .flat_map(|mapping| mapping.occurrences())
            .map(move |word| WordTraceLink {
                link: key.clone(),
                word: word.clone(),
            })
    }
}

impl PartialEq for InstanceLink {
    fn eq(&self, other: &Self) -> bool {
        self.recommended == other.recommended && self.model_instance == other.model_instance
    }
}

impl Eq for InstanceLink {}

impl Hash for InstanceLink {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.recommended.hash(state);
        self.model_instance.hash(state);
    }
}

impl fmt::Display for InstanceLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InstanceLink[{} as {} ({}), found {}:{}, probability={:.3}, sentences={:?}]",
            self.model_instance.id(),
            self.model_instance.name(),
            self.model_instance.instance_type(),
            self.recommended.name(),
            self.recommended.instance_type(),
            self.probability(),
            self.recommended.sentence_numbers(),
        )
    }
}
