//! Noun mappings: textual evidence for a name or a type.

use crate::confidence::{AggregationFunction, Confidence};
use crate::error::LinkError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};
use tracelink_model::{Claimant, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MappingKind {
    Name,
    Type,
}

/// A set of co-referring words believed to denote a name or a type.
///
/// Every kind carries its own [`Confidence`]; independent claims about the
/// same mapping reinforce each other (`Sum` by default). Identity is the
/// reference and its words: confidences and coreferences are state, not
/// identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NounMapping {
    reference: String,
    words: BTreeSet<Word>,
    coreferences: BTreeSet<Word>,
    distribution: BTreeMap<MappingKind, Confidence>,
}

impl NounMapping {
    pub fn new(
        reference: impl Into<String>,
        words: impl IntoIterator<Item = Word>,
        kind: MappingKind,
        claimant: Claimant,
        probability: f64,
    ) -> Result<Self, LinkError> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(LinkError::InvalidArgument(
                "noun mapping reference must not be blank".to_string(),
            ));
        }
        let words: BTreeSet<Word> = words.into_iter().collect();
        if words.is_empty() {
            return Err(LinkError::InvalidArgument(format!(
                "noun mapping '{reference}' has no words"
            )));
        }

        let mut mapping = Self {
            reference,
            words,
            coreferences: BTreeSet::new(),
            distribution: [MappingKind::Name, MappingKind::Type]
                .into_iter()
                .map(|kind| (kind, Confidence::new(AggregationFunction::Sum)))
                .collect(),
        };
        mapping.add_kind_probability(kind, claimant, probability)?;
        Ok(mapping)
    }

    /// Re-aggregates both kinds with `aggregator`.
    pub fn with_aggregator(mut self, aggregator: AggregationFunction) -> Self {
        self.distribution = std::mem::take(&mut self.distribution)
            .into_iter()
            .map(|(kind, confidence)| (kind, confidence.with_aggregator(aggregator.clone())))
            .collect();
        self
    }

    pub fn with_coreference(mut self, word: Word) -> Self {
        self.add_coreference(word);
        self
    }

    pub fn add_coreference(&mut self, word: Word) {
        if !self.words.contains(&word) {
            self.coreferences.insert(word);
        }
    }

    pub fn add_kind_probability(
        &mut self,
        kind: MappingKind,
        claimant: Claimant,
        probability: f64,
    ) -> Result<(), LinkError> {
        self.distribution
            .entry(kind)
            .or_default()
            .add_claim(claimant, probability)
    }

    /// Takes over the claims and coreferences of the same mapping seen
    /// elsewhere.
    pub fn absorb(&mut self, other: &NounMapping) {
        for word in &other.coreferences {
            self.add_coreference(word.clone());
        }
        for (kind, confidence) in &other.distribution {
            self.distribution
                .entry(*kind)
                .or_insert_with(|| Confidence::new(confidence.aggregator().clone()))
                .absorb(confidence);
        }
    }

    pub fn probability_for_kind(&self, kind: MappingKind) -> f64 {
        self.distribution.get(&kind).map_or(0.0, Confidence::value)
    }

    /// The more probable kind; ties go to `Name`.
    pub fn kind(&self) -> MappingKind {
        if self.probability_for_kind(MappingKind::Name) >= self.probability_for_kind(MappingKind::Type) {
            MappingKind::Name
        } else {
            MappingKind::Type
        }
    }

    pub fn probability(&self) -> f64 {
        self.probability_for_kind(self.kind())
    }

    pub fn distribution(&self) -> &BTreeMap<MappingKind, Confidence> {
        &self.distribution
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn words(&self) -> &BTreeSet<Word> {
        &self.words
    }

    pub fn coreferences(&self) -> &BTreeSet<Word> {
        &self.coreferences
    }

    /// Direct occurrences followed by coreferences.
    pub fn occurrences(&self) -> impl Iterator<Item = &Word> {
        self.words.iter().chain(self.coreferences.iter())
    }

    pub fn surface_forms(&self) -> BTreeSet<&str> {
        self.words.iter().map(|word| word.text.as_str()).collect()
    }

    pub fn sentence_numbers(&self) -> BTreeSet<usize> {
        self.words.iter().map(|word| word.sentence_number).collect()
    }
}

impl PartialEq for NounMapping {
    fn eq(&self, other: &Self) -> bool {
        self.reference == other.reference && self.words == other.words
    }
}

impl Eq for NounMapping {}

impl Hash for NounMapping {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.reference.hash(state);
        self.words.hash(state);
    }
}
