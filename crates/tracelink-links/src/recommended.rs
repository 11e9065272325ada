//! Candidate instances inferred from text.

use crate::confidence::{AggregationFunction, Confidence};
use crate::error::LinkError;
use crate::mapping::{MappingKind, NounMapping};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracelink_model::Claimant;

/// Dedup key of a candidate: exact, case-sensitive `(name, type)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecommendedInstanceKey {
    pub name: String,
    pub instance_type: String,
}

impl fmt::Display for RecommendedInstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.instance_type)
    }
}

/// A concept the text appears to talk about, prior to matching it against
/// the model.
///
/// Name and type mappings behave as sets with stable insertion order: a
/// mapping already present absorbs the newcomer's claims instead of being
/// added twice. Equality and hashing use only the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedInstance {
    key: RecommendedInstanceKey,
    internal_confidence: Confidence,
    name_mappings: Vec<NounMapping>,
    type_mappings: Vec<NounMapping>,
}

impl RecommendedInstance {
    pub fn new(
        name: impl Into<String>,
        instance_type: impl Into<String>,
        claimant: Claimant,
        probability: f64,
    ) -> Result<Self, LinkError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(LinkError::InvalidArgument(
                "recommended instance name must not be blank".to_string(),
            ));
        }
        Ok(Self {
            key: RecommendedInstanceKey {
                name,
                instance_type: instance_type.into(),
            },
            internal_confidence: Confidence::with_claim(
                AggregationFunction::Average,
                claimant,
                probability,
            )?,
            name_mappings: Vec::new(),
            type_mappings: Vec::new(),
        })
    }

    pub fn with_name_mapping(mut self, mapping: NounMapping) -> Self {
        self.add_name(mapping);
        self
    }

    pub fn with_type_mapping(mut self, mapping: NounMapping) -> Self {
        self.add_type(mapping);
        self
    }

    /// Returns whether the mapping was new.
    pub fn add_name(&mut self, mapping: NounMapping) -> bool {
        insert_mapping(&mut self.name_mappings, mapping)
    }

    pub fn add_type(&mut self, mapping: NounMapping) -> bool {
        insert_mapping(&mut self.type_mappings, mapping)
    }

    pub fn add_mappings<'a>(
        &mut self,
        names: impl IntoIterator<Item = &'a NounMapping>,
        types: impl IntoIterator<Item = &'a NounMapping>,
    ) {
        for mapping in names {
            merge_mapping(&mut self.name_mappings, mapping);
        }
        for mapping in types {
            merge_mapping(&mut self.type_mappings, mapping);
        }
    }

    pub fn add_probability(&mut self, claimant: Claimant, probability: f64) -> Result<(), LinkError> {
        self.internal_confidence.add_claim(claimant, probability)
    }

    /// Average of the mapping evidence (root mean square of the strongest
    /// name and type mappings) and the internal confidence.
    pub fn probability(&self) -> f64 {
        let best = |mappings: &[NounMapping], kind: MappingKind| {
            mappings
                .iter()
                .map(|mapping| mapping.probability_for_kind(kind))
                .fold(0.0, f64::max)
        };
        let mapping_probability = root_mean_square(
            best(self.name_mappings.as_slice(), MappingKind::Name),
            best(self.type_mappings.as_slice(), MappingKind::Type),
        );
        AggregationFunction::Average.apply(&[mapping_probability, self.internal_confidence.value()])
    }

    pub fn sentence_numbers(&self) -> BTreeSet<usize> {
        self.name_mappings
            .iter()
            .flat_map(|mapping| mapping.sentence_numbers())
            .collect()
    }

    pub fn key(&self) -> &RecommendedInstanceKey {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    pub fn instance_type(&self) -> &str {
        &self.key.instance_type
    }

    pub fn name_mappings(&self) -> &[NounMapping] {
        &self.name_mappings
    }

    pub fn type_mappings(&self) -> &[NounMapping] {
        &self.type_mappings
    }

    pub fn internal_confidence(&self) -> &Confidence {
        &self.internal_confidence
    }

    pub fn claimants(&self) -> BTreeSet<&Claimant> {
        self.internal_confidence.claimants()
    }
}

fn insert_mapping(mappings: &mut Vec<NounMapping>, mapping: NounMapping) -> bool {
    match mappings.iter_mut().find(|existing| **existing == mapping) {
        Some(existing) => {
            existing.absorb(&mapping);
            false
        }
        None => {
            mappings.push(mapping);
            true
        }
    }
}

fn merge_mapping(mappings: &mut Vec<NounMapping>, mapping: &NounMapping) {
    match mappings.iter_mut().find(|existing| **existing == *mapping) {
        Some(existing) => existing.absorb(mapping),
        None => mappings.push(mapping.clone()),
    }
}

fn root_mean_square(a: f64, b: f64) -> f64 {
    ((a * a + b * b) / 2.0).sqrt()
}

impl PartialEq for RecommendedInstance {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for RecommendedInstance {}

impl Hash for RecommendedInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tracelink_model::Word;

    const RECOMMENDER: Claimant = Claimant::fixed("recommender");

    fn mapping(text: &str, sentence: usize, kind: MappingKind, probability: f64) -> NounMapping {
        NounMapping::new(text, [Word::new(text, sentence, 0)], kind, RECOMMENDER, probability).unwrap()
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(RecommendedInstance::new("", "Component", RECOMMENDER, 0.5).is_err());
        assert!(RecommendedInstance::new("Cache", "Component", RECOMMENDER, 1.5).is_err());
        assert!(RecommendedInstance::new("Cache", "", RECOMMENDER, 0.5).is_ok());
    }

    #[test]
    fn repeated_mapping_absorbs_new_claims() {
        let mut ri = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.5).unwrap();
        ri.add_name(mapping("cache", 1, MappingKind::Name, 0.5));
        let mut reinforced = mapping("cache", 1, MappingKind::Name, 0.5);
        reinforced.add_kind_probability(MappingKind::Name, Claimant::fixed("phrases"), 0.3).unwrap();

        assert!(!ri.add_name(reinforced.clone()));
        ri.add_mappings([&reinforced], std::iter::empty::<&NounMapping>());
        assert_eq!(ri.name_mappings().len(), 1);
        assert_relative_eq!(ri.name_mappings()[0].probability_for_kind(MappingKind::Name), 0.8);
    }

    #[test]
    fn mappings_are_sets_by_value() {
        let mut ri = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.5).unwrap();
        assert!(ri.add_name(mapping("cache", 1, MappingKind::Name, 0.5)));
        assert!(!ri.add_name(mapping("cache", 1, MappingKind::Name, 0.5)));
        assert!(ri.add_name(mapping("cache", 2, MappingKind::Name, 0.5)));
        ri.add_mappings(
            [&mapping("cache", 1, MappingKind::Name, 0.5)],
            [&mapping("component", 1, MappingKind::Type, 0.5)],
        );
        assert_eq!(ri.name_mappings().len(), 2);
        assert_eq!(ri.type_mappings().len(), 1);
        assert_eq!(ri.name_mappings()[0].sentence_numbers().first(), Some(&1));
    }

    #[test]
    fn probability_combines_mappings_and_internal_confidence() {
        let ri = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.4)
            .unwrap()
            .with_name_mapping(mapping("cache", 1, MappingKind::Name, 0.2))
            .with_name_mapping(mapping("caches", 2, MappingKind::Name, 0.8))
            .with_type_mapping(mapping("component", 1, MappingKind::Type, 0.2));
        let rms = ((0.8f64 * 0.8 + 0.2 * 0.2) / 2.0).sqrt();
        assert_relative_eq!(ri.probability(), (rms + 0.4) / 2.0);
    }

    #[test]
    fn probability_without_mappings_halves_internal_confidence() {
        let ri = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.8).unwrap();
        assert_relative_eq!(ri.probability(), 0.4);
    }

    #[test]
    fn equality_uses_name_and_type_only() {
        let a = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.4).unwrap();
        let b = RecommendedInstance::new("Cache", "Component", Claimant::fixed("other"), 0.9)
            .unwrap()
            .with_name_mapping(mapping("cache", 1, MappingKind::Name, 0.2));
        let c = RecommendedInstance::new("cache", "Component", RECOMMENDER, 0.4).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn sentence_numbers_are_sorted_and_unique() {
        let ri = RecommendedInstance::new("Cache", "Component", RECOMMENDER, 0.4)
            .unwrap()
            .with_name_mapping(mapping("cache", 7, MappingKind::Name, 0.2))
            .with_name_mapping(mapping("caches", 2, MappingKind::Name, 0.8))
            .with_name_mapping(mapping("Cache", 7, MappingKind::Name, 0.8))
            .with_type_mapping(mapping("component", 9, MappingKind::Type, 0.2));
        assert_eq!(ri.sentence_numbers().into_iter().collect::<Vec<_>>(), vec![2, 7]);
    }
}
