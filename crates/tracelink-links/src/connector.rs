//! Connects recommended instances to model instances.
//!
//! ```text
//! RecommendedInstance × ModelInstance
//!        │ name similar?   (full name, or a model name part for one-word names)
//!        │ type similar?   (full type or a type part)
//!        ▼
//! name + type ─► name_type_probability
//! name only   ─► name_probability
//!        ▼
//! ConnectionState::add_to_link
//! ```
//!
//! Similarity decisions are read-only and may run in parallel; applying them
//! to the state always happens sequentially in input order.

use crate::error::{validate_probability, LinkError};
use crate::recommended::RecommendedInstance;
use crate::shared::SharedConnectionState;
use crate::state::ConnectionState;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracelink_model::{Claimant, ModelInstance};
use tracelink_wordsim::SimilarityEngine;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Probability of a link whose name and type both match.
    pub name_type_probability: f64,
    /// Probability of a link whose name matches but type does not.
    pub name_probability: f64,
    /// Candidates below this probability are not connected.
    pub min_recommendation_probability: f64,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            name_type_probability: 1.0,
            name_probability: 0.8,
            min_recommendation_probability: 0.0,
        }
    }
}

impl ConnectorConfig {
    pub fn validate(&self) -> Result<(), LinkError> {
        validate_probability(self.name_type_probability)?;
        validate_probability(self.name_probability)?;
        validate_probability(self.min_recommendation_probability)?;
        Ok(())
    }
}

/// One accepted pairing, by input position.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    recommended: usize,
    model: usize,
    probability: f64,
}

#[derive(Debug)]
pub struct InstanceConnector {
    engine: Arc<SimilarityEngine>,
    claimant: Claimant,
    config: ConnectorConfig,
}

impl InstanceConnector {
    pub const CLAIMANT: Claimant = Claimant::fixed("InstanceConnector");

    pub fn new(engine: Arc<SimilarityEngine>, config: ConnectorConfig) -> Result<Self, LinkError> {
        config.validate()?;
        Ok(Self {
            engine,
            claimant: Self::CLAIMANT,
            config,
        })
    }

    pub fn with_claimant(mut self, claimant: Claimant) -> Self {
        self.claimant = claimant;
        self
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    pub fn claimant(&self) -> &Claimant {
        &self.claimant
    }

    /// The probability to claim for the pair, if it should be linked at all.
    pub fn decide(&self, recommended: &RecommendedInstance, model: &ModelInstance) -> Option<f64> {
        if !self.names_similar(recommended.name(), model) {
            return None;
        }
        if self.types_similar(recommended.instance_type(), model) {
            Some(self.config.name_type_probability)
        } else {
            Some(self.config.name_probability)
        }
    }

    fn names_similar(&self, name: &str, model: &ModelInstance) -> bool {
        if self.engine.are_strings_similar(name, model.name()) {
            return true;
        }
        let single_word = name.split_whitespace().nth(1).is_none();
        single_word
            && model
                .name_parts()
                .iter()
                .any(|part| self.engine.are_strings_similar(name, part))
    }

    fn types_similar(&self, instance_type: &str, model: &ModelInstance) -> bool {
        if instance_type.trim().is_empty() {
            return false;
        }
        self.engine.are_strings_similar(instance_type, model.instance_type())
            || model
                .type_parts()
                .iter()
                .any(|part| self.engine.are_strings_similar(instance_type, part))
    }

    fn eligible(&self, recommended: &RecommendedInstance) -> bool {
        recommended.probability() >= self.config.min_recommendation_probability
    }

    fn proposals_for(
        &self,
        index: usize,
        recommended: &RecommendedInstance,
        models: &[ModelInstance],
    ) -> Vec<Proposal> {
        if !self.eligible(recommended) {
            debug!(candidate = %recommended.key(), "below minimum recommendation probability");
            return Vec::new();
        }
        models
            .iter()
            .enumerate()
            .filter_map(|(model, mi)| {
                self.decide(recommended, mi).map(|probability| Proposal {
                    recommended: index,
                    model,
                    probability,
                })
            })
            .collect()
    }

    /// Links every similar pair; returns how many links were created.
    pub fn connect(
        &self,
        recommended: &[RecommendedInstance],
        models: &[ModelInstance],
        state: &mut ConnectionState,
    ) -> Result<usize, LinkError> {
        let proposals: Vec<Proposal> = recommended
            .iter()
            .enumerate()
            .flat_map(|(index, ri)| self.proposals_for(index, ri, models))
            .collect();
        self.apply(&proposals, recommended, models, state)
    }

    /// Same result as [`connect`](Self::connect), with the similarity
    /// decisions computed in parallel and applied under one write lock.
    pub fn connect_parallel(
        &self,
        recommended: &[RecommendedInstance],
        models: &[ModelInstance],
        state: &SharedConnectionState,
    ) -> Result<usize, LinkError> {
        let proposals: Vec<Proposal> = recommended
            .par_iter()
            .enumerate()
            .flat_map_iter(|(index, ri)| self.proposals_for(index, ri, models))
            .collect();
        state.write(|state| self.apply(&proposals, recommended, models, state))
    }

    fn apply(
        &self,
        proposals: &[Proposal],
        recommended: &[RecommendedInstance],
        models: &[ModelInstance],
        state: &mut ConnectionState,
    ) -> Result<usize, LinkError> {
        let mut created = 0;
        for proposal in proposals {
            if state.add_to_link(
                &recommended[proposal.recommended],
                &models[proposal.model],
                self.claimant.clone(),
                proposal.probability,
            )? {
                created += 1;
            }
        }
        info!(
            proposals = proposals.len(),
            created,
            links = state.len(),
            "connected recommended instances"
        );
        Ok(created)
    }
}
