//! The resolver state: a deduplicating store of instance links.
//!
//! ```text
//! add_to_link(ri, mi, claimant, p)
//!        │
//!        ▼
//!   key = (ri.name, ri.type, mi.id)
//!        │
//!   ┌────┴──────────┐
//!   │ unseen        │ seen
//!   ▼               ▼
//! push link      add claim (aggregated, Max by default)
//! → true         union name/type mappings → false
//! ```
//!
//! Links are kept in insertion order, so the same sequence of calls always
//! produces the same state.

use crate::confidence::AggregationFunction;
use crate::error::{validate_probability, LinkError};
use crate::link::{InstanceLink, LinkKey, TraceLink, WordTraceLink};
use crate::recommended::RecommendedInstance;
use ahash::AHashMap;
use std::collections::BTreeSet;
use tracelink_model::{Claimant, ModelInstance};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ConnectionState {
    links: Vec<InstanceLink>,
    index: AHashMap<LinkKey, usize>,
    aggregator: AggregationFunction,
}

impl ConnectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregation for repeated claims on newly created links.
    pub fn with_aggregator(mut self, aggregator: AggregationFunction) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn aggregator(&self) -> &AggregationFunction {
        &self.aggregator
    }

    /// Records a claim that `recommended` denotes `model_instance`. Returns
    /// `true` when a new link was created and `false` when an existing one
    /// absorbed the claim.
    pub fn add_to_link(
        &mut self,
        recommended: &RecommendedInstance,
        model_instance: &ModelInstance,
        claimant: Claimant,
        probability: f64,
    ) -> Result<bool, LinkError> {
        let probability = validate_probability(probability)?;
        let key = LinkKey {
            recommended: recommended.key().clone(),
            model_instance_id: model_instance.id().to_string(),
        };

        if let Some(&position) = self.index.get(&key) {
            let link = &mut self.links[position];
            link.merge_claim(recommended, claimant, probability)?;
            debug!(link = %key, probability = link.probability(), "merged claim into link");
            return Ok(false);
        }

        let link = InstanceLink::with_aggregator(
            recommended.clone(),
            model_instance.clone(),
            claimant,
            probability,
            self.aggregator.clone(),
        )?;
        debug!(link = %key, probability, "created link");
        self.index.insert(key, self.links.len());
        self.links.push(link);
        Ok(true)
    }

    pub fn links(&self) -> &[InstanceLink] {
        &self.links
    }

    pub fn iter(&self) -> impl Iterator<Item = &InstanceLink> {
        self.links.iter()
    }

    pub fn get(&self, key: &LinkKey) -> Option<&InstanceLink> {
        self.index.get(key).map(|&position| &self.links[position])
    }

    pub fn contains(&self, key: &LinkKey) -> bool {
        self.index.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Links whose model element has `name` among its name parts.
    pub fn links_by_name(&self, name: &str) -> Vec<&InstanceLink> {
        self.filter(|link| link.model_instance().name_parts().contains(&name))
    }

    pub fn links_by_type(&self, instance_type: &str) -> Vec<&InstanceLink> {
        self.filter(|link| link.model_instance().instance_type() == instance_type)
    }

    pub fn links_by_recommended_instance(&self, recommended: &RecommendedInstance) -> Vec<&InstanceLink> {
        self.filter(|link| link.recommended_instance() == recommended)
    }

    /// Name part and type part must both match.
    pub fn links_with(&self, name: &str, instance_type: &str) -> Vec<&InstanceLink> {
        self.filter(|link| {
            let model = link.model_instance();
            model.name_parts().contains(&name) && model.type_parts().contains(&instance_type)
        })
    }

    fn filter(&self, predicate: impl Fn(&InstanceLink) -> bool) -> Vec<&InstanceLink> {
        self.links.iter().filter(|link| predicate(link)).collect()
    }

    pub fn remove_link(&mut self, key: &LinkKey) -> Option<InstanceLink> {
        let position = self.index.remove(key)?;
        let removed = self.links.remove(position);
        self.reindex();
        Some(removed)
    }

    /// Returns how many links were removed.
    pub fn remove_all_with_model_instance(&mut self, model_instance: &ModelInstance) -> usize {
        self.remove_where(|link| link.model_instance() == model_instance)
    }

    pub fn remove_all_with_recommended_instance(&mut self, recommended: &RecommendedInstance) -> usize {
        self.remove_where(|link| link.recommended_instance() == recommended)
    }

    fn remove_where(&mut self, predicate: impl Fn(&InstanceLink) -> bool) -> usize {
        let before = self.links.len();
        self.links.retain(|link| !predicate(link));
        let removed = before - self.links.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }

    fn reindex(&mut self) {
        self.index = self
            .links
            .iter()
            .enumerate()
            .map(|(position, link)| (link.key(), position))
            .collect();
    }

    /// Every `(link, word)` pair, coreferences included, without duplicates.
    pub fn word_trace_links(&self) -> BTreeSet<WordTraceLink> {
        self.links.iter().flat_map(|link| link.word_trace_links()).collect()
    }

    /// Unique `(model instance id, sentence number)` pairs.
    pub fn trace_links(&self) -> BTreeSet<TraceLink> {
        self.links
            .iter()
            .flat_map(|link| link.word_trace_links())
            .map(|trace| trace.trace_link())
            .collect()
    }
}
