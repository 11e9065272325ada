//! The similarity engine: an ordered measure list plus strategies.
//!
//! ```text
//! ComparisonContext ─► split-length test ─► measures ─► ComparisonStrategy ─► bool
//!                                              │
//!                                              └─► ComparisonStats (optional)
//! ```
//!
//! The engine is read-only after construction and can be shared across
//! threads; [`SimilarityEngine::compare_batch`] uses that to evaluate
//! independent contexts in parallel.

use crate::character::CharacterMatch;
use crate::config::WordSimConfig;
use crate::context::ComparisonContext;
use crate::error::WordSimError;
use crate::measure::{SimilarityMeasure, WordSimMeasure};
use crate::measures::EqualityMeasure;
use crate::registry::MeasureRegistry;
use crate::stats::{Comparison, ComparisonStats, MeasureResult};
use crate::strategy::{ComparisonStrategy, SimilarityStrategy};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::trace;

#[derive(Debug, Default)]
pub struct SimilarityEngine {
    measures: Vec<SimilarityMeasure>,
    comparison_strategy: ComparisonStrategy,
    similarity_strategy: SimilarityStrategy,
    character_match: CharacterMatch,
    stats: Option<Arc<ComparisonStats>>,
}

impl SimilarityEngine {
    pub fn new(measures: Vec<SimilarityMeasure>) -> Self {
        Self {
            measures,
            ..Self::default()
        }
    }

    /// Builds the measures and strategies named by `config`.
    pub fn from_config(config: &WordSimConfig) -> Result<Self, WordSimError> {
        Ok(Self::new(MeasureRegistry::from_config(config)?.into_measures())
            .with_comparison_strategy(config.comparison_strategy)
            .with_similarity_strategy(config.similarity_strategy)
            .with_character_match(config.character_match))
    }

    pub fn with_comparison_strategy(mut self, strategy: ComparisonStrategy) -> Self {
        self.comparison_strategy = strategy;
        self
    }

    pub fn with_similarity_strategy(mut self, strategy: SimilarityStrategy) -> Self {
        self.similarity_strategy = strategy;
        self
    }

    /// Character match function for contexts the engine builds itself.
    pub fn with_character_match(mut self, character_match: CharacterMatch) -> Self {
        self.character_match = character_match;
        self
    }

    pub fn character_match(&self) -> CharacterMatch {
        self.character_match
    }

    /// Reports every decision into `stats`.
    pub fn with_stats(mut self, stats: Arc<ComparisonStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn add_measure(&mut self, measure: impl Into<SimilarityMeasure>) {
        self.measures.push(measure.into());
    }

    pub fn measures(&self) -> &[SimilarityMeasure] {
        &self.measures
    }

    pub fn stats(&self) -> Option<&Arc<ComparisonStats>> {
        self.stats.as_ref()
    }

    pub fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        self.are_words_similar_with(ctx, self.comparison_strategy)
    }

    pub fn are_strings_similar(&self, first: &str, second: &str) -> bool {
        self.are_words_similar(
            &ComparisonContext::new(first, second).with_character_match(self.character_match),
        )
    }

    pub fn are_words_similar_with(
        &self,
        ctx: &ComparisonContext<'_>,
        strategy: ComparisonStrategy,
    ) -> bool {
        if !split_length_test(ctx) {
            trace!(first = ctx.first_term(), second = ctx.second_term(), "split length differs");
            return false;
        }

        let accepted = match &self.stats {
            None => strategy.decide(
                self.measures.len(),
                self.measures.iter().map(|m| m.are_words_similar(ctx)),
            ),
            Some(stats) => {
                let mut results = Vec::with_capacity(self.measures.len());
                let accepted = strategy.decide(
                    self.measures.len(),
                    self.measures.iter().map(|m| {
                        let accepted = m.are_words_similar(ctx);
                        results.push(MeasureResult {
                            measure: m.id(),
                            accepted,
                            score: m.similarity(ctx),
                        });
                        accepted
                    }),
                );
                stats.record(Comparison {
                    first: ctx.first_term().to_string(),
                    second: ctx.second_term().to_string(),
                    results,
                    accepted,
                });
                accepted
            }
        };

        trace!(
            first = ctx.first_term(),
            second = ctx.second_term(),
            accepted,
            "compared terms"
        );
        accepted
    }

    /// Decisions for independent contexts, in input order.
    pub fn compare_batch(&self, contexts: &[ComparisonContext<'_>]) -> Vec<bool> {
        contexts
            .par_iter()
            .map(|ctx| self.are_words_similar(ctx))
            .collect()
    }

    /// Combined score of every measure except equality, using the default
    /// similarity strategy. Equality is only used when it is the sole
    /// measure.
    pub fn similarity(&self, first: &str, second: &str, ignore_case: bool) -> f64 {
        self.similarity_with(first, second, self.similarity_strategy, ignore_case)
    }

    pub fn similarity_with(
        &self,
        first: &str,
        second: &str,
        strategy: SimilarityStrategy,
        ignore_case: bool,
    ) -> f64 {
        let (first, second) = if ignore_case {
            (first.to_lowercase(), second.to_lowercase())
        } else {
            (first.to_string(), second.to_string())
        };
        let ctx = ComparisonContext::new(&first, &second).with_character_match(self.character_match);

        let mut scored = self.measures.iter().filter(|m| !m.is_equality()).peekable();
        if scored.peek().is_none() {
            return strategy.combine([EqualityMeasure.similarity(&ctx)]);
        }
        strategy.combine(scored.map(|m| m.similarity(&ctx)))
    }
}

/// Both terms must have the same number of space-separated parts.
fn split_length_test(ctx: &ComparisonContext<'_>) -> bool {
    let parts = |term: &str| term.split(' ').filter(|part| !part.is_empty()).count();
    parts(ctx.first_term()) == parts(ctx.second_term())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measures::{JaroWinklerMeasure, LevenshteinMeasure, NgramMeasure, NgramVariant};

    fn engine() -> SimilarityEngine {
        SimilarityEngine::new(vec![
            EqualityMeasure.into(),
            LevenshteinMeasure::new(2, 1, 0.9).unwrap().into(),
            NgramMeasure::new(NgramVariant::Lucene, 2, 0.5).unwrap().into(),
        ])
    }

    #[test]
    fn at_least_one_measure_suffices() {
        let engine = engine();
        assert!(engine.are_strings_similar("Cache", "cache"));
        assert!(engine.are_strings_similar("server", "servers"));
        assert!(!engine.are_strings_similar("cache", "router"));
    }

    #[test]
    fn split_length_must_match() {
        let engine = engine();
        assert!(!engine.are_strings_similar("logic server", "logicserver"));
        assert!(engine.are_strings_similar("logic server", "Logic Server"));
    }

    #[test]
    fn character_match_reaches_engine_built_contexts() {
        let measures = || -> Vec<SimilarityMeasure> { vec![JaroWinklerMeasure::new(0.95).unwrap().into()] };
        let plain = SimilarityEngine::new(measures());
        assert!(!plain.are_strings_similar("Scheduler", "Ѕсhеdulеr"));

        let lenient = SimilarityEngine::new(measures()).with_character_match(CharacterMatch::EqualOrHomoglyph);
        assert!(lenient.are_strings_similar("Scheduler", "Ѕсhеdulеr"));
        assert_eq!(lenient.similarity("Scheduler", "Ѕсhеdulеr", true), 1.0);
    }

    #[test]
    fn consensus_requires_every_measure() {
        let engine = engine().with_comparison_strategy(ComparisonStrategy::Consensus);
        assert!(engine.are_strings_similar("cache", "cache"));
        assert!(!engine.are_strings_similar("server", "servers"));
    }

    #[test]
    fn similarity_skips_equality() {
        let engine = engine();
        let expected = (strsim::normalized_levenshtein("ab", "ac") + 0.75) / 2.0;
        assert!((engine.similarity("ab", "ac", false) - expected).abs() < 1e-12);

        let equality_only = SimilarityEngine::new(vec![EqualityMeasure.into()]);
        assert_eq!(equality_only.similarity("Cache", "cache", true), 1.0);
        assert_eq!(equality_only.similarity("Cache", "cache", false), 0.0);
    }

    #[test]
    fn batch_preserves_input_order() {
        let engine = engine();
        let contexts = vec![
            ComparisonContext::new("cache", "cache"),
            ComparisonContext::new("cache", "router"),
            ComparisonContext::new("server", "servers"),
        ];
        assert_eq!(engine.compare_batch(&contexts), vec![true, false, true]);
    }

    #[test]
    fn stats_record_each_decision() {
        let stats = Arc::new(ComparisonStats::new());
        let engine = engine()
            .with_comparison_strategy(ComparisonStrategy::Majority)
            .with_stats(stats.clone());

        assert!(engine.are_strings_similar("server", "servers"));
        assert!(engine.are_strings_similar("servers", "server"));

        assert_eq!(stats.len(), 2);
        let unique = stats.unique_comparisons();
        assert_eq!(unique.len(), 1);
        let ids: Vec<_> = unique[0].results.iter().map(|r| r.measure).collect();
        assert_eq!(ids, vec!["equality", "levenshtein", "ngram"]);
        assert!(unique[0].accepted);
    }
}
