//! Relatedness over a WordNet-style sense graph.
//!
//! A word pair is similar when any configured calculator scores the best
//! sense pair at or above that calculator's threshold.

use crate::context::ComparisonContext;
use crate::error::{validate_threshold, ConfigError};
use crate::lexicon::Lexicon;
use crate::measure::WordSimMeasure;
use crate::word_pair::WordPair;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelatednessCalculator {
    /// `2 * depth(lcs) / (depth(a) + depth(b))`
    WuPalmer,
    /// `1 / (1 + path length through the lowest common subsumer)`
    ShortestPath,
    /// Lemma and gloss overlap after stop-word removal and stemming.
    Ezzikouri,
}

impl RelatednessCalculator {
    pub fn name(&self) -> &'static str {
        match self {
            Self::WuPalmer => "wu_palmer",
            Self::ShortestPath => "shortest_path",
            Self::Ezzikouri => "ezzikouri",
        }
    }

    /// Relatedness of two senses in `[0, 1]`.
    pub fn sense_relatedness(&self, lexicon: &Lexicon, a: &str, b: &str) -> f64 {
        match self {
            Self::WuPalmer => match lexicon.lowest_common_subsumer(a, b) {
                Some((lcs, _)) => {
                    let depths = (lexicon.depth(a) + lexicon.depth(b)) as f64;
                    (2.0 * lexicon.depth(&lcs) as f64 / depths).min(1.0)
                }
                None => 0.0,
            },
            Self::ShortestPath => match lexicon.lowest_common_subsumer(a, b) {
                Some((_, path)) => 1.0 / (1.0 + path as f64),
                None => 0.0,
            },
            Self::Ezzikouri => ezzikouri(lexicon, a, b),
        }
    }
}

/// `(|wordsA ∩ wordsB| + |glossA ∩ glossB|) / |wordsA ∪ wordsB ∪ glossA ∪ glossB|`
fn ezzikouri(lexicon: &Lexicon, a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    let (Some(first), Some(second)) = (lexicon.sense(a), lexicon.sense(b)) else {
        return 0.0;
    };
    let (words_a, gloss_a) = lexicon.content_of(first);
    let (words_b, gloss_b) = lexicon.content_of(second);

    let shared = words_a.intersection(&words_b).count() + gloss_a.intersection(&gloss_b).count();
    let mut union = words_a;
    union.extend(words_b);
    union.extend(gloss_a);
    union.extend(gloss_b);
    if union.is_empty() {
        return 0.0;
    }
    shared as f64 / union.len() as f64
}

#[derive(Debug)]
pub struct WordNetMeasure {
    lexicon: Arc<Lexicon>,
    calculators: BTreeMap<RelatednessCalculator, f64>,
    cache: Option<DashMap<(RelatednessCalculator, WordPair), Option<f64>>>,
}

impl WordNetMeasure {
    pub fn new(
        lexicon: Arc<Lexicon>,
        calculators: impl IntoIterator<Item = (RelatednessCalculator, f64)>,
    ) -> Result<Self, ConfigError> {
        let calculators = calculators
            .into_iter()
            .map(|(calculator, threshold)| Ok((calculator, validate_threshold("wordNet", threshold)?)))
            .collect::<Result<BTreeMap<_, _>, ConfigError>>()?;
        if calculators.is_empty() {
            return Err(ConfigError::NoCalculators { measure: "wordNet" });
        }
        Ok(Self {
            lexicon,
            calculators,
            cache: None,
        })
    }

    /// Remembers word relatedness per calculator and word pair.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(DashMap::new);
        self
    }

    pub fn calculators(&self) -> impl Iterator<Item = (RelatednessCalculator, f64)> + '_ {
        self.calculators.iter().map(|(c, t)| (*c, *t))
    }

    /// Best relatedness over all sense pairs; `None` if either word has no
    /// senses.
    pub fn word_relatedness(
        &self,
        calculator: RelatednessCalculator,
        first: &str,
        second: &str,
    ) -> Option<f64> {
        let Some(cache) = &self.cache else {
            return self.compute_word_relatedness(calculator, first, second);
        };
        let key = (calculator, WordPair::new(first.to_lowercase(), second.to_lowercase()));
        if let Some(cached) = cache.get(&key) {
            return *cached;
        }
        let value = self.compute_word_relatedness(calculator, first, second);
        cache.insert(key, value);
        value
    }

    fn compute_word_relatedness(
        &self,
        calculator: RelatednessCalculator,
        first: &str,
        second: &str,
    ) -> Option<f64> {
        let first_senses = self.lexicon.senses_of(first);
        let second_senses = self.lexicon.senses_of(second);
        if first_senses.is_empty() || second_senses.is_empty() {
            return None;
        }
        first_senses
            .iter()
            .flat_map(|a| {
                second_senses
                    .iter()
                    .map(move |b| calculator.sense_relatedness(&self.lexicon, a, b))
            })
            .reduce(f64::max)
    }
}

impl WordSimMeasure for WordNetMeasure {
    fn id(&self) -> &'static str {
        "wordnet"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        self.calculators.iter().any(|(calculator, threshold)| {
            self.word_relatedness(*calculator, ctx.first_term(), ctx.second_term())
                .is_some_and(|score| score >= *threshold)
        })
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        self.calculators
            .keys()
            .filter_map(|calculator| {
                self.word_relatedness(*calculator, ctx.first_term(), ctx.second_term())
            })
            .fold(f64::NAN, f64::max)
    }
}
