//! Sense-vector similarity (Nasari embeddings over a sense inventory).
//!
//! Both terms are expanded to their candidate senses; the pair is similar as
//! soon as one sense pair's vectors clear the threshold.

use super::VectorBasedMeasure;
use crate::context::ComparisonContext;
use crate::error::ConfigError;
use crate::lexicon::SenseInventory;
use crate::measure::WordSimMeasure;
use crate::vector::WordVectorDataSource;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub struct NasariMeasure {
    senses: Arc<dyn SenseInventory>,
    vectors: VectorBasedMeasure,
}

impl NasariMeasure {
    /// `vectors` is keyed by sense id.
    pub fn new(
        senses: Arc<dyn SenseInventory>,
        vectors: Arc<dyn WordVectorDataSource>,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            senses,
            vectors: VectorBasedMeasure::new("nasari", vectors, threshold)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.vectors.threshold()
    }

    fn sense_pairs(&self, ctx: &ComparisonContext<'_>) -> Option<(Vec<String>, Vec<String>)> {
        let lookup = |term: &str| {
            self.senses.senses(term).map_err(|error| {
                warn!(term, %error, "failed to get senses");
            })
        };
        Some((lookup(ctx.first_term()).ok()?, lookup(ctx.second_term()).ok()?))
    }
}

impl fmt::Debug for NasariMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NasariMeasure")
            .field("vectors", &self.vectors)
            .finish_non_exhaustive()
    }
}

impl WordSimMeasure for NasariMeasure {
    fn id(&self) -> &'static str {
        "nasari"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        let Some((first, second)) = self.sense_pairs(ctx) else {
            return false;
        };
        for a in &first {
            for b in &second {
                match self.vectors.compare_vectors(a, b) {
                    Ok(Some(score)) if score >= self.threshold() => return true,
                    Ok(_) => {}
                    Err(error) => {
                        warn!(%error, "failed to compare sense vectors");
                        return false;
                    }
                }
            }
        }
        false
    }

    /// Best score over all sense pairs, NaN if no pair has vectors.
    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        let Some((first, second)) = self.sense_pairs(ctx) else {
            return f64::NAN;
        };
        let mut best = f64::NAN;
        for a in &first {
            for b in &second {
                match self.vectors.compare_vectors(a, b) {
                    Ok(Some(score)) => best = best.max(score),
                    Ok(None) => {}
                    Err(error) => {
                        warn!(%error, "failed to compare sense vectors");
                        return f64::NAN;
                    }
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::SenseCache;
    use crate::vector::InMemoryVectors;

    fn measure(threshold: f64) -> NasariMeasure {
        let senses: SenseCache = [
            ("cache", vec!["bn:cache.storage", "bn:cache.hiding"]),
            ("buffer", vec!["bn:buffer.storage"]),
            ("server", vec!["bn:server.computer"]),
        ]
        .into_iter()
        .map(|(lemma, ids)| (lemma.to_string(), ids.into_iter().map(String::from).collect()))
        .collect();
        let vectors = InMemoryVectors::new(2)
            .with_vector("bn:cache.storage", &[1.0, 0.0])
            .unwrap()
            .with_vector("bn:cache.hiding", &[0.0, 1.0])
            .unwrap()
            .with_vector("bn:buffer.storage", &[0.95, 0.05])
            .unwrap()
            .with_vector("bn:server.computer", &[0.5, -0.5])
            .unwrap();
        NasariMeasure::new(Arc::new(senses), Arc::new(vectors), threshold).unwrap()
    }

    #[test]
    fn any_sense_pair_may_match() {
        let measure = measure(0.9);
        assert!(measure.are_words_similar(&ComparisonContext::new("cache", "buffer")));
        assert!(!measure.are_words_similar(&ComparisonContext::new("cache", "server")));
    }

    #[test]
    fn unknown_lemma_is_not_similar() {
        let measure = measure(0.0);
        let ctx = ComparisonContext::new("cache", "router");
        assert!(!measure.are_words_similar(&ctx));
        assert!(measure.similarity(&ctx).is_nan());
    }

    #[test]
    fn similarity_is_the_best_pair() {
        let score = measure(0.5).similarity(&ComparisonContext::new("Cache", "buffer"));
        assert!(score > 0.99);
    }
}
