//! Cosine similarity over word vectors.
//!
//! Fails closed: a term without a vector is never similar, and a failing
//! data source is logged and treated the same way.

use crate::context::ComparisonContext;
use crate::error::{validate_threshold, ConfigError, DataSourceError};
use crate::measure::WordSimMeasure;
use crate::vector::{cosine_similarity, WordVectorDataSource};
use dashmap::DashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

pub struct VectorBasedMeasure {
    id: &'static str,
    source: Arc<dyn WordVectorDataSource>,
    threshold: f64,
    /// Successful lookups only, misses included. Errors are retried.
    cache: DashMap<String, Option<Arc<[f32]>>>,
}

impl VectorBasedMeasure {
    pub fn new(
        id: &'static str,
        source: Arc<dyn WordVectorDataSource>,
        threshold: f64,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            id,
            source,
            threshold: validate_threshold(id, threshold)?,
            cache: DashMap::new(),
        })
    }

    pub fn fast_text(source: Arc<dyn WordVectorDataSource>, threshold: f64) -> Result<Self, ConfigError> {
        Self::new("fasttext", source, threshold)
    }

    pub fn glove(source: Arc<dyn WordVectorDataSource>, threshold: f64) -> Result<Self, ConfigError> {
        Self::new("glove", source, threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Cosine similarity of the two keys' vectors, `None` if either is
    /// missing.
    pub fn compare_vectors(&self, first: &str, second: &str) -> Result<Option<f64>, DataSourceError> {
        let (Some(a), Some(b)) = (self.vector(first)?, self.vector(second)?) else {
            return Ok(None);
        };
        cosine_similarity(&a, &b).map(Some)
    }

    fn vector(&self, key: &str) -> Result<Option<Arc<[f32]>>, DataSourceError> {
        if let Some(cached) = self.cache.get(key) {
            return Ok(cached.clone());
        }
        let vector: Option<Arc<[f32]>> = self.source.get_word_vector(key)?.map(Arc::from);
        self.cache.insert(key.to_string(), vector.clone());
        Ok(vector)
    }
}

impl fmt::Debug for VectorBasedMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorBasedMeasure")
            .field("id", &self.id)
            .field("threshold", &self.threshold)
            .field("cached", &self.cache.len())
            .finish()
    }
}

impl WordSimMeasure for VectorBasedMeasure {
    fn id(&self) -> &'static str {
        self.id
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        let score = self.similarity(ctx);
        !score.is_nan() && score >= self.threshold
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        match self.compare_vectors(ctx.first_term(), ctx.second_term()) {
            Ok(Some(score)) => score,
            Ok(None) => f64::NAN,
            Err(error) => {
                warn!(measure = self.id, %error, "failed to compare word vectors");
                f64::NAN
            }
        }
    }
}
