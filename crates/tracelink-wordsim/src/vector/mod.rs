//! Word vector sources and vector arithmetic.
//!
//! A [`WordVectorDataSource`] answers "what is the vector for this term".
//! `Ok(None)` means out of vocabulary, which is an ordinary outcome; `Err` is
//! reserved for failures of the source itself.

pub mod binary;
pub mod import;
pub mod sqlite;

use crate::error::DataSourceError;
use ahash::AHashMap;

pub use binary::load_binary_vectors;
pub use import::{ImportResult, VectorTableImporter};
pub use sqlite::SqliteVectorTable;

pub trait WordVectorDataSource: Send + Sync {
    fn get_word_vector(&self, word: &str) -> Result<Option<Vec<f32>>, DataSourceError>;
}

// ============================================================================
// Vector arithmetic
// ============================================================================

/// Cosine similarity computed in `f64`.
///
/// Two zero vectors are identical (1.0); a zero vector against anything else
/// is unrelated (0.0).
pub fn cosine_similarity(first: &[f32], second: &[f32]) -> Result<f64, DataSourceError> {
    if first.len() != second.len() {
        return Err(DataSourceError::DimensionMismatch(first.len(), second.len()));
    }

    match (is_zero(first), is_zero(second)) {
        (true, true) => return Ok(1.0),
        (true, false) | (false, true) => return Ok(0.0),
        (false, false) => {}
    }

    let mut dot = 0.0_f64;
    let mut first_norm = 0.0_f64;
    let mut second_norm = 0.0_f64;
    for (&a, &b) in first.iter().zip(second) {
        let (a, b) = (f64::from(a), f64::from(b));
        dot += a * b;
        first_norm += a * a;
        second_norm += b * b;
    }
    Ok(dot / (first_norm.sqrt() * second_norm.sqrt()))
}

pub fn is_zero(vector: &[f32]) -> bool {
    vector.iter().all(|&x| x == 0.0)
}

/// `result += to_add`, element-wise.
pub fn add(result: &mut [f64], to_add: &[f64]) -> Result<(), DataSourceError> {
    if result.len() != to_add.len() {
        return Err(DataSourceError::DimensionMismatch(result.len(), to_add.len()));
    }
    for (r, a) in result.iter_mut().zip(to_add) {
        *r += a;
    }
    Ok(())
}

pub fn scale(vector: &mut [f64], scalar: f64) {
    for x in vector.iter_mut() {
        *x *= scalar;
    }
}

// ============================================================================
// In-memory source
// ============================================================================

/// A fully loaded vocabulary, e.g. from a binary vector file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectors {
    dimension: usize,
    vectors: AHashMap<String, Vec<f32>>,
}

impl InMemoryVectors {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            vectors: AHashMap::new(),
        }
    }

    pub fn insert(&mut self, word: impl Into<String>, vector: Vec<f32>) -> Result<(), DataSourceError> {
        if vector.len() != self.dimension {
            return Err(DataSourceError::DimensionMismatch(self.dimension, vector.len()));
        }
        self.vectors.insert(word.into(), vector);
        Ok(())
    }

    pub fn with_vector(mut self, word: &str, vector: &[f32]) -> Result<Self, DataSourceError> {
        self.insert(word, vector.to_vec())?;
        Ok(self)
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

impl WordVectorDataSource for InMemoryVectors {
    fn get_word_vector(&self, word: &str) -> Result<Option<Vec<f32>>, DataSourceError> {
        Ok(self.vectors.get(word).cloned())
    }
}
