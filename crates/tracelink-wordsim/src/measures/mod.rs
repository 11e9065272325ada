//! Concrete similarity measures.

pub mod equality;
pub mod jaro_winkler;
pub mod levenshtein;
pub mod nasari;
pub mod ngram;
pub mod sewordsim;
pub mod vector;
pub mod wordnet;

pub use equality::EqualityMeasure;
pub use jaro_winkler::JaroWinklerMeasure;
pub use levenshtein::LevenshteinMeasure;
pub use nasari::NasariMeasure;
pub use ngram::{NgramMeasure, NgramVariant};
pub use sewordsim::{SeWordSimDataSource, SeWordSimMeasure};
pub use vector::VectorBasedMeasure;
pub use wordnet::{RelatednessCalculator, WordNetMeasure};
