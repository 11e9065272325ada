//! Tracelink word similarity
//!
//! Decides whether two terms denote the same concept. A term pair travels as
//! a [`ComparisonContext`] through an ordered list of measures; a
//! [`ComparisonStrategy`] turns their answers into one decision.
//!
//! ```text
//!                 ┌─ EqualityMeasure
//!                 ├─ LevenshteinMeasure / JaroWinklerMeasure
//! Context ─► Engine ─ NgramMeasure (Kondrak positional n-grams)
//!                 ├─ VectorBasedMeasure ◄── binary file │ SQLite table
//!                 ├─ NasariMeasure ◄── senses + sense vectors
//!                 ├─ SeWordSimMeasure ◄── SQLite pair table
//!                 └─ WordNetMeasure ◄── Lexicon (hypernym graph, glosses)
//! ```
//!
//! ## Failure model
//!
//! - Invalid settings fail construction with a [`ConfigError`].
//! - A term without a vector, sense or table row is simply not similar.
//! - A failing data source is logged with `tracing::warn!` and the
//!   comparison answers "not similar"; a batch is never aborted.

pub mod character;
pub mod config;
pub mod context;
pub mod engine;
pub mod error;
pub mod lexicon;
pub mod measure;
pub mod measures;
pub mod registry;
mod sqlite;
pub mod stats;
pub mod stem;
pub mod strategy;
pub mod vector;
pub mod word_pair;

pub use character::CharacterMatch;
pub use config::WordSimConfig;
pub use context::ComparisonContext;
pub use engine::SimilarityEngine;
pub use error::{validate_threshold, ConfigError, DataSourceError, WordSimError};
pub use lexicon::{Lexicon, Sense, SenseCache, SenseInventory};
pub use measure::{SimilarityMeasure, WordSimMeasure};
pub use registry::MeasureRegistry;
pub use stats::{Comparison, ComparisonStats, MeasureResult, MeasureSummary};
pub use strategy::{ComparisonStrategy, SimilarityStrategy};
pub use vector::{InMemoryVectors, WordVectorDataSource};
pub use word_pair::WordPair;
