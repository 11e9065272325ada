//! Error taxonomy for word similarity.
//!
//! Construction failures are fatal to the measure being built. Lookups that
//! fail at comparison time never surface here: measures log them and answer
//! "not similar".

use std::path::PathBuf;

/// An invalid measure configuration, detected at construction.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{measure}: similarity threshold outside of valid range [0, 1]: {value}")]
    InvalidThreshold { measure: &'static str, value: f64 },

    #[error("n-gram length must be a positive integer: {0}")]
    InvalidNgramLength(i64),

    #[error("unknown n-gram variant: {0}")]
    UnknownVariant(String),

    #[error("unknown strategy: {0}")]
    UnknownStrategy(String),

    #[error("unknown character match function: {0}")]
    UnknownCharacterMatch(String),

    #[error("unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("{measure} is enabled but {key} is not set")]
    MissingPath { measure: &'static str, key: &'static str },

    #[error("{measure} is enabled without any relatedness calculator")]
    NoCalculators { measure: &'static str },
}

/// A failure inside a data source (file, database, lexicon).
#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error("data source file does not exist: {0}")]
    MissingFile(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("malformed vector data: {0}")]
    Format(String),

    #[error("malformed lexicon: {0}")]
    Lexicon(#[from] serde_json::Error),

    #[error("vector length does not match: {0} != {1}")]
    DimensionMismatch(usize, usize),
}

/// Everything that can go wrong while building a measure.
#[derive(Debug, thiserror::Error)]
pub enum WordSimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    DataSource(#[from] DataSourceError),
}

/// Rejects thresholds outside `[0, 1]`, NaN included.
pub fn validate_threshold(measure: &'static str, value: f64) -> Result<f64, ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidThreshold { measure, value })
    }
}
