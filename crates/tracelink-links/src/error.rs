//! Precondition violations raised by the link state.

use tracelink_model::ModelError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<ModelError> for LinkError {
    fn from(err: ModelError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}

/// Probabilities must lie in `[0, 1]`; NaN is rejected.
pub fn validate_probability(probability: f64) -> Result<f64, LinkError> {
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(LinkError::InvalidArgument(format!(
            "probability outside of [0, 1]: {probability}"
        )))
    }
}
