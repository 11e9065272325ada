//! Tracelink boundary types
//!
//! The trace-link engine consumes the output of two collaborators it does not
//! own: text preprocessing (tokens with sentence positions, lemmas and POS
//! tags) and model extraction (architecture/code elements with a stable id,
//! a name and a type). This crate defines those inputs as plain value types,
//! plus the [`Claimant`] identity every pipeline step attaches to the scores
//! it produces.
//!
//! ```text
//! text preprocessing ──► Word ──┐
//!                               ├──► wordsim / links
//! model extraction ──► ModelInstance ┘
//! ```

pub mod claimant;
pub mod instance;
pub mod word;

pub use claimant::Claimant;
pub use instance::{Entity, ModelInstance};
pub use word::Word;

/// Errors raised when boundary values are constructed from invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("{field} must not be blank")]
    BlankField { field: &'static str },
}
