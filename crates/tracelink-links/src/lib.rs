//! Tracelink links
//!
//! Turns repeated, independently produced similarity claims into a
//! canonical set of confidence-scored links between text and model.
//!
//! ```text
//! NounMapping (name/type evidence, per-kind Confidence)
//!      │
//!      ▼
//! RecommendedInstance (name, type) ──┐
//!                                    ├─► ConnectionState ─► InstanceLink ─► TraceLink
//! ModelInstance (id, name, type) ────┘        ▲
//!                                             │
//!                     InstanceConnector (SimilarityEngine decisions)
//! ```
//!
//! ## Confidence
//!
//! A [`Confidence`] keeps every `(claimant, probability)` claim. Its value
//! groups claims by claimant (MAX) and applies an [`AggregationFunction`].
//! Instance links aggregate with `Max`, so a weaker re-assertion never
//! dilutes a stronger one; the policy is configurable per state.
//!
//! ## Determinism
//!
//! The state keeps links in insertion order and trace links in sorted sets:
//! the same ordered sequence of `add_to_link` calls yields the same state.
//! [`SharedConnectionState`] serializes merges behind one write lock.

pub mod confidence;
pub mod connector;
pub mod error;
pub mod link;
pub mod mapping;
pub mod recommended;
pub mod shared;
pub mod state;

pub use confidence::{AggregationFunction, Claim, Confidence, CustomAggregation};
pub use connector::{ConnectorConfig, InstanceConnector};
pub use error::{validate_probability, LinkError};
pub use link::{InstanceLink, LinkKey, TraceLink, WordTraceLink};
pub use mapping::{MappingKind, NounMapping};
pub use recommended::{RecommendedInstance, RecommendedInstanceKey};
pub use shared::SharedConnectionState;
pub use state::ConnectionState;
