//! Claimant identity.
//!
//! A claimant names the pipeline step that asserted a score. The identity is
//! assigned explicitly by each step when it is constructed; it carries no
//! behaviour and is only used for provenance and per-claimant aggregation.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claimant(Cow<'static, str>);

impl Claimant {
    /// Identity for a step known at compile time, e.g. `Claimant::fixed("NameTypeConnector")`.
    pub const fn fixed(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Claimant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Claimant {
    fn from(name: &'static str) -> Self {
        Self::fixed(name)
    }
}
