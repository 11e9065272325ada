//! A clonable handle that serializes merges into one [`ConnectionState`].
//!
//! `add_to_link` is a read-modify-write on the dedup index, so every merge
//! takes the write lock. Readers share the read lock.

use crate::error::LinkError;
use crate::recommended::RecommendedInstance;
use crate::state::ConnectionState;
use parking_lot::RwLock;
use std::sync::Arc;
use tracelink_model::{Claimant, ModelInstance};

#[derive(Debug, Clone, Default)]
pub struct SharedConnectionState {
    inner: Arc<RwLock<ConnectionState>>,
}

impl SharedConnectionState {
    pub fn new(state: ConnectionState) -> Self {
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    pub fn add_to_link(
        &self,
        recommended: &RecommendedInstance,
        model_instance: &ModelInstance,
        claimant: Claimant,
        probability: f64,
    ) -> Result<bool, LinkError> {
        self.inner
            .write()
            .add_to_link(recommended, model_instance, claimant, probability)
    }

    /// Runs `f` under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&ConnectionState) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` under the write lock; a batch of merges applied this way is
    /// never interleaved with other writers.
    pub fn write<R>(&self, f: impl FnOnce(&mut ConnectionState) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn snapshot(&self) -> ConnectionState {
        self.inner.read().clone()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
