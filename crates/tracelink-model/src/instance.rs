//! Model instances as delivered by model extraction.

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A concrete architecture or code element.
///
/// Identity is the extractor-assigned `id`; two instances with the same id are
/// the same element even if their names were normalised differently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInstance {
    id: String,
    name: String,
    instance_type: String,
}

/// The newer extractors call model elements entities; the shape is the same.
pub type Entity = ModelInstance;

impl ModelInstance {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        instance_type: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ModelError::BlankField { field: "model instance id" });
        }
        Ok(Self {
            id,
            name: name.into(),
            instance_type: instance_type.into(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance_type(&self) -> &str {
        &self.instance_type
    }

    /// Name split into its parts (`test.driver` → `["test", "driver"]`).
    pub fn name_parts(&self) -> Vec<&str> {
        split_parts(&self.name)
    }

    pub fn type_parts(&self) -> Vec<&str> {
        split_parts(&self.instance_type)
    }
}

fn split_parts(value: &str) -> Vec<&str> {
    value
        .split(|c: char| c.is_whitespace() || c == '.' || c == '_' || c == '-' || c == ':')
        .filter(|part| !part.is_empty())
        .collect()
}

impl PartialEq for ModelInstance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ModelInstance {}

impl Hash for ModelInstance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
