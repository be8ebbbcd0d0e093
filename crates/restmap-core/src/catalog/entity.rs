//! Entity definitions.

use serde::{Deserialize, Serialize};

use super::field::FieldDef;

/// An entity definition (one REST resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Entity name (unique within the catalog).
    pub name: String,
    /// Resource path of the entity in the remote API (e.g. "users").
    pub storage: String,
    /// Name of the primary identity field.
    pub identity_field: String,
    /// Field definitions.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Create a new entity definition.
    pub fn new(
        name: impl Into<String>,
        storage: impl Into<String>,
        identity_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            storage: storage.into(),
            identity_field: identity_field.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field to the entity.
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}
