//! Field definitions for entities.

use serde::{Deserialize, Serialize};

use super::types::FieldType;

/// A field definition within an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Property name used in query paths.
    pub name: String,
    /// Name of the field in the remote API, when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    /// Field data type.
    pub field_type: FieldType,
    /// Whether the field is required (non-nullable at the application level).
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl FieldDef {
    /// Create a new required field.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            storage: None,
            field_type,
            required: true,
        }
    }

    /// Create an optional field (required = false).
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::new(name, field_type)
        }
    }

    /// Set the name used by the remote API.
    pub fn stored_as(mut self, storage: impl Into<String>) -> Self {
        self.storage = Some(storage.into());
        self
    }

    /// The name used by the remote API.
    pub fn real_name(&self) -> &str {
        self.storage.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::types::ScalarType;

    #[test]
    fn test_field_def_builder() {
        let field = FieldDef::new("id", FieldType::scalar(ScalarType::Uuid)).stored_as("_id");

        assert_eq!(field.name, "id");
        assert_eq!(field.real_name(), "_id");
        assert!(field.required);
    }

    #[test]
    fn test_optional_field() {
        let field = FieldDef::optional("description", FieldType::scalar(ScalarType::String));

        assert!(!field.required);
        assert_eq!(field.real_name(), "description");
    }

    #[test]
    fn test_json_defaults() {
        let field: FieldDef =
            serde_json::from_str(r#"{"name": "age", "field_type": {"Scalar": "Int32"}}"#).unwrap();

        assert!(field.required);
        assert_eq!(field.storage, None);
        assert_eq!(field.field_type, FieldType::scalar(ScalarType::Int32));
    }
}
