//! Schema registry interface consumed by the codec.

use std::sync::Arc;

use super::field::FieldDef;
use super::types::Format;

/// Metadata of one model property, as seen by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Property name used in query paths.
    pub name: String,
    /// Name of the property in the remote API.
    pub real_name: String,
    /// Format tags driving value conversion.
    pub formats: Vec<Format>,
    /// Entity nested under this property, if any.
    pub entity: Option<String>,
}

impl ColumnDescriptor {
    /// Create a descriptor with the given formats.
    pub fn new(name: impl Into<String>, formats: Vec<Format>) -> Self {
        let name = name.into();
        Self {
            real_name: name.clone(),
            name,
            formats,
            entity: None,
        }
    }

    /// Check whether the column carries a format tag.
    pub fn has(&self, format: Format) -> bool {
        self.formats.contains(&format)
    }
}

impl From<&FieldDef> for ColumnDescriptor {
    fn from(field: &FieldDef) -> Self {
        Self {
            name: field.name.clone(),
            real_name: field.real_name().to_string(),
            formats: field.field_type.formats(),
            entity: field.field_type.embedded_entity().map(str::to_string),
        }
    }
}

/// Lookup of model metadata.
///
/// Implementations are pure: the same arguments always give the same answer
/// and the codec never mutates or caches what it gets back.
pub trait SchemaRegistry {
    /// Resolve a dotted property path of a model.
    ///
    /// Returns one descriptor per path segment, the last one being the leaf
    /// column, or `None` when the path does not exist.
    fn resolve_path_columns(&self, model: &str, path: &str) -> Option<Vec<ColumnDescriptor>>;

    /// Resource path of a model in the remote API.
    fn storage_path(&self, model: &str) -> Option<String>;
}

impl<R: SchemaRegistry + ?Sized> SchemaRegistry for &R {
    fn resolve_path_columns(&self, model: &str, path: &str) -> Option<Vec<ColumnDescriptor>> {
        (**self).resolve_path_columns(model, path)
    }

    fn storage_path(&self, model: &str) -> Option<String> {
        (**self).storage_path(model)
    }
}

impl<R: SchemaRegistry + ?Sized> SchemaRegistry for Arc<R> {
    fn resolve_path_columns(&self, model: &str, path: &str) -> Option<Vec<ColumnDescriptor>> {
        (**self).resolve_path_columns(model, path)
    }

    fn storage_path(&self, model: &str) -> Option<String> {
        (**self).storage_path(model)
    }
}
