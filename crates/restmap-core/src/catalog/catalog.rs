//! In-memory catalog of entity definitions.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::registry::{ColumnDescriptor, SchemaRegistry};
use super::EntityDef;
use crate::error::Error;

/// On-disk shape of a catalog.
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    entities: Vec<EntityDef>,
}

/// The catalog of entities known to the driver.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: HashMap<String, EntityDef>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, replacing any entity with the same name.
    pub fn with_entity(mut self, entity: EntityDef) -> Self {
        self.entities.insert(entity.name.clone(), entity);
        self
    }

    /// Add an entity, failing if the name is already taken.
    pub fn add_entity(&mut self, entity: EntityDef) -> Result<(), Error> {
        if self.entities.contains_key(&entity.name) {
            return Err(Error::InvalidSchema(format!(
                "duplicate entity '{}'",
                entity.name
            )));
        }
        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Load a catalog from its JSON form and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entity in file.entities {
            catalog.add_entity(entity)?;
        }
        catalog.validate()?;
        Ok(catalog)
    }

    /// Serialize the catalog to JSON, entities sorted by name.
    pub fn to_json(&self) -> Result<String, Error> {
        let mut entities: Vec<EntityDef> = self.entities.values().cloned().collect();
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(serde_json::to_string_pretty(&CatalogFile { entities })?)
    }

    /// Check that every embedded field references a known entity.
    pub fn validate(&self) -> Result<(), Error> {
        for entity in self.entities.values() {
            for field in &entity.fields {
                if let Some(nested) = field.field_type.embedded_entity() {
                    if !self.entities.contains_key(nested) {
                        return Err(Error::InvalidSchema(format!(
                            "field '{}.{}' embeds unknown entity '{}'",
                            entity.name, field.name, nested
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Get an entity by name.
    pub fn get_entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Names of all entities, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl SchemaRegistry for Catalog {
    fn resolve_path_columns(&self, model: &str, path: &str) -> Option<Vec<ColumnDescriptor>> {
        let mut entity = self.entities.get(model)?;
        let mut segments = path.split('.').peekable();
        let mut columns = Vec::new();

        while let Some(segment) = segments.next() {
            let field = entity.get_field(segment)?;
            columns.push(ColumnDescriptor::from(field));
            if segments.peek().is_some() {
                let nested = field.field_type.embedded_entity()?;
                entity = self.entities.get(nested)?;
            }
        }

        Some(columns)
    }

    fn storage_path(&self, model: &str) -> Option<String> {
        self.entities.get(model).map(|entity| entity.storage.clone())
    }
}
