//! Schema catalog for restmap.
//!
//! The catalog describes the entities exposed by the remote API and resolves
//! dotted property paths into column descriptors for the codec.

mod catalog;
mod entity;
mod field;
mod registry;
mod types;

pub use catalog::Catalog;
pub use entity::EntityDef;
pub use field::FieldDef;
pub use registry::{ColumnDescriptor, SchemaRegistry};
pub use types::{FieldType, Format, ScalarType};
