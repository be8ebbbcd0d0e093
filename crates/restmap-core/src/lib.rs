//! restmap core - schema catalog and query URL codec.
//!
//! The codec turns a [`Query`](restmap_proto::Query) into a single
//! slash-delimited URL path and parses such a path back. Property paths are
//! checked against a [`SchemaRegistry`], whose column formats also drive how
//! each operand value is written and read.
//!
//! ```rust
//! use restmap_core::catalog::{Catalog, EntityDef, FieldDef, FieldType, ScalarType};
//! use restmap_core::codec::{from_url, to_url};
//! use restmap_core::proto::{Limit, Match, Operation, Query, Sort};
//!
//! # fn main() -> Result<(), restmap_core::Error> {
//! let catalog = Catalog::new().with_entity(
//!     EntityDef::new("User", "users", "id")
//!         .with_field(FieldDef::new("name", FieldType::scalar(ScalarType::String)))
//!         .with_field(FieldDef::new("age", FieldType::scalar(ScalarType::Int32))),
//! );
//!
//! let query = Query::new()
//!     .with_pre(Match::new().with("age", Operation::gte(18)))
//!     .with_sort(Sort::new().desc("age"))
//!     .with_limit(Limit::new(0, 10));
//! let path = to_url(&catalog, "User", Some(&query), &["name"])?;
//! assert_eq!(path, "query/fields/1/name/pre/1/1/age/gte/18/sort/1/age/desc/limit/0/10");
//!
//! let decoded = from_url(&catalog, "User", &path)?;
//! assert_eq!(decoded.fields, vec!["name".to_string()]);
//! assert_eq!(decoded.query, query);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod codec;
pub mod error;

pub use catalog::{
    Catalog, ColumnDescriptor, EntityDef, FieldDef, FieldType, Format, ScalarType, SchemaRegistry,
};
pub use codec::{from_url, to_url};
pub use error::Error;

/// Re-export protocol types.
pub use restmap_proto as proto;
