//! restmap protocol types.
//!
//! This crate defines the value objects that describe a REST query: the
//! scalar [`Value`], match operations, sorting, limits and the [`Query`]
//! that groups them. The codec in `restmap-core` turns a [`Query`] into a
//! URL path and back.
//!
//! # Modules
//!
//! - [`value`] - Scalar values used as match operands
//! - [`query`] - Match rules, sort, limit and query types
//! - [`error`] - Code parsing errors

pub mod error;
pub mod query;
pub mod value;

pub use error::Error;

pub use query::{
    Limit, Match, Operand, Operation, Operator, Order, Query, QueryUrl, RegexLiteral, Rules, Sort,
};
pub use value::Value;
