//! URL path codec for queries.
//!
//! - [`value`] converts operand values to and from text
//! - [`filters`] packs whole queries into a path and parses them back

pub mod filters;
mod tokens;
pub mod value;

pub use filters::{
    from_url, to_url, FIELDS_PREFIX, LIMIT_PREFIX, POST_MATCH_PREFIX, PRE_MATCH_PREFIX,
    QUERY_PREFIX, SORT_PREFIX,
};
pub use value::{decode_component, encode_component, pack_value, unpack_value};
