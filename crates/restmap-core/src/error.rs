//! Core error types.

use thiserror::Error;

/// Errors raised by the catalog and the query codec.
///
/// Every codec error is fatal: a failed encode or decode never yields a
/// partial result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A section did not start with its magic prefix.
    #[error("invalid magic prefix for the given {section}")]
    InvalidPrefix { section: &'static str },

    /// A token in prefix position is not a known section tag.
    #[error("unsupported data serialization type '{0}'")]
    UnsupportedSerialization(String),

    /// A property path does not resolve against the model.
    #[error("invalid {usage} path '{path}' for the model '{model}'")]
    InvalidPath {
        usage: &'static str,
        model: String,
        path: String,
    },

    /// Unknown operator code.
    #[error("invalid operator '{operator}' for the given path '{path}'")]
    InvalidOperator { path: String, operator: String },

    /// Unknown sort order code.
    #[error("invalid sorting order '{order}' for the given path '{path}'")]
    InvalidOrder { path: String, order: String },

    /// The operand shape does not match the operator.
    #[error("match value for the given path '{path}' should be a {expected}, got a {actual}")]
    InvalidOperand {
        path: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The input ended before a section was complete.
    #[error("insufficient tokens for the given {section}")]
    InsufficientTokens { section: &'static str },

    /// A count token is not an unsigned integer.
    #[error("invalid count '{0}'")]
    InvalidCount(String),

    /// A value token cannot be read in the column's format.
    #[error("invalid value '{value}' for a {format} column")]
    InvalidValue { value: String, format: &'static str },

    /// A percent-encoded token does not decode to UTF-8.
    #[error("invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),

    /// The schema definition is inconsistent.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidSchema(err.to_string())
    }
}
