//! Protocol error types.

use thiserror::Error;

/// Errors raised while parsing wire codes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The operator code is not one of the known literals.
    #[error("unknown operator code '{0}'")]
    UnknownOperator(String),

    /// The order code is not one of the known literals.
    #[error("unknown order code '{0}'")]
    UnknownOrder(String),
}
