//! Client error types.

use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The query could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] restmap_core::Error),

    /// The transport failed to complete the exchange.
    #[error("transport error: {0}")]
    Transport(String),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a status outside the accepted ranges.
    #[error("unexpected response status {status}")]
    UnexpectedStatus { status: u16 },

    /// The response body is not JSON.
    #[error("unexpected response content type '{0}'")]
    UnexpectedContentType(String),

    /// The model has no resource path in the registry.
    #[error("there is no path for the model '{0}'")]
    UnknownModel(String),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The response body does not have the expected shape.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
