//! Client configuration.

use std::time::Duration;

/// Default base URL of the REST API.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the API (e.g., "https://api.example.com/v1").
    pub api_url: String,

    /// API key sent with every request.
    pub api_key: Option<String>,

    /// Request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a new client configuration with the specified base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create a configuration for an API on localhost.
    pub fn localhost() -> Self {
        Self::new(DEFAULT_API_URL)
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the absolute URL of a request path.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.api_url.trim_end_matches('/'), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::localhost()
    }
}
