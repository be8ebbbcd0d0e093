//! restmap client - REST data driver.
//!
//! The [`Driver`] maps create/read/update/delete operations on catalog
//! entities to HTTP requests. Queries travel in the request path, encoded by
//! the `restmap-core` codec; the HTTP exchange itself is delegated to a
//! [`Transport`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use restmap_client::proto::{Limit, Match, Operation, Query};
//! use restmap_client::{ClientConfig, Driver, Error, Request, Response, Transport};
//! use restmap_core::Catalog;
//!
//! struct HttpTransport;
//!
//! #[async_trait]
//! impl Transport for HttpTransport {
//!     async fn send(&self, request: Request) -> Result<Response, Error> {
//!         // Hand the request to an HTTP client here.
//!         Err(Error::Transport(format!("cannot reach {}", request.url)))
//!     }
//! }
//!
//! # async fn active_users() -> Result<Vec<serde_json::Value>, Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::from_json(&std::fs::read_to_string("schema.json")?)?);
//! let driver = Driver::new(HttpTransport, catalog, ClientConfig::new("https://api.example.com"));
//!
//! let query = Query::new()
//!     .with_pre(Match::new().with("active", Operation::eq(true)))
//!     .with_limit(Limit::first(10));
//! let users = driver.find("User", Some(&query), &["id", "name"]).await?;
//! # Ok(users)
//! # }
//! ```

pub mod config;
pub mod driver;
pub mod error;
pub mod helper;
pub mod transport;

pub use config::ClientConfig;
pub use driver::Driver;
pub use error::Error;
pub use transport::{Method, Request, Response, Transport};

/// Re-export protocol types.
pub use restmap_proto as proto;
