//! REST data driver.
//!
//! This module provides the `Driver` struct that maps entity operations to
//! HTTP requests against a REST API.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{debug, warn};

use restmap_core::codec::to_url;
use restmap_core::SchemaRegistry;
use restmap_proto::Query;

use crate::config::{ClientConfig, API_KEY_HEADER};
use crate::error::Error;
use crate::transport::{Method, Request, Response, Transport};

/// Placeholder replaced by the operation's path complement in a custom path.
const COMPLEMENT_PLACEHOLDER: &str = "%0";

/// A data driver for a REST API.
///
/// Every entity lives under the resource path given by the schema registry.
/// Queries are appended to that path by the query codec:
///
/// | operation      | request                                  |
/// |----------------|------------------------------------------|
/// | `insert`       | `POST <storage>` per entity              |
/// | `find`         | `GET <storage>/<query>`                  |
/// | `find_by_id`   | `GET <storage>/<id>[/<fields>]`          |
/// | `update`       | `PATCH <storage>/<query>`                |
/// | `update_by_id` | `PATCH <storage>/<id>`                   |
/// | `delete`       | `DELETE <storage>/<query>`               |
/// | `delete_by_id` | `DELETE <storage>/<id>`                  |
///
/// # Example
///
/// ```ignore
/// let driver = Driver::new(transport, catalog, ClientConfig::new("https://api.example.com"));
///
/// let ids = driver.insert("User", &[json!({"name": "Ann"})]).await?;
/// let user = driver.find_by_id("User", "42", &["name"]).await?;
/// let removed = driver.delete("User", &Query::new().with_pre(rule)).await?;
/// ```
pub struct Driver<T> {
    transport: T,
    registry: Arc<dyn SchemaRegistry + Send + Sync>,
    config: ClientConfig,
    api_key: RwLock<Option<String>>,
    api_path: Mutex<Option<String>>,
}

impl<T: Transport> Driver<T> {
    /// Create a driver.
    pub fn new(
        transport: T,
        registry: Arc<dyn SchemaRegistry + Send + Sync>,
        config: ClientConfig,
    ) -> Self {
        let api_key = RwLock::new(config.api_key.clone());
        Self {
            transport,
            registry,
            config,
            api_key,
            api_path: Mutex::new(None),
        }
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Set the API key for subsequent requests.
    pub fn use_key(&self, key: impl Into<String>) -> &Self {
        *self.api_key.write() = Some(key.into());
        self
    }

    /// Set a custom path for the next request only.
    ///
    /// `%0` in the path is replaced by the path complement of that request
    /// (the entity id or the encoded query).
    pub fn use_path(&self, path: impl Into<String>) -> &Self {
        *self.api_path.lock() = Some(path.into());
        self
    }

    /// Insert entities, one POST request each.
    ///
    /// Returns the ids of the entities the server created (status 201).
    /// A created entity whose response carries no id is logged and left
    /// out; the remaining entities are still sent.
    pub async fn insert<E: Serialize>(
        &self,
        model: &str,
        entities: &[E],
    ) -> Result<Vec<serde_json::Value>, Error> {
        let mut ids = Vec::with_capacity(entities.len());
        for entity in entities {
            let body = serde_json::to_value(entity)?;
            let response = self
                .request(Method::Post, self.get_path(model, None)?, Some(body))
                .await?;
            if response.status == 201 {
                match response.json::<serde_json::Value>() {
                    Ok(serde_json::Value::Object(mut created)) => match created.remove("id") {
                        Some(id) => ids.push(id),
                        None => warn!(model, "created entity has no id"),
                    },
                    Ok(_) => warn!(model, "created entity is not an object"),
                    Err(e) => warn!(model, error = %e, "unreadable created entity"),
                }
            }
        }
        Ok(ids)
    }

    /// Find the entities matching a query.
    ///
    /// Any status other than 200 yields an empty list.
    pub async fn find<S: AsRef<str>>(
        &self,
        model: &str,
        query: Option<&Query>,
        fields: &[S],
    ) -> Result<Vec<serde_json::Value>, Error> {
        let complement = to_url(&*self.registry, model, query, fields)?;
        let path = self.get_path(model, Some(&complement))?;
        let response = self.request(Method::Get, path, None).await?;
        match response.status {
            200 => response.json(),
            _ => Ok(Vec::new()),
        }
    }

    /// Find the entity with the given id.
    pub async fn find_by_id<S: AsRef<str>>(
        &self,
        model: &str,
        id: &str,
        fields: &[S],
    ) -> Result<Option<serde_json::Value>, Error> {
        let query = to_url(&*self.registry, model, None, fields)?;
        let complement = if query.is_empty() {
            id.to_string()
        } else {
            format!("{}/{}", id, query)
        };
        let path = self.get_path(model, Some(&complement))?;
        let response = self.request(Method::Get, path, None).await?;
        match response.status {
            200 => Ok(Some(response.json()?)),
            _ => Ok(None),
        }
    }

    /// Update the entities matching a query.
    ///
    /// Returns the number of updated entities reported by the server.
    pub async fn update<E: Serialize>(
        &self,
        model: &str,
        entity: &E,
        query: &Query,
    ) -> Result<u64, Error> {
        let complement = to_url(&*self.registry, model, Some(query), &[] as &[&str])?;
        let path = self.get_path(model, Some(&complement))?;
        let body = serde_json::to_value(entity)?;
        let response = self.request(Method::Patch, path, Some(body)).await?;
        read_total(&response)
    }

    /// Update the entity with the given id.
    pub async fn update_by_id<E: Serialize>(
        &self,
        model: &str,
        entity: &E,
        id: &str,
    ) -> Result<bool, Error> {
        let path = self.get_path(model, Some(id))?;
        let body = serde_json::to_value(entity)?;
        let response = self.request(Method::Patch, path, Some(body)).await?;
        Ok(is_done(&response))
    }

    /// Delete the entities matching a query.
    ///
    /// Returns the number of deleted entities reported by the server.
    pub async fn delete(&self, model: &str, query: &Query) -> Result<u64, Error> {
        let complement = to_url(&*self.registry, model, Some(query), &[] as &[&str])?;
        let path = self.get_path(model, Some(&complement))?;
        let response = self.request(Method::Delete, path, None).await?;
        read_total(&response)
    }

    /// Delete the entity with the given id.
    pub async fn delete_by_id(&self, model: &str, id: &str) -> Result<bool, Error> {
        let path = self.get_path(model, Some(id))?;
        let response = self.request(Method::Delete, path, None).await?;
        Ok(is_done(&response))
    }

    /// Build the request path of a model, consuming any custom path.
    fn get_path(&self, model: &str, complement: Option<&str>) -> Result<String, Error> {
        let storage = self
            .registry
            .storage_path(model)
            .filter(|path| !path.is_empty())
            .ok_or_else(|| Error::UnknownModel(model.to_string()))?;

        let path = match self.api_path.lock().take() {
            Some(custom) => join_path(
                &storage,
                &custom.replace(COMPLEMENT_PLACEHOLDER, complement.unwrap_or_default()),
            ),
            None => join_path(&storage, complement.unwrap_or_default()),
        };
        Ok(path)
    }

    /// Send a request and check that the exchange succeeded.
    async fn request(
        &self,
        method: Method,
        path: String,
        body: Option<serde_json::Value>,
    ) -> Result<Response, Error> {
        let api_key = self.api_key.read().clone();
        let mut request = Request::new(method, self.config.url_for(&path));
        if let Some(key) = api_key {
            request = request.with_header(API_KEY_HEADER, key);
        }
        if let Some(body) = body {
            request = request.with_body(body);
        }

        debug!(method = %method, url = %request.url, "sending request");
        let response = tokio::time::timeout(self.config.timeout, self.transport.send(request))
            .await
            .map_err(|_| Error::Timeout)??;
        debug!(method = %method, status = response.status, "received response");

        if !crate::helper::is_accepted_status_code(response.status) {
            return Err(Error::UnexpectedStatus {
                status: response.status,
            });
        }
        Ok(response)
    }
}

impl<T> std::fmt::Debug for Driver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("api_url", &self.config.api_url)
            .field("has_api_key", &self.api_key.read().is_some())
            .field("api_path", &*self.api_path.lock())
            .finish()
    }
}

/// Join a resource path and a complement with a single separator.
///
/// Only the joint is trimmed: separators inside the complement are kept, as
/// an encoded query may contain empty tokens.
fn join_path(base: &str, complement: &str) -> String {
    let base = base.trim_matches('/');
    let complement = complement.trim_start_matches('/');
    if complement.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base, complement)
    }
}

fn is_done(response: &Response) -> bool {
    matches!(response.status, 200 | 204)
}

/// Read the `total` counter of a bulk update or delete.
fn read_total(response: &Response) -> Result<u64, Error> {
    if response.status != 200 {
        return Ok(0);
    }
    let body: serde_json::Value = response.json()?;
    match body.get("total") {
        Some(serde_json::Value::Number(total)) => total
            .as_u64()
            .ok_or_else(|| Error::InvalidResponse(format!("invalid total {}", total))),
        Some(serde_json::Value::String(total)) => total
            .parse()
            .map_err(|_| Error::InvalidResponse(format!("invalid total '{}'", total))),
        _ => Err(Error::InvalidResponse("response has no total".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("users", ""), "users");
        assert_eq!(join_path("/users/", "42"), "users/42");
        assert_eq!(join_path("users", "/query/pre/1/1/name/eq/"), "users/query/pre/1/1/name/eq/");
        assert_eq!(join_path("api/users", "query//x"), "api/users/query//x");
    }

    #[test]
    fn test_read_total() {
        assert_eq!(read_total(&Response::json_body(200, &json!({"total": 3}))).unwrap(), 3);
        assert_eq!(read_total(&Response::json_body(200, &json!({"total": "7"}))).unwrap(), 7);
        assert_eq!(read_total(&Response::new(204)).unwrap(), 0);
        assert_eq!(read_total(&Response::json_body(404, &json!({}))).unwrap(), 0);
        assert!(matches!(
            read_total(&Response::json_body(200, &json!({"count": 1}))),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_is_done() {
        assert!(is_done(&Response::new(200)));
        assert!(is_done(&Response::new(204)));
        assert!(!is_done(&Response::new(404)));
    }
}
