//! # Connections Module
//!
//! This module handles connections to the backing cache. A [`CacheConnector`]
//! is built once at startup and opens one [`CacheStore`] session per request;
//! dropping the session releases the connection.

use async_trait::async_trait;

use crate::errors::CacheError;

/// Module for Redis cache operations and connection handling.
pub mod cache_redis;

/// One open session against the cache.
#[async_trait]
pub trait CacheStore: Send {
    /// Returns the stored value, or `None` when the key is unset.
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key`, overwriting any prior value.
    async fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError>;

    /// Returns every key matching `pattern`.
    ///
    /// Unbounded and unpaginated; meant for diagnostics only.
    async fn list_keys(&mut self, pattern: &str) -> Result<Vec<String>, CacheError>;

    /// Round-trips a `PING`.
    async fn ping(&mut self) -> Result<(), CacheError>;
}

/// Opens sessions against the cache.
#[async_trait]
pub trait CacheConnector: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn CacheStore>, CacheError>;
}
