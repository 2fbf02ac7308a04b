//! # Redis Cache Implementation
//!
//! Async wrapper for Redis key-value operations over TLS with password
//! authentication. The host from the connection string doubles as the TLS
//! server name.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, AsyncConnectionConfig, Client, RedisError};
use std::time::Duration;
use tracing::debug;

use super::{CacheConnector, CacheStore};
use crate::configs::config_cache::ConnectionDescriptor;
use crate::errors::CacheError;

/// A handler for Redis cache interactions.
///
/// Holds the client built from the connection descriptor; no connection is
/// opened until [`CacheConnector::connect`] is called.
pub struct CacheHandler {
    /// The internal Redis client instance.
    client: Client,
    /// `host:port`, kept for error messages.
    endpoint: String,
    /// Deadline for establishing a session (TCP, TLS and AUTH).
    connect_timeout: Duration,
}

impl CacheHandler {
    /// Creates a new CacheHandler from a resolved connection descriptor.
    ///
    /// # Arguments
    /// * `descriptor` - Endpoint and credential parsed from `CACHE_CONNSTR`.
    /// * `connect_timeout` - How long `connect` may take before giving up.
    pub fn new(
        descriptor: &ConnectionDescriptor,
        connect_timeout: Duration,
    ) -> Result<Self, CacheError> {
        let url = descriptor.client_url()?;
        let client = Client::open(url.as_str())
            .map_err(|e| CacheError::Configuration(format!("invalid cache URL: {}", e)))?;
        Ok(Self {
            client,
            endpoint: descriptor.endpoint(),
            connect_timeout,
        })
    }

    /// Session settings: our own connect deadline, and no per-command deadline.
    ///
    /// The client's defaults (1s connect, 500ms per response) would otherwise
    /// cap the configured timeout and fail slow `KEYS *` scans.
    fn session_config(&self) -> AsyncConnectionConfig {
        AsyncConnectionConfig::new()
            .set_connection_timeout(Some(self.connect_timeout))
            .set_response_timeout(None)
    }
}

#[async_trait]
impl CacheConnector for CacheHandler {
    async fn connect(&self) -> Result<Box<dyn CacheStore>, CacheError> {
        let conn = self
            .client
            .get_multiplexed_async_connection_with_config(&self.session_config())
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CacheError::Timeout(self.connect_timeout)
                } else {
                    CacheError::Connection(format!("{}: {}", self.endpoint, e))
                }
            })?;

        debug!("Opened cache session to {}", self.endpoint);
        Ok(Box::new(CacheSession { conn }))
    }
}

/// A single session; the connection closes when this is dropped.
pub struct CacheSession {
    conn: MultiplexedConnection,
}

#[async_trait]
impl CacheStore for CacheSession {
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        self.conn
            .get::<_, Option<String>>(key)
            .await
            .map_err(|e| command_error("GET", e))
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.conn
            .set::<_, _, ()>(key, value)
            .await
            .map_err(|e| command_error("SET", e))
    }

    async fn list_keys(&mut self, pattern: &str) -> Result<Vec<String>, CacheError> {
        let mut keys = self
            .conn
            .keys::<_, Vec<String>>(pattern)
            .await
            .map_err(|e| command_error("KEYS", e))?;
        keys.sort();
        Ok(keys)
    }

    async fn ping(&mut self) -> Result<(), CacheError> {
        redis::cmd("PING")
            .query_async::<String>(&mut self.conn)
            .await
            .map(|_| ())
            .map_err(|e| command_error("PING", e))
    }
}

/// Transport failures stay connection errors; anything the server rejected is a command error.
fn command_error(op: &str, e: RedisError) -> CacheError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_timeout() {
        CacheError::Connection(format!("{} failed: {}", op, e))
    } else {
        CacheError::Command(format!("{} failed: {}", op, e))
    }
}
