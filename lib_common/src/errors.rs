//! # Cache Errors
//!
//! Error taxonomy shared by the connection resolver and the cache adapter.

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while resolving or talking to the cache.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The connection string is missing or malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// TLS, authentication or network failure while connecting or talking to the store.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The connect deadline elapsed before a session was established.
    #[error("Connection timed out after {0:?}")]
    Timeout(Duration),

    /// The store accepted the connection but rejected a command.
    #[error("Command error: {0}")]
    Command(String),
}

impl CacheError {
    /// Short machine-readable name, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CacheError::Configuration(_) => "ConfigurationError",
            CacheError::Connection(_) => "ConnectionError",
            CacheError::Timeout(_) => "ConnectionTimeout",
            CacheError::Command(_) => "CommandError",
        }
    }
}
