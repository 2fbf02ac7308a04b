//! # Configuration Modules
//!
//! This module aggregates the configuration providers used by the servers.

/// Parses cache connection strings into a typed connection descriptor.
pub mod config_cache;
