//! # lib_common
//!
//! Shared building blocks for the cache inspection servers: connection-string
//! resolution (`configs`) and the Redis cache adapter (`connections`).
//! Each folder is gated behind the Cargo feature of the same name.

#[cfg(feature = "configs")]
pub mod errors;

#[cfg(feature = "configs")]
pub mod configs;

#[cfg(feature = "connections")]
pub mod connections;

#[cfg(feature = "configs")]
pub use errors::CacheError;
