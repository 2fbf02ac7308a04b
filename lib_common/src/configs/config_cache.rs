//! # Cache Connection Configuration
//!
//! Resolves the managed-cache connection string (`CACHE_CONNSTR`) into a typed
//! [`ConnectionDescriptor`]. The accepted format is the one managed Redis
//! offerings hand out:
//!
//! ```text
//! <host>:<port>,password=<secret>[,ssl=True][,abortConnect=False]
//! ```
//!
//! The descriptor is built once at startup and handed to the cache adapter.

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::errors::CacheError;

/// Name of the environment variable carrying the connection string.
pub const CACHE_CONNSTR_VAR: &str = "CACHE_CONNSTR";

/// Endpoint and credential for the backing cache.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    /// Cache host name, also used as the TLS server name.
    pub host: String,
    /// Cache port (6380 for TLS endpoints on most managed offerings).
    pub port: u16,
    /// Pre-shared password forwarded with `AUTH`.
    pub password: String,
    /// Whether to connect over TLS (`rediss://`).
    pub tls: bool,
}

impl ConnectionDescriptor {
    /// Resolves an optional raw connection string.
    ///
    /// `None` means the variable was never provided and is reported as a
    /// configuration error, same as a malformed string.
    pub fn resolve(raw: Option<&str>) -> Result<Self, CacheError> {
        let raw = raw.ok_or_else(|| {
            CacheError::Configuration(format!("{} is not set", CACHE_CONNSTR_VAR))
        })?;
        Self::parse(raw)
    }

    /// Parses `host:port,password=<secret>[,...]`.
    pub fn parse(raw: &str) -> Result<Self, CacheError> {
        let mut segments = raw.split(',');

        // // Statement: The first segment is always the endpoint.
        let endpoint = segments.next().unwrap_or_default().trim();
        let (host, port) = endpoint.rsplit_once(':').ok_or_else(|| {
            CacheError::Configuration(format!(
                "endpoint segment '{}' is not in host:port form",
                endpoint
            ))
        })?;

        let host = host.trim();
        if host.is_empty() {
            return Err(CacheError::Configuration("host is empty".to_string()));
        }

        let port = port.trim().parse::<u16>().map_err(|e| {
            CacheError::Configuration(format!("invalid port '{}': {}", port.trim(), e))
        })?;

        let mut password = None;
        let mut tls = true;

        // // Statement: Remaining segments are key=value options; unknown keys are ignored.
        for segment in segments {
            let Some((key, value)) = segment.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.eq_ignore_ascii_case("password") {
                password = Some(value.to_string());
            } else if key.eq_ignore_ascii_case("ssl") {
                tls = parse_flag(key, value)?;
            }
        }

        let password = password.ok_or_else(|| {
            CacheError::Configuration("connection string has no password= token".to_string())
        })?;
        if password.is_empty() {
            return Err(CacheError::Configuration("password is empty".to_string()));
        }

        Ok(Self {
            host: host.to_string(),
            port,
            password,
            tls,
        })
    }

    /// URL scheme matching the transport.
    pub fn scheme(&self) -> &'static str {
        if self.tls {
            "rediss"
        } else {
            "redis"
        }
    }

    /// Renders the client URL `rediss://:<password>@host:port`.
    ///
    /// The password is percent-encoded so secrets containing `@`, `/` or `:`
    /// survive the round trip through the client's URL parser.
    pub fn client_url(&self) -> Result<Url, CacheError> {
        let mut url = Url::parse(&format!("{}://{}:{}", self.scheme(), self.host, self.port))
            .map_err(|e| CacheError::Configuration(format!("invalid cache endpoint: {}", e)))?;
        url.set_password(Some(&self.password)).map_err(|_| {
            CacheError::Configuration("cache endpoint cannot carry credentials".to_string())
        })?;
        Ok(url)
    }

    /// `host:port` for log lines.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromStr for ConnectionDescriptor {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"*****")
            .field("tls", &self.tls)
            .finish()
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, CacheError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(CacheError::Configuration(format!(
            "{} expects True or False, got '{}'",
            key, value
        )))
    }
}
