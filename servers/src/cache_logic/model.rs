use serde::{Deserialize, Serialize};

use super::error::AppError;

/// Key written by SetCache when the request names none.
pub const DEFAULT_CACHE_KEY: &str = "SetCacheKey";
/// Value written by SetCache when the request names none.
pub const DEFAULT_CACHE_VALUE: &str = "SetCacheValue";

/// Parameters accepted by both cache handlers, from the query string or a JSON body.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheParams {
    pub cachekey: Option<String>,
    pub value: Option<String>,
}

impl CacheParams {
    /// Parses an optional JSON body. An empty or whitespace-only body carries no parameters.
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| AppError::InvalidRequest(e.to_string()))
    }

    /// Combines query parameters with body parameters; the query wins field by field.
    /// Empty strings count as absent.
    pub fn merge(self, body: CacheParams) -> CacheParams {
        CacheParams {
            cachekey: non_empty(self.cachekey).or_else(|| non_empty(body.cachekey)),
            value: non_empty(self.value).or_else(|| non_empty(body.value)),
        }
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

/// Body of `GET /status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub ts: String,
    pub cache: &'static str,
}
