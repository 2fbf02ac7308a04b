//! # Cache Handlers
//!
//! `InspectCache` reads a key (or lists every key), `SetCache` writes a key and
//! reads it back. Each request opens its own cache session, which is dropped
//! (and its connection closed) on every return path.

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::AppError;
use super::model::{CacheParams, DEFAULT_CACHE_KEY, DEFAULT_CACHE_VALUE, StatusResponse};
use super::state::AppState;

/// # Inspect Cache Handler
///
/// `GET|POST /InspectCache`.
///
/// With a `cachekey`, responds with the stored value as plain text (empty when
/// the key is unset). Without one, responds with a JSON array of every key.
/// Both cases are 200.
pub async fn inspect_cache(
    State(state): State<AppState>,
    query: Result<Query<CacheParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    info!("InspectCache processed a request.");
    let Query(query) = query?;
    let params = query.merge(CacheParams::from_body(&body)?);

    let mut store = state.connector.connect().await?;
    match params.cachekey {
        Some(key) => {
            let value = store.get(&key).await?;
            debug!("GET {} -> {}", key, if value.is_some() { "hit" } else { "miss" });
            Ok(value.unwrap_or_default().into_response())
        }
        None => {
            let keys = store.list_keys("*").await?;
            debug!("KEYS * -> {} keys", keys.len());
            Ok(Json(keys).into_response())
        }
    }
}

/// # Set Cache Handler
///
/// `GET|POST /SetCache`.
///
/// Writes `value` under `cachekey` (defaults `SetCacheKey` / `SetCacheValue`),
/// then reads the key back and responds with what the store returned.
pub async fn set_cache(
    State(state): State<AppState>,
    query: Result<Query<CacheParams>, QueryRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    info!("SetCache processed a request.");
    let Query(query) = query?;
    let params = query.merge(CacheParams::from_body(&body)?);
    let key = params.cachekey.unwrap_or_else(|| DEFAULT_CACHE_KEY.to_string());
    let value = params.value.unwrap_or_else(|| DEFAULT_CACHE_VALUE.to_string());

    let mut store = state.connector.connect().await?;
    store.set(&key, &value).await?;
    let stored = store.get(&key).await?;
    if stored.as_deref() != Some(value.as_str()) {
        // Another writer got in between SET and GET.
        warn!("Read-after-write mismatch on key {}", key);
    }
    Ok(stored.unwrap_or_default().into_response())
}

/// `GET /status`: server timestamp plus whether the cache answers `PING`.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let cache_up = match state.connector.connect().await {
        Ok(mut store) => store.ping().await.is_ok(),
        Err(e) => {
            warn!("Status check could not reach the cache: {}", e);
            false
        }
    };
    Json(StatusResponse {
        ts: Utc::now().to_rfc3339(),
        cache: if cache_up { "up" } else { "down" },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache_logic::test_support::{FailingConnector, body_text, memory_state};
    use axum::http::StatusCode;
    use lib_common::CacheError;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn query(key: Option<&str>, value: Option<&str>) -> Result<Query<CacheParams>, QueryRejection> {
        Ok(Query(CacheParams {
            cachekey: key.map(str::to_string),
            value: value.map(str::to_string),
        }))
    }

    fn expect_err(result: Result<Response, AppError>) -> AppError {
        match result {
            Ok(response) => panic!("expected an error, got {}", response.status()),
            Err(e) => e,
        }
    }

    #[tokio::test]
    async fn test_set_then_inspect_returns_value() {
        let (state, _) = memory_state();

        let set = set_cache(State(state.clone()), query(Some("k1"), Some("v1")), Bytes::new())
            .await
            .unwrap();
        assert_eq!(set.status(), StatusCode::OK);
        assert_eq!(body_text(set).await, "v1");

        let got = inspect_cache(State(state), query(Some("k1"), None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(got.status(), StatusCode::OK);
        assert_eq!(body_text(got).await, "v1");
    }

    #[tokio::test]
    async fn test_inspect_without_key_lists_all_keys() {
        let (state, _) = memory_state();
        for key in ["k1", "k2"] {
            set_cache(State(state.clone()), query(Some(key), Some("v")), Bytes::new())
                .await
                .unwrap();
        }

        let listing = inspect_cache(State(state), query(None, None), Bytes::new())
            .await
            .unwrap();
        let keys: Vec<String> = serde_json::from_str(&body_text(listing).await).unwrap();
        assert!(keys.contains(&"k1".to_string()));
        assert!(keys.contains(&"k2".to_string()));
    }

    #[tokio::test]
    async fn test_set_without_params_uses_defaults() {
        let (state, _) = memory_state();

        let set = set_cache(State(state.clone()), query(None, None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(body_text(set).await, DEFAULT_CACHE_VALUE);

        let got = inspect_cache(State(state), query(Some(DEFAULT_CACHE_KEY), None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(body_text(got).await, "SetCacheValue");
    }

    #[tokio::test]
    async fn test_repeated_set_is_last_write_wins() {
        let (state, _) = memory_state();
        for value in ["first", "second"] {
            set_cache(State(state.clone()), query(Some("k1"), Some(value)), Bytes::new())
                .await
                .unwrap();
        }

        let got = inspect_cache(State(state), query(Some("k1"), None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(body_text(got).await, "second");
    }

    #[tokio::test]
    async fn test_json_body_supplies_params() {
        let (state, _) = memory_state();
        let body = Bytes::from_static(br#"{"cachekey":"fromBody","value":"bodyValue"}"#);

        let set = set_cache(State(state.clone()), query(None, None), body)
            .await
            .unwrap();
        assert_eq!(body_text(set).await, "bodyValue");

        let body = Bytes::from_static(br#"{"cachekey":"fromBody"}"#);
        let got = inspect_cache(State(state), query(None, None), body).await.unwrap();
        assert_eq!(body_text(got).await, "bodyValue");
    }

    #[tokio::test]
    async fn test_missing_key_is_ok_with_empty_body() {
        let (state, _) = memory_state();
        let got = inspect_cache(State(state), query(Some("nope"), None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(got.status(), StatusCode::OK);
        assert_eq!(body_text(got).await, "");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let (state, open) = memory_state();
        let err = expect_err(
            set_cache(State(state), query(None, None), Bytes::from_static(b"not json")).await,
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        // Rejected before any session was opened.
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_sessions_are_released_after_each_request() {
        let (state, open) = memory_state();
        set_cache(State(state.clone()), query(Some("k1"), Some("v1")), Bytes::new())
            .await
            .unwrap();
        inspect_cache(State(state), query(None, None), Bytes::new())
            .await
            .unwrap();
        assert_eq!(open.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_connection_failures_map_to_gateway_errors() {
        let refused = AppState::new(Arc::new(FailingConnector(CacheError::Connection(
            "refused".into(),
        ))));
        let err = expect_err(
            inspect_cache(State(refused), query(Some("k1"), None), Bytes::new()).await,
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);

        let slow = AppState::new(Arc::new(FailingConnector(CacheError::Timeout(
            Duration::from_secs(10),
        ))));
        let err = expect_err(set_cache(State(slow), query(None, None), Bytes::new()).await);
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[tokio::test]
    async fn test_status_reports_cache_health() {
        let (state, _) = memory_state();
        let up: serde_json::Value =
            serde_json::from_str(&body_text(status(State(state)).await.into_response()).await)
                .unwrap();
        assert_eq!(up["cache"], "up");

        let down = AppState::new(Arc::new(FailingConnector(CacheError::Connection(
            "refused".into(),
        ))));
        let response = status(State(down)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["cache"], "down");
    }
}
