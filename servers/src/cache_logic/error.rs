use axum::{
    Json,
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lib_common::CacheError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// # Application Error
///
/// Everything a cache handler can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Error from the connection resolver or the cache adapter.
    #[error(transparent)]
    Cache(#[from] CacheError),
    /// The query string or body does not fit `CacheParams`.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    /// Converts an `AppError` into a JSON error response with a status code
    /// matching the failure class.
    fn into_response(self) -> Response {
        let (status, error_json) = match self {
            AppError::Cache(e) => {
                let status = match &e {
                    CacheError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
                    CacheError::Connection(_) | CacheError::Command(_) => StatusCode::BAD_GATEWAY,
                    CacheError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                };
                error!("Cache error: {}", e);
                (
                    status,
                    json!({
                        "error_type": e.kind(),
                        "message": "The cache request could not be completed.",
                        "detail": e.to_string()
                    }),
                )
            }
            AppError::InvalidRequest(detail) => {
                warn!("Rejected request: {}", detail);
                (
                    StatusCode::BAD_REQUEST,
                    json!({
                        "error_type": "InvalidRequest",
                        "message": "cachekey and value must be single strings in the query or a JSON object body.",
                        "detail": detail
                    }),
                )
            }
        };
        (status, Json(error_json)).into_response()
    }
}
