pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

#[cfg(test)]
mod test_support;

use axum::{Router, routing::get};

use handlers::{inspect_cache, set_cache, status};
use state::AppState;

/// Builds the router. Cache routes are served both at the root and under
/// `/api`, the serverless host's default route prefix.
pub fn router(state: AppState) -> Router {
    let cache_routes = Router::new()
        .route("/InspectCache", get(inspect_cache).post(inspect_cache))
        .route("/SetCache", get(set_cache).post(set_cache));

    Router::new()
        .merge(cache_routes.clone())
        .nest("/api", cache_routes)
        .route("/status", get(status))
        .with_state(state)
}
