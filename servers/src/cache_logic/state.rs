use lib_common::connections::CacheConnector;
use std::sync::Arc;

/// Shared, read-only state handed to every handler.
///
/// Only the connector is shared; each request opens its own session.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn CacheConnector>,
}

impl AppState {
    pub fn new(connector: Arc<dyn CacheConnector>) -> Self {
        Self { connector }
    }
}
