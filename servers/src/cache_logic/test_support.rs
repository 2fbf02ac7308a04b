//! Test doubles shared by the handler and router tests.

use async_trait::async_trait;
use axum::response::Response;
use lib_common::CacheError;
use lib_common::connections::{CacheConnector, CacheStore};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::state::AppState;

/// In-memory stand-in for the cache; `*` is the only pattern it understands.
#[derive(Default)]
pub struct MemoryConnector {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    open_sessions: Arc<AtomicUsize>,
}

struct MemorySession {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
    open_sessions: Arc<AtomicUsize>,
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CacheConnector for MemoryConnector {
    async fn connect(&self) -> Result<Box<dyn CacheStore>, CacheError> {
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemorySession {
            entries: self.entries.clone(),
            open_sessions: self.open_sessions.clone(),
        }))
    }
}

#[async_trait]
impl CacheStore for MemorySession {
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries.lock().unwrap().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn list_keys(&mut self, pattern: &str) -> Result<Vec<String>, CacheError> {
        assert_eq!(pattern, "*");
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }

    async fn ping(&mut self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Connector whose every connect attempt fails with the given error.
pub struct FailingConnector(pub CacheError);

#[async_trait]
impl CacheConnector for FailingConnector {
    async fn connect(&self) -> Result<Box<dyn CacheStore>, CacheError> {
        Err(self.0.clone())
    }
}

/// State backed by a fresh [`MemoryConnector`], plus its open-session counter.
pub fn memory_state() -> (AppState, Arc<AtomicUsize>) {
    let connector = MemoryConnector::default();
    let open = connector.open_sessions.clone();
    (AppState::new(Arc::new(connector)), open)
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

