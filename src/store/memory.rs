use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Process-local key-value backend
///
/// Clones share the same map. Intended for local development and tests.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    pub async fn put(&self, key: &str, value: String) {
        self.inner.write().await.insert(key.to_string(), value);
    }
}
