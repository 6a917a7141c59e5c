//! Content store accessor over a key-value backend.
//!
//! Two records live in the backend, `pages` and `config`, each stored as one
//! serialized JSON document. Every save rewrites the whole record; there is no
//! locking, so concurrent writers race and the last write wins.

pub mod memory;
pub mod spanner;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::config::{Config, StoreBackend};
use crate::defaults::DefaultContent;
use crate::models::{Pages, SiteConfig};

pub use memory::MemoryStore;
pub use spanner::SpannerClient;

pub const PAGES_KEY: &str = "pages";
pub const CONFIG_KEY: &str = "config";

/// Key-value backend holding serialized records
#[derive(Clone)]
pub enum KvBackend {
    Spanner(SpannerClient),
    Memory(MemoryStore),
}

impl KvBackend {
    /// Connect to the backend selected in the configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        match config.store_backend {
            StoreBackend::Spanner => {
                let spanner = config
                    .spanner
                    .as_ref()
                    .context("Spanner backend selected without Spanner settings")?;
                Ok(KvBackend::Spanner(SpannerClient::from_config(spanner).await?))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store, content is lost on restart");
                Ok(KvBackend::Memory(MemoryStore::new()))
            }
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        match self {
            KvBackend::Spanner(client) => client.read(key).await,
            KvBackend::Memory(store) => Ok(store.get(key).await),
        }
    }

    pub async fn put(&self, key: &str, value: String) -> Result<()> {
        match self {
            KvBackend::Spanner(client) => client.upsert(key, &value).await,
            KvBackend::Memory(store) => {
                store.put(key, value).await;
                Ok(())
            }
        }
    }

    pub async fn health_check(&self) -> Result<()> {
        match self {
            KvBackend::Spanner(client) => client.health_check().await,
            KvBackend::Memory(_) => Ok(()),
        }
    }
}

/// Loads and saves the `pages` and `config` records
#[derive(Clone)]
pub struct ContentStore {
    backend: KvBackend,
    defaults: Arc<DefaultContent>,
}

impl ContentStore {
    pub fn new(backend: KvBackend, defaults: DefaultContent) -> Self {
        ContentStore {
            backend,
            defaults: Arc::new(defaults),
        }
    }

    /// Persisted pages, or the default pages when none were ever saved
    pub async fn load_pages(&self) -> Result<Pages> {
        match self.backend.get(PAGES_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to deserialize pages record"),
            None => {
                tracing::debug!("No pages record, serving defaults");
                Ok(self.defaults.pages())
            }
        }
    }

    pub async fn save_pages(&self, pages: &Pages) -> Result<()> {
        let raw = serde_json::to_string(pages).context("Failed to serialize pages record")?;
        self.backend.put(PAGES_KEY, raw).await?;
        tracing::debug!("Saved {} pages", pages.len());
        Ok(())
    }

    /// Persisted configuration, or the default configuration
    pub async fn load_config(&self) -> Result<SiteConfig> {
        match self.backend.get(CONFIG_KEY).await? {
            Some(raw) => serde_json::from_str(&raw).context("Failed to deserialize config record"),
            None => {
                tracing::debug!("No config record, serving defaults");
                Ok(self.defaults.config())
            }
        }
    }

    pub async fn save_config(&self, config: &SiteConfig) -> Result<()> {
        let raw = serde_json::to_string(config).context("Failed to serialize config record")?;
        self.backend.put(CONFIG_KEY, raw).await?;
        tracing::debug!("Saved config record");
        Ok(())
    }
}
