//! Application state management

use std::sync::Arc;

use crate::clock::MonotonicClock;
use crate::config::Config;
use crate::sessions::SessionRegistry;
use crate::storage::BlobStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    blob_store: BlobStore,
    registry: SessionRegistry,
    clock: MonotonicClock,
    public_base_url: String,
}

impl AppState {
    /// Create a new application state
    ///
    /// `public_base_url` is the `http://host:port` prefix used when building
    /// download URLs for uploaded files.
    pub fn new(
        config: Config,
        blob_store: BlobStore,
        registry: SessionRegistry,
        public_base_url: String,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                blob_store,
                registry,
                clock: MonotonicClock::new(),
                public_base_url,
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the blob store
    pub fn blob_store(&self) -> &BlobStore {
        &self.inner.blob_store
    }

    /// Get the session registry
    pub fn registry(&self) -> &SessionRegistry {
        &self.inner.registry
    }

    pub fn clock(&self) -> &MonotonicClock {
        &self.inner.clock
    }

    pub fn public_base_url(&self) -> &str {
        &self.inner.public_base_url
    }

    /// Public download URL for a stored blob
    pub fn blob_url(&self, stored_name: &str) -> String {
        format!("{}/uploads/{}", self.public_base_url(), stored_name)
    }
}
