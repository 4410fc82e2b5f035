//! Shared state handed to every tool invocation.

use dialog_rs_config::DialogConfig;
use dialog_rs_store::{DialogStore, QueryEngine, QueryLimits, StoreError};
use std::path::Path;

/// Store handles shared by all tools.
///
/// Cloning is cheap: the store and query engine only hold a root path and an
/// `Arc`ed write lock.
#[derive(Debug, Clone)]
pub struct ToolContext {
    store: DialogStore,
    query: QueryEngine,
}

impl ToolContext {
    /// Build a context over an opened store.
    pub fn new(store: DialogStore, limits: QueryLimits) -> Self {
        let query = QueryEngine::new(store.clone(), limits);
        Self { store, query }
    }

    /// Open the configured storage root and apply the configured limits.
    pub fn from_config(config: &DialogConfig) -> Result<Self, StoreError> {
        let store = DialogStore::open(config.storage_root())?;
        let limits = QueryLimits {
            default_limit: Some(config.query.default_limit),
            max_limit: config.query.max_limit,
        };
        Ok(Self::new(store, limits))
    }

    /// Dialog store.
    pub fn store(&self) -> &DialogStore {
        &self.store
    }

    /// Query engine over the same store.
    pub fn query(&self) -> &QueryEngine {
        &self.query
    }

    /// Storage root directory.
    pub fn storage_path(&self) -> &Path {
        self.store.root()
    }
}
