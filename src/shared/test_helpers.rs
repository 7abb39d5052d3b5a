use std::sync::Arc;

use axum::Router;

use crate::features::records::CrudEngine;
use crate::modules::persistence::MemoryProvider;
use crate::modules::storage::MemoryStorage;

/// Engine wired to in-memory backends, with handles kept for failure
/// injection and inspection
pub struct TestContext {
    pub provider: Arc<MemoryProvider>,
    pub storage: Arc<MemoryStorage>,
    pub engine: Arc<CrudEngine>,
}

impl TestContext {
    pub fn new() -> Self {
        let provider = Arc::new(MemoryProvider::new());
        let storage = Arc::new(MemoryStorage::new());
        let engine = Arc::new(CrudEngine::new(provider.clone(), storage.clone()));
        Self {
            provider,
            storage,
            engine,
        }
    }

    /// The full API router (records and directory) over this context's engine
    pub fn router(&self) -> Router {
        crate::features::api_routes(Arc::clone(&self.engine), 10 * 1024 * 1024)
    }
}
