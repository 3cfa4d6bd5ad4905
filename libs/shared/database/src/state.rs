use std::sync::Arc;

use tracing::info;

use shared_config::{AppConfig, StoreBackend};

use crate::memory::InMemoryStore;
use crate::postgrest::SupabaseStore;
use crate::store::DocumentStore;

/// Shared state handed to every router: configuration plus the one store
/// all requests read and write.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Opens the backend selected by `config.store_backend`.
    pub fn from_config(config: AppConfig) -> Self {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Memory => {
                info!("Using in-memory document store");
                Arc::new(InMemoryStore::new())
            }
            StoreBackend::Supabase => {
                info!("Using Supabase document store at {}", config.supabase_url);
                Arc::new(SupabaseStore::new(&config))
            }
        };

        Self::new(config, store)
    }
}
