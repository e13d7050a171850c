//! Application state shared across handlers.

use std::sync::Arc;

use storedash_core::Entity;

use crate::config::StorageConfig;
use crate::db::{self, DocumentStore, MemoryStore, PostgresStore, Repository};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn DocumentStore>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { store }),
        }
    }

    /// Open the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns `sqlx::Error` if the `PostgreSQL` pool cannot be created.
    pub async fn connect(storage: &StorageConfig) -> Result<Self, sqlx::Error> {
        let store: Arc<dyn DocumentStore> = match storage {
            StorageConfig::Memory => {
                tracing::warn!("Using in-memory storage; data is lost on restart");
                Arc::new(MemoryStore::new())
            }
            StorageConfig::Postgres { database_url } => {
                let pool = db::create_pool(database_url).await?;
                tracing::info!("Database pool created");
                Arc::new(PostgresStore::new(pool))
            }
        };
        Ok(Self::new(store))
    }

    /// State over a fresh, empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.inner.store
    }

    /// Typed repository for one entity.
    #[must_use]
    pub fn repo<E: Entity>(&self) -> Repository<E> {
        Repository::new(Arc::clone(&self.inner.store))
    }
}
