//! Persistence for the admin API.
//!
//! Every entity is a JSON document in a named collection. [`DocumentStore`]
//! is the storage seam with two backends:
//!
//! - [`MemoryStore`] - in-process maps, used for local development and tests
//! - [`PostgresStore`] - `storedash.documents` JSONB rows in `PostgreSQL`
//!
//! [`Repository`] layers typed entity access (defaults, validation, partial
//! merges, unique keys) over whichever backend is configured.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p storedash-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;
pub mod repository;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde_json::Value;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use storedash_core::{Collection, UniqueKey, ValidationError};

pub use memory::MemoryStore;
pub use postgres::PostgresStore;
pub use repository::Repository;

/// Embedded schema migrations for [`PostgresStore`].
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A record could not be converted to or from JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested record was not found.
    #[error("not found")]
    NotFound,

    /// Unique key violation (e.g., duplicate sku).
    #[error("{0} already exists")]
    Conflict(String),

    /// The input failed entity validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;

/// A record ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i32,
    pub body: Value,
    pub unique_keys: Vec<UniqueKey>,
}

/// Storage for collections of JSON documents keyed by numeric id.
///
/// # Implementations
///
/// - `MemoryStore`: in-process, lost on restart
/// - `PostgresStore`: `PostgreSQL` JSONB rows
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<()>;

    /// Allocate the next id for a collection.
    ///
    /// Ids increase monotonically and are never handed out twice, even after
    /// the record holding one is deleted.
    async fn next_id(&self, collection: Collection) -> Result<i32>;

    /// Fetch one document body.
    async fn find(&self, collection: Collection, id: i32) -> Result<Option<Value>>;

    /// Every document body in the collection, in id order.
    async fn list(&self, collection: Collection) -> Result<Vec<Value>>;

    /// Store a new document.
    ///
    /// Fails with [`RepositoryError::Conflict`] when one of its unique keys is
    /// already held by another document.
    async fn insert(&self, collection: Collection, document: Document) -> Result<()>;

    /// Overwrite an existing document and its unique keys.
    ///
    /// Fails with [`RepositoryError::NotFound`] for an unknown id and with
    /// [`RepositoryError::Conflict`] when a key belongs to another document.
    async fn replace(&self, collection: Collection, document: Document) -> Result<()>;

    /// Remove a document. Returns `false` when the id is unknown.
    async fn delete(&self, collection: Collection, id: i32) -> Result<bool>;

    /// Remove every document in the collection. The id sequence is kept.
    async fn clear(&self, collection: Collection) -> Result<()>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> std::result::Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
