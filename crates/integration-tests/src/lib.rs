//! Integration tests for Storedash.
//!
//! Each test starts its own admin server on an ephemeral port and talks to it
//! over real HTTP, either with raw `reqwest` calls or through
//! `storedash-client`.
//!
//! # Running Tests
//!
//! ```bash
//! # In-memory tests
//! cargo test -p storedash-integration-tests
//!
//! # Including PostgreSQL tests
//! STOREDASH_TEST_DATABASE_URL=postgres://... \
//!     cargo test -p storedash-integration-tests -- --include-ignored
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use secrecy::SecretString;
use tokio::task::JoinHandle;

use storedash_admin::db::{self, DocumentStore, PostgresStore};
use storedash_admin::seed::{self, SeedMode};
use storedash_admin::AppState;
use storedash_client::ApiClient;

/// An admin server running on `127.0.0.1` for the lifetime of the value.
pub struct TestServer {
    addr: SocketAddr,
    state: AppState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server over an empty in-memory store.
    pub async fn start() -> Self {
        Self::with_state(AppState::in_memory()).await
    }

    /// Start a server over an in-memory store holding the demo data.
    ///
    /// # Panics
    ///
    /// Panics if seeding fails.
    pub async fn seeded() -> Self {
        let state = AppState::in_memory();
        seed::seed(Arc::clone(state.store()), SeedMode::Replace)
            .await
            .expect("Failed to seed demo data");
        Self::with_state(state).await
    }

    /// Start a server over the given state.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn with_state(state: AppState) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let app = storedash_admin::app(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server failed");
        });
        Self {
            addr,
            state,
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Typed client pointed at this server.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url()).expect("Failed to create API client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// `STOREDASH_TEST_DATABASE_URL`, if set.
#[must_use]
pub fn test_database_url() -> Option<SecretString> {
    std::env::var("STOREDASH_TEST_DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

/// A migrated `PostgreSQL` store from `STOREDASH_TEST_DATABASE_URL`.
///
/// # Panics
///
/// Panics if the variable is unset or the database is unreachable.
pub async fn postgres_store() -> Arc<dyn DocumentStore> {
    let url = test_database_url().expect("STOREDASH_TEST_DATABASE_URL not set");
    let pool = db::create_pool(&url)
        .await
        .expect("Failed to connect to test database");
    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    Arc::new(PostgresStore::new(pool))
}

/// An address nothing is listening on.
///
/// # Panics
///
/// Panics if no local port can be bound.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind throwaway listener");
    let addr = listener.local_addr().expect("Listener has no address");
    drop(listener);
    format!("http://{addr}")
}
