//! Load the demo data set into `PostgreSQL`.
//!
//! Runs the same seed as the in-memory server: three stores, five categories,
//! four attributes, five products, four orders, four users and three
//! inventory records.

use std::sync::Arc;

use storedash_admin::config::require_database_url;
use storedash_admin::db::{self, DocumentStore, PostgresStore};
use storedash_admin::seed::{self, SeedMode};
use tracing::info;

/// Seed the database behind `STOREDASH_DATABASE_URL`.
///
/// With `keep_existing`, a database that already holds records is left alone;
/// otherwise every collection is cleared first.
///
/// # Errors
///
/// Returns an error if the URL is missing, the connection fails, or a record
/// is rejected.
pub async fn demo_data(keep_existing: bool) -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = require_database_url("STOREDASH_DATABASE_URL")?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let store: Arc<dyn DocumentStore> = Arc::new(PostgresStore::new(pool));
    let mode = if keep_existing {
        SeedMode::KeepExisting
    } else {
        SeedMode::Replace
    };

    info!(?mode, "Starting seeding process");
    let summary = seed::seed(store, mode).await?;

    info!(
        stores = summary.stores,
        categories = summary.categories,
        attributes = summary.attributes,
        products = summary.products,
        orders = summary.orders,
        users = summary.users,
        inventory = summary.inventory,
        "Seeding complete"
    );

    Ok(())
}
