//! `PostgreSQL` `DocumentStore`.
//!
//! Queries are built at runtime (no `query!` macros), so the crate builds
//! without a live database.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};

use storedash_core::{Collection, UniqueKey};

use super::{Document, DocumentStore, RepositoryError, Result};

/// Document store backed by the `storedash` schema.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Map a unique violation to a conflict on `field`; pass anything else through.
fn conflict_on(field: &str, err: sqlx::Error) -> RepositoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            RepositoryError::Conflict(field.to_owned())
        }
        _ => RepositoryError::Database(err),
    }
}

async fn insert_keys(
    tx: &mut Transaction<'_, Postgres>,
    collection: Collection,
    id: i32,
    keys: &[UniqueKey],
) -> Result<()> {
    for key in keys {
        sqlx::query(
            r"
            INSERT INTO storedash.unique_keys (collection, field, value, id)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(collection.as_str())
        .bind(key.field)
        .bind(&key.value)
        .bind(id)
        .execute(&mut **tx)
        .await
        .map_err(|e| conflict_on(key.field, e))?;
    }
    Ok(())
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn next_id(&self, collection: Collection) -> Result<i32> {
        let id = sqlx::query_scalar::<_, i32>(
            r"
            INSERT INTO storedash.sequences (collection, last_id)
            VALUES ($1, 1)
            ON CONFLICT (collection)
            DO UPDATE SET last_id = storedash.sequences.last_id + 1
            RETURNING last_id
            ",
        )
        .bind(collection.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn find(&self, collection: Collection, id: i32) -> Result<Option<Value>> {
        let body = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM storedash.documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        let bodies = sqlx::query_scalar::<_, Value>(
            "SELECT body FROM storedash.documents WHERE collection = $1 ORDER BY id",
        )
        .bind(collection.as_str())
        .fetch_all(&self.pool)
        .await?;
        Ok(bodies)
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r"
            INSERT INTO storedash.documents (collection, id, body)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(collection.as_str())
        .bind(document.id)
        .bind(&document.body)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_on("id", e))?;

        insert_keys(&mut tx, collection, document.id, &document.unique_keys).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn replace(&self, collection: Collection, document: Document) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r"
            UPDATE storedash.documents
            SET body = $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection.as_str())
        .bind(document.id)
        .bind(&document.body)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM storedash.unique_keys WHERE collection = $1 AND id = $2")
            .bind(collection.as_str())
            .bind(document.id)
            .execute(&mut *tx)
            .await?;

        insert_keys(&mut tx, collection, document.id, &document.unique_keys).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: i32) -> Result<bool> {
        let result =
            sqlx::query("DELETE FROM storedash.documents WHERE collection = $1 AND id = $2")
                .bind(collection.as_str())
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        sqlx::query("DELETE FROM storedash.documents WHERE collection = $1")
            .bind(collection.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
