//! Typed entity access over a [`DocumentStore`].

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::instrument;

use storedash_core::Entity;

use super::{Document, DocumentStore, RepositoryError, Result};

/// CRUD for one entity type.
///
/// Applies the entity's defaults and validation on create, merges partial
/// updates into the stored record, and passes unique keys to the store.
pub struct Repository<E> {
    store: Arc<dyn DocumentStore>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for Repository<E> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Repository<E> {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    fn decode(body: Value) -> Result<E> {
        serde_json::from_value(body).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid {} record: {e}", E::COLLECTION))
        })
    }

    fn encode(entity: &E) -> Result<Document> {
        Ok(Document {
            id: entity.id().into(),
            body: serde_json::to_value(entity)?,
            unique_keys: entity.unique_keys(),
        })
    }

    /// Get a record by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or the stored record is corrupt.
    pub async fn find(&self, id: E::Id) -> Result<Option<E>> {
        self.store
            .find(E::COLLECTION, id.into())
            .await?
            .map(Self::decode)
            .transpose()
    }

    /// Every record of the collection in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails or a stored record is corrupt.
    pub async fn list(&self) -> Result<Vec<E>> {
        self.store
            .list(E::COLLECTION)
            .await?
            .into_iter()
            .map(Self::decode)
            .collect()
    }

    /// Create a record with a freshly allocated id.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for invalid input, `Conflict` when a unique key
    /// is taken, or a store error.
    #[instrument(skip(self, input), fields(collection = %E::COLLECTION))]
    pub async fn create(&self, input: E::Create) -> Result<E> {
        let id = self.store.next_id(E::COLLECTION).await?;
        let entity = E::from_create(E::Id::from(id), input, Utc::now())?;
        self.store
            .insert(E::COLLECTION, Self::encode(&entity)?)
            .await?;
        tracing::debug!(id, "record created");
        Ok(entity)
    }

    /// Merge a partial update into an existing record.
    ///
    /// Returns `None` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for invalid fields, `Conflict` when a unique key
    /// is taken by another record, or a store error.
    #[instrument(skip(self, patch), fields(collection = %E::COLLECTION))]
    pub async fn update(&self, id: E::Id, patch: E::Patch) -> Result<Option<E>> {
        let Some(mut entity) = self.find(id).await? else {
            return Ok(None);
        };
        entity.apply_patch(patch, Utc::now())?;

        match self
            .store
            .replace(E::COLLECTION, Self::encode(&entity)?)
            .await
        {
            Ok(()) => Ok(Some(entity)),
            // Deleted between the read and the write.
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Delete a record. Returns `false` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    #[instrument(skip(self), fields(collection = %E::COLLECTION))]
    pub async fn delete(&self, id: E::Id) -> Result<bool> {
        self.store.delete(E::COLLECTION, id.into()).await
    }
}
