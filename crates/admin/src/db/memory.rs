//! In-memory `DocumentStore`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use storedash_core::{Collection, UniqueKey};

use super::{Document, DocumentStore, RepositoryError, Result};

#[derive(Debug, Default)]
struct CollectionData {
    docs: BTreeMap<i32, (Value, Vec<UniqueKey>)>,
    /// `(field, value)` to owning id.
    keys: HashMap<(&'static str, String), i32>,
    last_id: i32,
}

impl CollectionData {
    fn check_keys(&self, id: i32, keys: &[UniqueKey]) -> Result<()> {
        for key in keys {
            let owner = self.keys.get(&(key.field, key.value.clone()));
            if owner.is_some_and(|&owner| owner != id) {
                return Err(RepositoryError::Conflict(key.field.to_owned()));
            }
        }
        Ok(())
    }

    fn index(&mut self, id: i32, keys: &[UniqueKey]) {
        for key in keys {
            self.keys.insert((key.field, key.value.clone()), id);
        }
    }

    fn unindex(&mut self, keys: &[UniqueKey]) {
        for key in keys {
            self.keys.remove(&(key.field, key.value.clone()));
        }
    }
}

/// Document store kept entirely in process memory.
///
/// Nothing survives a restart. Each collection is guarded by the same lock,
/// so the unique-key check and the write happen atomically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, CollectionData>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn next_id(&self, collection: Collection) -> Result<i32> {
        let mut collections = self.collections.write().await;
        let data = collections.entry(collection).or_default();
        data.last_id = data
            .last_id
            .checked_add(1)
            .ok_or_else(|| RepositoryError::DataCorruption(format!("{collection} ids exhausted")))?;
        Ok(data.last_id)
    }

    async fn find(&self, collection: Collection, id: i32) -> Result<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|data| data.docs.get(&id))
            .map(|(body, _)| body.clone()))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|data| data.docs.values().map(|(body, _)| body.clone()).collect())
            .unwrap_or_default())
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let data = collections.entry(collection).or_default();

        if data.docs.contains_key(&document.id) {
            return Err(RepositoryError::Conflict("id".to_owned()));
        }
        data.check_keys(document.id, &document.unique_keys)?;

        data.index(document.id, &document.unique_keys);
        data.last_id = data.last_id.max(document.id);
        data.docs
            .insert(document.id, (document.body, document.unique_keys));
        Ok(())
    }

    async fn replace(&self, collection: Collection, document: Document) -> Result<()> {
        let mut collections = self.collections.write().await;
        let data = collections
            .get_mut(&collection)
            .ok_or(RepositoryError::NotFound)?;

        let old_keys = match data.docs.get(&document.id) {
            Some((_, keys)) => keys.clone(),
            None => return Err(RepositoryError::NotFound),
        };
        data.check_keys(document.id, &document.unique_keys)?;

        data.unindex(&old_keys);
        data.index(document.id, &document.unique_keys);
        data.docs
            .insert(document.id, (document.body, document.unique_keys));
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: i32) -> Result<bool> {
        let mut collections = self.collections.write().await;
        let Some(data) = collections.get_mut(&collection) else {
            return Ok(false);
        };
        match data.docs.remove(&id) {
            Some((_, keys)) => {
                data.unindex(&keys);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear(&self, collection: Collection) -> Result<()> {
        let mut collections = self.collections.write().await;
        if let Some(data) = collections.get_mut(&collection) {
            data.docs.clear();
            data.keys.clear();
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: i32, sku: &str) -> Document {
        Document {
            id,
            body: json!({"id": id, "sku": sku}),
            unique_keys: vec![UniqueKey::new("sku", sku)],
        }
    }

    #[tokio::test]
    async fn test_ids_are_never_reused() {
        let store = MemoryStore::new();
        let first = store.next_id(Collection::Products).await.unwrap();
        store
            .insert(Collection::Products, doc(first, "A"))
            .await
            .unwrap();
        assert!(store.delete(Collection::Products, first).await.unwrap());

        let second = store.next_id(Collection::Products).await.unwrap();
        assert!(second > first);

        store.clear(Collection::Products).await.unwrap();
        assert!(store.next_id(Collection::Products).await.unwrap() > second);
    }

    #[tokio::test]
    async fn test_ids_are_per_collection() {
        let store = MemoryStore::new();
        assert_eq!(store.next_id(Collection::Products).await.unwrap(), 1);
        assert_eq!(store.next_id(Collection::Products).await.unwrap(), 2);
        assert_eq!(store.next_id(Collection::Stores).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_keys_conflict_case_insensitively() {
        let store = MemoryStore::new();
        store
            .insert(Collection::Products, doc(1, "SKU-1"))
            .await
            .unwrap();

        let err = store
            .insert(Collection::Products, doc(2, "sku-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(field) if field == "sku"));

        // Other collections have their own key space.
        store.insert(Collection::Inventory, doc(1, "SKU-1")).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_releases_old_keys() {
        let store = MemoryStore::new();
        store.insert(Collection::Products, doc(1, "A")).await.unwrap();
        store.replace(Collection::Products, doc(1, "B")).await.unwrap();

        // "A" is free again, "B" is taken.
        store.insert(Collection::Products, doc(2, "A")).await.unwrap();
        assert!(store.insert(Collection::Products, doc(3, "B")).await.is_err());

        // Keeping your own key is not a conflict.
        store.replace(Collection::Products, doc(1, "B")).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_unknown_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .replace(Collection::Orders, doc(9, "X"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let store = MemoryStore::new();
        for id in [3, 1, 2] {
            store
                .insert(Collection::Orders, doc(id, &id.to_string()))
                .await
                .unwrap();
        }
        let ids: Vec<i64> = store
            .list(Collection::Orders)
            .await
            .unwrap()
            .iter()
            .map(|v| v["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_delete_unknown_is_false() {
        let store = MemoryStore::new();
        assert!(!store.delete(Collection::Users, 1).await.unwrap());
    }
}
