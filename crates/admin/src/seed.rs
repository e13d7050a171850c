//! Demo data for local development.
//!
//! Three stores, five categories, four attributes, five products, four orders,
//! four users and three inventory records. Records go through the regular
//! repositories, so defaults, validation and unique keys apply.

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tracing::instrument;

use storedash_core::{
    Attribute, Category, Collection, Entity, InventoryItem, Order, Product, Store,
    UpdateStoreInput, User,
};

use crate::db::{DocumentStore, Repository, Result};

/// What to do with existing records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedMode {
    /// Clear every collection first.
    #[default]
    Replace,
    /// Leave a non-empty store untouched.
    KeepExisting,
}

/// Record counts written by [`seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub stores: usize,
    pub categories: usize,
    pub attributes: usize,
    pub products: usize,
    pub orders: usize,
    pub users: usize,
    pub inventory: usize,
}

impl SeedSummary {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.stores
            + self.categories
            + self.attributes
            + self.products
            + self.orders
            + self.users
            + self.inventory
    }
}

/// Load the demo data set.
///
/// # Errors
///
/// Returns an error if the store fails or a record is rejected.
#[instrument(skip(store))]
pub async fn seed(store: Arc<dyn DocumentStore>, mode: SeedMode) -> Result<SeedSummary> {
    match mode {
        SeedMode::Replace => {
            for collection in Collection::ALL {
                store.clear(collection).await?;
            }
            tracing::info!("Cleared existing data");
        }
        SeedMode::KeepExisting => {
            for collection in Collection::ALL {
                if !store.list(collection).await?.is_empty() {
                    tracing::info!(%collection, "Store already has data, skipping seed");
                    return Ok(SeedSummary::default());
                }
            }
        }
    }

    let stores = create_all::<Store>(&store, stores()).await?;
    let categories = create_all::<Category>(&store, categories()).await?;
    let attributes = create_all::<Attribute>(&store, attributes()).await?;
    let products = create_all::<Product>(&store, products()).await?;
    let store_id = |index: usize| stores.get(index).map(|s| s.id.as_i32());
    let product_id = |index: usize| products.get(index).map(|p| p.id.as_i32());
    let users = create_all::<User>(&store, users(&store_id)).await?;
    let orders = create_all::<Order>(&store, orders(&store_id, &product_id)).await?;
    assign_store_admins(&store, &stores, &users).await?;
    let inventory = create_all::<InventoryItem>(&store, inventory(&products)).await?;

    let summary = SeedSummary {
        stores: stores.len(),
        categories: categories.len(),
        attributes: attributes.len(),
        products: products.len(),
        orders: orders.len(),
        users: users.len(),
        inventory: inventory.len(),
    };
    tracing::info!(records = summary.total(), "Seeded demo data");
    Ok(summary)
}

async fn create_all<E: Entity>(store: &Arc<dyn DocumentStore>, inputs: Vec<Value>) -> Result<Vec<E>> {
    let repo = Repository::<E>::new(Arc::clone(store));
    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        created.push(repo.create(serde_json::from_value(input)?).await?);
    }
    Ok(created)
}

/// Point the first two stores at their seeded store admins.
async fn assign_store_admins(
    store: &Arc<dyn DocumentStore>,
    stores: &[Store],
    users: &[User],
) -> Result<()> {
    let repo = Repository::<Store>::new(Arc::clone(store));
    for (store_index, user_index) in [(0, 1), (1, 2)] {
        let (Some(target), Some(admin)) = (stores.get(store_index), users.get(user_index)) else {
            continue;
        };
        let patch = UpdateStoreInput {
            store_admin_id: Some(Some(admin.id)),
            ..Default::default()
        };
        repo.update(target.id, patch).await?;
    }
    Ok(())
}

fn stores() -> Vec<Value> {
    vec![
        json!({
            "name": "Main Store NY",
            "slug": "main-store-ny",
            "location": "123 Broadway, New York",
            "address": "123 Broadway",
            "city": "New York",
            "state": "NY",
            "zip": "10001",
            "phone": "+1-212-555-0001",
            "email": "ny@jordanstore.com",
            "status": "active",
            "storeAdminName": "John Store Admin",
            "totalOrders": 1250,
            "totalRevenue": 125_000,
            "activeEditors": 3,
        }),
        json!({
            "name": "Boston Store",
            "slug": "boston-store",
            "location": "456 Market St, Boston",
            "address": "456 Market St",
            "city": "Boston",
            "state": "MA",
            "zip": "02101",
            "phone": "+1-617-555-0002",
            "email": "boston@jordanstore.com",
            "status": "active",
            "storeAdminName": "Sarah Manager",
            "totalOrders": 890,
            "totalRevenue": 89_000,
            "activeEditors": 2,
        }),
        json!({
            "name": "LA Store",
            "slug": "la-store",
            "location": "789 Sunset Blvd, Los Angeles",
            "address": "789 Sunset Blvd",
            "city": "Los Angeles",
            "state": "CA",
            "zip": "90001",
            "phone": "+1-323-555-0003",
            "email": "la@jordanstore.com",
            "status": "active",
            "storeAdminName": "Mike Johnson",
            "totalOrders": 1560,
            "totalRevenue": 156_000,
            "activeEditors": 4,
        }),
    ]
}

fn categories() -> Vec<Value> {
    [
        ("Electronics", "Electronic devices and gadgets"),
        ("Clothing", "Fashion and apparel"),
        ("Home & Kitchen", "Home essentials and kitchen items"),
        ("Books", "Books and publications"),
        ("Sports", "Sports equipment and gear"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, description))| {
        json!({
            "name": name,
            "description": description,
            "status": "active",
            "order": i,
        })
    })
    .collect()
}

fn attributes() -> Vec<Value> {
    vec![
        json!({"name": "Color", "type": "color", "options": "Red,Blue,Green,Black,White"}),
        json!({"name": "Size", "type": "size", "options": "S,M,L,XL,XXL"}),
        json!({"name": "Material", "type": "text", "options": "Cotton,Polyester,Leather,Metal"}),
        json!({"name": "Brand", "type": "select", "options": "Apple,Samsung,Nike,Adidas"}),
    ]
}

fn products() -> Vec<Value> {
    vec![
        json!({
            "title": "Laptop Pro 15",
            "description": "High-performance laptop for professionals",
            "price": 1299.99,
            "salePrice": 1199.99,
            "costPrice": 900,
            "stock": 45,
            "sku": "LAP-PRO-15",
            "category": "Electronics",
            "brand": "TechBrand",
            "weight": 2.5,
            "featured": true,
        }),
        json!({
            "title": "Wireless Mouse",
            "description": "Ergonomic wireless mouse",
            "price": 29.99,
            "stock": 120,
            "sku": "MOUSE-WL-01",
            "category": "Electronics",
            "brand": "TechBrand",
        }),
        json!({
            "title": "Running Shoes",
            "description": "Comfortable running shoes",
            "price": 89.99,
            "salePrice": 79.99,
            "stock": 80,
            "sku": "SHOE-RUN-01",
            "category": "Sports",
            "brand": "SportsBrand",
        }),
        json!({
            "title": "Coffee Maker",
            "description": "Automatic coffee maker",
            "price": 149.99,
            "stock": 35,
            "sku": "COFFEE-AUTO-01",
            "category": "Home & Kitchen",
        }),
        json!({
            "title": "USB-C Cable",
            "description": "Fast charging USB-C cable",
            "price": 9.99,
            "stock": 200,
            "sku": "CABLE-USBC-01",
            "category": "Electronics",
        }),
    ]
}

/// Orders spread over the last two weeks so the charts have data.
fn orders(
    store_id: &dyn Fn(usize) -> Option<i32>,
    product_id: &dyn Fn(usize) -> Option<i32>,
) -> Vec<Value> {
    let now = Utc::now();
    let placed = |days: i64| (now - Duration::days(days)).to_rfc3339();
    vec![
        json!({
            "customer_name": "John Doe",
            "customer_email": "john@example.com",
            "customer_phone": "+1-555-0001",
            "total": 99.99,
            "status": "pending",
            "storeId": store_id(0),
            "items": [{"productId": product_id(1), "productName": "Wireless Mouse", "quantity": 1, "price": 29.99}],
            "paymentStatus": "paid",
            "createdAt": placed(0),
        }),
        json!({
            "customer_name": "Jane Smith",
            "customer_email": "jane@example.com",
            "customer_phone": "+1-555-0002",
            "total": 249.99,
            "status": "shipped",
            "storeId": store_id(1),
            "items": [{"productId": product_id(2), "productName": "Running Shoes", "quantity": 2, "price": 79.99}],
            "paymentStatus": "paid",
            "createdAt": placed(3),
        }),
        json!({
            "customer_name": "Bob Johnson",
            "customer_email": "bob@example.com",
            "customer_phone": "+1-555-0003",
            "total": 149.99,
            "status": "delivered",
            "storeId": store_id(0),
            "items": [{"productId": product_id(3), "productName": "Coffee Maker", "quantity": 1, "price": 149.99}],
            "paymentStatus": "paid",
            "createdAt": placed(6),
        }),
        json!({
            "customer_name": "Sarah Williams",
            "customer_email": "sarah@example.com",
            "customer_phone": "+1-555-0004",
            "total": 179.99,
            "status": "processing",
            "storeId": store_id(2),
            "items": [{"productId": product_id(2), "productName": "Running Shoes", "quantity": 2, "price": 79.99}],
            "paymentStatus": "pending",
            "createdAt": placed(12),
        }),
    ]
}

fn users(store_id: &dyn Fn(usize) -> Option<i32>) -> Vec<Value> {
    vec![
        json!({"name": "Super Admin", "email": "admin@example.com", "role": "super_admin"}),
        json!({"name": "John Store Admin", "email": "john@store.com", "role": "store_admin", "storeId": store_id(0)}),
        json!({"name": "Sarah Manager", "email": "sarah@store.com", "role": "store_admin", "storeId": store_id(1)}),
        json!({"name": "Editor User", "email": "editor@store.com", "role": "editor", "storeId": store_id(0)}),
    ]
}

fn inventory(products: &[Product]) -> Vec<Value> {
    [(0, "Warehouse A", 10), (1, "Warehouse A", 20), (4, "Warehouse B", 50)]
        .into_iter()
        .filter_map(|(index, location, threshold)| {
            products.get(index).map(|p| {
                json!({
                    "productId": p.id,
                    "sku": p.sku,
                    "stock": p.stock,
                    "location": location,
                    "lowStockThreshold": threshold,
                })
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use storedash_core::InventoryStatus;

    #[tokio::test]
    async fn test_seed_populates_every_collection() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let summary = seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                stores: 3,
                categories: 5,
                attributes: 4,
                products: 5,
                orders: 4,
                users: 4,
                inventory: 3,
            }
        );

        let items = Repository::<InventoryItem>::new(Arc::clone(&store))
            .list()
            .await
            .unwrap();
        assert!(items.iter().all(|i| i.status == InventoryStatus::InStock));

        let categories = Repository::<Category>::new(store).list().await.unwrap();
        assert_eq!(categories[2].slug, "home-kitchen");
    }

    #[tokio::test]
    async fn test_reseed_replaces_data() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();
        seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();

        let products = Repository::<Product>::new(store).list().await.unwrap();
        assert_eq!(products.len(), 5);
        // Ids are not reused after a clear.
        assert_eq!(products[0].id.as_i32(), 6);
    }

    #[tokio::test]
    async fn test_reseed_links_records_it_created() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();
        seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();

        let stores = Repository::<Store>::new(Arc::clone(&store)).list().await.unwrap();
        let users = Repository::<User>::new(Arc::clone(&store)).list().await.unwrap();
        let orders = Repository::<Order>::new(Arc::clone(&store)).list().await.unwrap();
        let store_ids: Vec<_> = stores.iter().map(|s| s.id).collect();
        let user_ids: Vec<_> = users.iter().map(|u| u.id).collect();
        assert_eq!(store_ids.first().map(|id| id.as_i32()), Some(4));

        assert!(orders.iter().all(|o| store_ids.contains(&o.store_id)));
        assert!(
            users
                .iter()
                .filter_map(|u| u.store_id)
                .all(|id| store_ids.contains(&id))
        );

        let admins: Vec<_> = stores.iter().map(|s| s.store_admin_id).collect();
        assert_eq!(admins, vec![user_ids.get(1).copied(), user_ids.get(2).copied(), None]);
        let john = users.iter().find(|u| u.email.as_str() == "john@store.com").unwrap();
        assert_eq!(john.store_id, Some(stores[0].id));
        assert_eq!(stores[0].store_admin_id, Some(john.id));
    }

    #[tokio::test]
    async fn test_keep_existing_skips_non_empty_store() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        seed(Arc::clone(&store), SeedMode::Replace).await.unwrap();
        let summary = seed(Arc::clone(&store), SeedMode::KeepExisting).await.unwrap();
        assert_eq!(summary.total(), 0);
    }
}
