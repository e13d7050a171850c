//! Inventory routes.
//!
//! Reads embed a short summary of the referenced product; writes return the
//! plain inventory record.

use std::collections::HashMap;

use axum::{Json, Router, extract::State, routing::get};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use storedash_core::{Entity, InventoryId, InventoryItem, InventoryStatus, Product, ProductId};

use super::crud::{self, ListFilter, PageParams};
use crate::error::AppError;
use crate::extract::{ApiPath, ApiQuery, parse_filter};
use crate::state::AppState;

/// `GET /api/inventory` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub status: Option<String>,
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

impl ListFilter<InventoryItem> for InventoryQuery {
    fn page(&self) -> &PageParams {
        &self.page
    }

    fn apply(&self, records: Vec<InventoryItem>) -> Result<Vec<InventoryItem>, AppError> {
        let status = parse_filter::<InventoryStatus>("status", self.status.as_deref())?;
        let product_id = parse_filter::<ProductId>("productId", self.product_id.as_deref())?;

        let mut items: Vec<InventoryItem> = records
            .into_iter()
            .filter(|i| status.is_none_or(|s| i.status == s))
            .filter(|i| product_id.is_none_or(|p| i.product_id == p))
            .collect();

        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(items)
    }
}

/// Product fields shown next to a stock record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub title: String,
    pub sku: Option<String>,
    pub price: Decimal,
}

impl From<&Product> for ProductSummary {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            sku: product.sku.clone(),
            price: product.price,
        }
    }
}

/// An inventory record with its product embedded.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryView {
    #[serde(flatten)]
    pub item: InventoryItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<ProductSummary>,
}

async fn product_index(state: &AppState) -> Result<HashMap<ProductId, ProductSummary>, AppError> {
    Ok(state
        .repo::<Product>()
        .list()
        .await?
        .iter()
        .map(|p| (p.id, ProductSummary::from(p)))
        .collect())
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<InventoryQuery>,
) -> Result<Json<Value>, AppError> {
    let (items, pagination) = crud::filtered_page::<InventoryItem, _>(&state, &query).await?;
    let products = product_index(&state).await?;

    let views: Vec<InventoryView> = items
        .into_iter()
        .map(|item| InventoryView {
            product: products.get(&item.product_id).cloned(),
            item,
        })
        .collect();

    Ok(Json(crud::list_body(
        InventoryItem::COLLECTION.list_key(),
        &views,
        pagination,
    )?))
}

#[instrument(skip(state))]
async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<InventoryView>, AppError> {
    let item = state
        .repo::<InventoryItem>()
        .find(InventoryId::new(id))
        .await?
        .ok_or_else(|| AppError::not_found(InventoryItem::COLLECTION))?;
    let product = state
        .repo::<Product>()
        .find(item.product_id)
        .await?
        .as_ref()
        .map(ProductSummary::from);

    Ok(Json(InventoryView { item, product }))
}

pub fn router() -> Router<AppState> {
    let (base, item) = crud::paths::<InventoryItem>();
    Router::new()
        .route(&base, get(list).post(crud::create::<InventoryItem>))
        .route(
            &item,
            get(get_one)
                .put(crud::update::<InventoryItem>)
                .delete(crud::delete::<InventoryItem>),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use storedash_core::CreateInventoryInput;

    fn item(id: i32, product: i32, stock: i32) -> InventoryItem {
        let input: CreateInventoryInput = serde_json::from_value(json!({
            "productId": product,
            "sku": format!("SKU-{id}"),
            "stock": stock,
        }))
        .unwrap();
        InventoryItem::from_create(InventoryId::new(id), input, Utc::now()).unwrap()
    }

    #[test]
    fn test_status_filter() {
        let records = vec![item(1, 1, 50), item(2, 2, 3), item(3, 3, 0)];
        let query = InventoryQuery {
            status: Some("low_stock".into()),
            ..Default::default()
        };
        let result = query.apply(records).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, InventoryId::new(2));
    }

    #[test]
    fn test_view_embeds_product() {
        let view = InventoryView {
            item: item(1, 7, 25),
            product: Some(ProductSummary {
                id: ProductId::new(7),
                title: "Laptop Pro".into(),
                sku: Some("LAP-PRO-15".into()),
                price: Decimal::new(129_999, 2),
            }),
        };
        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["productId"], 7);
        assert_eq!(body["stock"], 25);
        assert_eq!(body["product"]["title"], "Laptop Pro");
        assert_eq!(body["product"]["price"], 1299.99);
    }
}
