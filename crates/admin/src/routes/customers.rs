//! Customer route handlers.
//!
//! Customers are not stored; they are derived from orders on every request.

use axum::{Json, Router, extract::State, routing::get};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use storedash_core::query::search_term;
use storedash_core::{Order, StoreId};

use super::crud::{PageParams, list_body};
use crate::error::AppError;
use crate::extract::{ApiQuery, parse_filter};
use crate::services::customers::{derive_customers, matches_search};
use crate::state::AppState;

/// Default page size of the customer list.
const DEFAULT_PAGE_SIZE: u32 = 50;

/// `GET /api/customers` query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub store_id: Option<String>,
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

#[instrument(skip(state))]
async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CustomerQuery>,
) -> Result<Json<Value>, AppError> {
    let store_id = parse_filter::<StoreId>("storeId", query.store_id.as_deref())?;
    let page = query.page.to_request(DEFAULT_PAGE_SIZE)?;
    let search = search_term(query.search.as_deref());

    let orders = state.repo::<Order>().list().await?;
    let customers: Vec<_> = derive_customers(&orders, store_id)
        .into_iter()
        .filter(|c| search.is_none_or(|term| matches_search(c, term)))
        .collect();

    let (customers, pagination) = page.paginate(customers);
    Ok(Json(list_body("customers", &customers, pagination)?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/customers", get(list))
}
