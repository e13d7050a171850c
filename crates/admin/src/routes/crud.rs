//! Generic CRUD handlers shared by every entity collection.
//!
//! ```text
//! GET    /api/{collection}       - Filtered, paginated list
//! POST   /api/{collection}       - Create (201)
//! GET    /api/{collection}/{id}  - Fetch one
//! PUT    /api/{collection}/{id}  - Partial update
//! DELETE /api/{collection}/{id}  - Delete (204)
//! ```

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use tracing::instrument;

use storedash_core::Entity;
use storedash_core::query::{PageRequest, Pagination};

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// `page` / `limit` query parameters, kept as text so bad values become 400s.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    /// Normalize against a default page size.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when `page` or `limit` is not an integer.
    pub fn to_request(&self, default_limit: u32) -> Result<PageRequest, AppError> {
        let page = parse_count("page", self.page.as_deref())?;
        let limit = parse_count("limit", self.limit.as_deref())?;
        Ok(PageRequest::new(page, limit, default_limit))
    }
}

/// Parse an integer parameter, clamping negatives to zero.
fn parse_count(name: &str, raw: Option<&str>) -> Result<Option<u32>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(|n| Some(u32::try_from(n.max(0)).unwrap_or(u32::MAX)))
            .map_err(|_| AppError::BadRequest(format!("invalid {name}: {value}"))),
    }
}

/// Filtering and ordering for one collection's list endpoint.
pub trait ListFilter<E>: DeserializeOwned + Send + 'static {
    /// Pagination parameters of the request.
    fn page(&self) -> &PageParams;

    /// Keep the matching records and put them in response order.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` when a filter value does not parse.
    fn apply(&self, records: Vec<E>) -> Result<Vec<E>, AppError>;
}

/// Build `{ <list key>: [...], pagination: {...} }`.
///
/// # Errors
///
/// Returns `Internal` if a record cannot be serialized.
pub fn list_body<T: Serialize>(
    list_key: &str,
    records: &[T],
    pagination: Pagination,
) -> Result<Value, AppError> {
    let mut body = Map::new();
    body.insert(
        list_key.to_owned(),
        serde_json::to_value(records).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    body.insert(
        "pagination".to_owned(),
        serde_json::to_value(pagination).map_err(|e| AppError::Internal(e.to_string()))?,
    );
    Ok(Value::Object(body))
}

/// Load, filter and paginate a collection.
///
/// # Errors
///
/// Propagates storage and filter errors.
pub async fn filtered_page<E, Q>(state: &AppState, query: &Q) -> Result<(Vec<E>, Pagination), AppError>
where
    E: Entity,
    Q: ListFilter<E>,
{
    let page = query.page().to_request(E::COLLECTION.default_page_size())?;
    let records = state.repo::<E>().list().await?;
    let matching = query.apply(records)?;
    Ok(page.paginate(matching))
}

#[instrument(skip(state, query), fields(collection = %E::COLLECTION))]
pub async fn list<E, Q>(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<Q>,
) -> Result<Json<Value>, AppError>
where
    E: Entity,
    Q: ListFilter<E> + std::fmt::Debug + Sync,
{
    let (records, pagination) = filtered_page::<E, Q>(&state, &query).await?;
    Ok(Json(list_body(E::COLLECTION.list_key(), &records, pagination)?))
}

#[instrument(skip(state), fields(collection = %E::COLLECTION))]
pub async fn get_one<E: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<E>, AppError> {
    state
        .repo::<E>()
        .find(E::Id::from(id))
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(E::COLLECTION))
}

#[instrument(skip(state, input), fields(collection = %E::COLLECTION))]
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<E::Create>,
) -> Result<(StatusCode, Json<E>), AppError> {
    let record = state.repo::<E>().create(input).await?;
    tracing::info!(id = %record.id(), "Created record");
    Ok((StatusCode::CREATED, Json(record)))
}

#[instrument(skip(state, patch), fields(collection = %E::COLLECTION))]
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(patch): ApiJson<E::Patch>,
) -> Result<Json<E>, AppError> {
    state
        .repo::<E>()
        .update(E::Id::from(id), patch)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(E::COLLECTION))
}

#[instrument(skip(state), fields(collection = %E::COLLECTION))]
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<StatusCode, AppError> {
    if state.repo::<E>().delete(E::Id::from(id)).await? {
        tracing::info!(id, "Deleted record");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(E::COLLECTION))
    }
}

/// Paths for a collection: `/api/{name}` and `/api/{name}/{id}`.
#[must_use]
pub fn paths<E: Entity>() -> (String, String) {
    let base = format!("/api/{}", E::COLLECTION.as_str());
    let item = format!("{base}/{{id}}");
    (base, item)
}

/// The five CRUD routes for an entity with list filter `Q`.
pub fn router<E, Q>() -> Router<AppState>
where
    E: Entity,
    Q: ListFilter<E> + std::fmt::Debug + Sync,
{
    let (base, item) = paths::<E>();
    Router::new()
        .route(&base, get(list::<E, Q>).post(create::<E>))
        .route(
            &item,
            get(get_one::<E>).put(update::<E>).delete(delete::<E>),
        )
}
