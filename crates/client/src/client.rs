//! reqwest wrapper for the admin API.

use std::marker::PhantomData;
use std::sync::Arc;

use reqwest::{Method, Response, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use storedash_core::Entity;
use storedash_core::query::Pagination;
use storedash_core::reports::{
    AnalyticsReport, CustomerSummary, HealthStatus, RevenuePeriod, RevenueSeries, TimeRange,
};
use storedash_core::StoreId;

use crate::error::{ClientError, ClientResult};

/// Query string for list endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(self, page: u32) -> Self {
        self.filter("page", page)
    }

    #[must_use]
    pub fn limit(self, limit: u32) -> Self {
        self.filter("limit", limit)
    }

    /// Add a filter such as `status=active` or `storeId=2`.
    #[must_use]
    pub fn filter(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T: DeserializeOwned> Page<T> {
    /// Split a `{<key>: [...], pagination}` body.
    fn from_body(mut body: Value, key: &str) -> ClientResult<Self> {
        let items = body
            .get_mut(key)
            .map(Value::take)
            .ok_or_else(|| ClientError::InvalidResponse(format!("missing `{key}` in list body")))?;
        let pagination = body
            .get_mut("pagination")
            .map(Value::take)
            .ok_or_else(|| ClientError::InvalidResponse("missing `pagination`".to_string()))?;
        Ok(Self {
            items: serde_json::from_value(items)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?,
            pagination: serde_json::from_value(pagination)
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?,
        })
    }
}

/// Admin API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client for a server root such as `http://127.0.0.1:8000`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidResponse` for an unparseable URL, or an HTTP error if
    /// the client fails to build.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::InvalidResponse(format!("invalid base URL {base_url}: {e}")))?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("storedash-client/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            inner: Arc::new(ApiClientInner { client, base_url }),
        })
    }

    /// Typed CRUD access to one collection.
    #[must_use]
    pub fn entity<E: Entity>(&self) -> EntityApi<E> {
        EntityApi {
            client: self.clone(),
            _entity: PhantomData,
        }
    }

    fn url(&self, path: &str, query: &[(String, String)]) -> ClientResult<Url> {
        let mut url = self
            .inner
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidResponse(format!("invalid path {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&B>,
    ) -> ClientResult<Response> {
        let url = self.url(path, query)?;
        tracing::debug!(%method, %url, "API request");
        let mut request = self.inner.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(parse_error(response).await)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ClientResult<T> {
        let response = self.send::<()>(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    /// `GET /api/analytics`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn analytics(
        &self,
        store_id: Option<StoreId>,
        time_range: TimeRange,
    ) -> ClientResult<AnalyticsReport> {
        let mut query = ListQuery::new().filter("timeRange", time_range_param(time_range));
        if let Some(store_id) = store_id {
            query = query.filter("storeId", store_id);
        }
        self.get_json("/api/analytics", query.params()).await
    }

    /// `GET /api/analytics/revenue`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn revenue(
        &self,
        store_id: Option<StoreId>,
        period: RevenuePeriod,
    ) -> ClientResult<RevenueSeries> {
        let period = match period {
            RevenuePeriod::Daily => "daily",
            RevenuePeriod::Monthly => "monthly",
        };
        let mut query = ListQuery::new().filter("period", period);
        if let Some(store_id) = store_id {
            query = query.filter("storeId", store_id);
        }
        self.get_json("/api/analytics/revenue", query.params()).await
    }

    /// `GET /api/customers`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn customers(&self, query: &ListQuery) -> ClientResult<Page<CustomerSummary>> {
        let body: Value = self.get_json("/api/customers", query.params()).await?;
        Page::from_body(body, "customers")
    }

    /// `GET /api/health`.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or unhealthy.
    pub async fn health(&self) -> ClientResult<HealthStatus> {
        self.get_json("/api/health", &[]).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

const fn time_range_param(time_range: TimeRange) -> &'static str {
    match time_range {
        TimeRange::Week => "week",
        TimeRange::Month => "month",
        TimeRange::Year => "year",
    }
}

/// Turn a failed response into `ClientError::Api`, using the `{error}` body.
async fn parse_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(str::to_string))
        .unwrap_or(text);
    ClientError::Api { status, message }
}

/// CRUD calls for one entity collection.
pub struct EntityApi<E> {
    client: ApiClient,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for EntityApi<E> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> std::fmt::Debug for EntityApi<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityApi").finish_non_exhaustive()
    }
}

impl<E: Entity> EntityApi<E> {
    fn base_path() -> String {
        format!("/api/{}", E::COLLECTION.as_str())
    }

    fn item_path(id: E::Id) -> String {
        format!("/api/{}/{id}", E::COLLECTION.as_str())
    }

    /// `GET /api/{collection}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is malformed.
    pub async fn list(&self, query: &ListQuery) -> ClientResult<Page<E>> {
        let body: Value = self
            .client
            .get_json(&Self::base_path(), query.params())
            .await?;
        Page::from_body(body, E::COLLECTION.list_key())
    }

    /// `GET /api/{collection}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `Api { status: 404, .. }` for an unknown id.
    pub async fn get(&self, id: E::Id) -> ClientResult<E> {
        self.client.get_json(&Self::item_path(id), &[]).await
    }

    /// `POST /api/{collection}`.
    ///
    /// # Errors
    ///
    /// Returns `Api { status: 400, .. }` when the server rejects the input.
    pub async fn create(&self, input: &E::Create) -> ClientResult<E> {
        let response = self
            .client
            .send(Method::POST, &Self::base_path(), &[], Some(input))
            .await?;
        Ok(response.json().await?)
    }

    /// `PUT /api/{collection}/{id}` with a partial body.
    ///
    /// # Errors
    ///
    /// Returns `Api { status: 404, .. }` for an unknown id.
    pub async fn update(&self, id: E::Id, patch: &E::Patch) -> ClientResult<E> {
        let response = self
            .client
            .send(Method::PUT, &Self::item_path(id), &[], Some(patch))
            .await?;
        Ok(response.json().await?)
    }

    /// `DELETE /api/{collection}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns `Api { status: 404, .. }` for an unknown id.
    pub async fn delete(&self, id: E::Id) -> ClientResult<()> {
        self.client
            .send::<()>(Method::DELETE, &Self::item_path(id), &[], None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use storedash_core::Product;

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("http://127.0.0.1:8000").unwrap();
        let query = ListQuery::new().page(2).limit(5).filter("search", "usb c");
        let url = client.url("/api/products", query.params()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/products?page=2&limit=5&search=usb+c"
        );
    }

    #[test]
    fn test_item_path() {
        assert_eq!(
            EntityApi::<Product>::item_path(storedash_core::ProductId::new(7)),
            "/api/products/7"
        );
    }

    #[test]
    fn test_page_from_body() {
        let body = json!({
            "items": [1, 2],
            "pagination": {"total": 2, "page": 1, "limit": 20, "pages": 1}
        });
        let page: Page<u32> = Page::from_body(body, "items").unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.pagination.pages, 1);

        let missing = Page::<u32>::from_body(json!({"pagination": {}}), "items");
        assert!(matches!(missing, Err(ClientError::InvalidResponse(_))));
    }
}
