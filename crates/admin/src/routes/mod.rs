//! HTTP route handlers for the admin API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                    - Liveness
//! GET  /health/ready              - Readiness (store ping)
//! GET  /api/health                - JSON health status
//!
//! # Entities (list, create, get, update, delete)
//! /api/products[/{id}]
//! /api/categories[/{id}]
//! /api/attributes[/{id}]
//! /api/orders[/{id}]
//! /api/stores[/{id}]
//! /api/users[/{id}]
//! /api/inventory[/{id}]
//!
//! # Aggregates
//! GET  /api/analytics             - Dashboard summary
//! GET  /api/analytics/revenue     - Revenue series
//! GET  /api/customers             - Customers derived from orders
//! ```

pub mod analytics;
pub mod attributes;
pub mod categories;
pub mod crud;
pub mod customers;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod stores;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::AppError;
use crate::state::AppState;

/// Every route, without middleware.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(categories::router())
        .merge(attributes::router())
        .merge(orders::router())
        .merge(stores::router())
        .merge(users::router())
        .merge(inventory::router())
        .merge(analytics::router())
        .merge(customers::router())
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}

async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// The complete application: routes, JSON fallbacks, tracing and CORS.
pub fn app(state: AppState) -> Router {
    routes()
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_product_crud_round() {
        let app = app(AppState::in_memory());

        let (status, created) = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({"title": "Mouse", "price": 29.99})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["title"], "Mouse");
        assert_eq!(created["price"], 29.99);
        assert_eq!(created["stock"], 0);
        assert_eq!(created["category"], "");

        let uri = format!("/api/products/{}", created["id"]);
        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, updated) = send(&app, "PUT", &uri, Some(json!({"stock": 5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["stock"], 5);
        assert_eq!(updated["title"], "Mouse");

        let (status, body) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, body) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Product not found"}));
    }

    #[tokio::test]
    async fn test_validation_and_bad_json() {
        let app = app(AppState::in_memory());

        let (status, body) = send(&app, "POST", "/api/products", Some(json!({"price": 5}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({"title": "Mouse", "price": -1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "price cannot be negative");

        let (status, _) = send(&app, "GET", "/api/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unique_sku_conflict() {
        let app = app(AppState::in_memory());
        let product = json!({"title": "Mouse", "price": 10, "sku": "M-1"});

        let (status, _) = send(&app, "POST", "/api/products", Some(product.clone())).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, body) = send(&app, "POST", "/api/products", Some(product)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "sku already exists");
    }

    #[tokio::test]
    async fn test_fallbacks() {
        let app = app(AppState::in_memory());

        let (status, body) = send(&app, "GET", "/api/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Route not found"}));

        let (status, body) = send(&app, "PATCH", "/api/products", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"error": "Method not allowed"}));
    }

    #[tokio::test]
    async fn test_list_pagination_and_filters() {
        let app = app(AppState::in_memory());
        for (name, store) in [("Ann", 1), ("Ben", 2), ("Cat", 1)] {
            let (status, _) = send(
                &app,
                "POST",
                "/api/orders",
                Some(json!({"customer_name": name, "total": 10, "storeId": store})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, "GET", "/api/orders?storeId=1&limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["orders"].as_array().unwrap().len(), 1);
        assert_eq!(body["pagination"]["total"], 2);
        assert_eq!(body["pagination"]["pages"], 2);

        let (status, body) = send(&app, "GET", "/api/orders?storeId=", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pagination"]["total"], 3);

        let (status, body) = send(&app, "GET", "/api/orders?status=lost", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid status: lost");
    }

    #[tokio::test]
    async fn test_inventory_embeds_product() {
        let app = app(AppState::in_memory());
        let (_, product) = send(
            &app,
            "POST",
            "/api/products",
            Some(json!({"title": "Laptop Pro", "price": 1299.99, "sku": "LAP-PRO-15"})),
        )
        .await;

        let (status, item) = send(
            &app,
            "POST",
            "/api/inventory",
            Some(json!({"productId": product["id"], "sku": "LAP-PRO-15", "stock": 4})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["status"], "low_stock");
        assert!(item.get("product").is_none());

        let (_, body) = send(&app, "GET", "/api/inventory", None).await;
        assert_eq!(body["items"][0]["product"]["title"], "Laptop Pro");

        let uri = format!("/api/inventory/{}", item["id"]);
        let (_, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(fetched["product"]["sku"], "LAP-PRO-15");
        assert_eq!(fetched["stock"], 4);
    }

    #[tokio::test]
    async fn test_health() {
        let app = app(AppState::in_memory());
        let (status, body) = send(&app, "GET", "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");

        let response = app
            .clone()
            .oneshot(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
