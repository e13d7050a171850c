//! Health check endpoints.
//!
//! ```text
//! GET /health        - Liveness, plain "ok"
//! GET /health/ready  - Readiness, pings the document store
//! GET /api/health    - JSON status for the dashboard
//! ```

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use chrono::Utc;

use storedash_core::reports::HealthStatus;

use crate::state::AppState;

/// Liveness check.
pub async fn health() -> &'static str {
    "ok"
}

/// Readiness check. 503 when the store cannot be reached.
pub async fn ready(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Dashboard health payload.
pub async fn api_health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Server is running".to_string(),
        timestamp: Utc::now(),
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(ready))
        .route("/api/health", get(api_health))
}
