//! Unified error handling for the admin API.
//!
//! Every error renders as `{"error": "..."}`. Server faults hide their cause
//! behind "Internal server error"; debug builds add a `detail` field.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use storedash_core::{Collection, ValidationError};

use crate::db::RepositoryError;

/// Application-level error type for the admin API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Storage operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Resource not found. Carries the full client-facing message.
    #[error("{0}")]
    NotFound(String),

    /// No route matches the path.
    #[error("Route not found")]
    RouteNotFound,

    /// The route exists but not for this method.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// `"<Entity> not found"` for a collection.
    #[must_use]
    pub fn not_found(collection: Collection) -> Self {
        Self::NotFound(format!("{} not found", collection.entity_name()))
    }

    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(
                RepositoryError::Validation(_) | RepositoryError::Conflict(_),
            )
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(RepositoryError::NotFound) | Self::NotFound(_) | Self::RouteNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::Validation(e)) => e.to_string(),
            Self::Database(e @ RepositoryError::Conflict(_)) => e.to_string(),
            Self::Database(RepositoryError::NotFound) => "Resource not found".to_string(),
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Database(RepositoryError::Validation(err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Log server errors with Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin request error"
            );
        }

        let mut body = json!({ "error": self.public_message() });
        if status.is_server_error() && cfg!(debug_assertions) {
            body["detail"] = json!(self.to_string());
        }

        (status, Json(body)).into_response()
    }
}
