//! Client error types and the messages shown to dashboard users.

use storedash_core::ValidationError;
use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The server could not be reached.
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Any other transport failure.
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A local change was rejected before it was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The record is not in the local list.
    #[error("Record {0} is not loaded")]
    NotLoaded(i32),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            Self::Network(err)
        } else if err.is_decode() {
            Self::InvalidResponse(err.to_string())
        } else {
            Self::Http(err)
        }
    }
}

impl ClientError {
    /// HTTP status of an API error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for a toast or inline error.
    ///
    /// Falls back to `default` when neither the status nor the server says
    /// anything useful.
    #[must_use]
    pub fn friendly_message(&self, default: &str) -> String {
        match self {
            Self::Api { status: 404, .. } => "Resource not found".to_string(),
            Self::Api { status: 403, .. } => {
                "You do not have permission to perform this action".to_string()
            }
            Self::Api { status: 401, .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            Self::Api { status, .. } if *status >= 500 => {
                "Server error. Please try again later.".to_string()
            }
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Network(_) => "Network connection failed. Please check your internet.".to_string(),
            Self::Validation(e) => e.to_string(),
            _ => default.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> ClientError {
        ClientError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_friendly_message_by_status() {
        assert_eq!(api(404, "Product not found").friendly_message("x"), "Resource not found");
        assert_eq!(
            api(403, "").friendly_message("x"),
            "You do not have permission to perform this action"
        );
        assert_eq!(
            api(401, "").friendly_message("x"),
            "Your session has expired. Please log in again."
        );
        assert_eq!(
            api(503, "db down").friendly_message("x"),
            "Server error. Please try again later."
        );
    }

    #[test]
    fn test_friendly_message_prefers_server_text() {
        assert_eq!(
            api(400, "sku already exists").friendly_message("Failed to save"),
            "sku already exists"
        );
        assert_eq!(api(400, " ").friendly_message("Failed to save"), "Failed to save");
        assert_eq!(
            ClientError::InvalidResponse("bad".into()).friendly_message("Failed to load"),
            "Failed to load"
        );
        assert_eq!(
            ClientError::from(ValidationError::Required("title")).friendly_message("x"),
            "title is required"
        );
    }
}
