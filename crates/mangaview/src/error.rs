//! Error types for the Mangaview proxy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::sync::Arc;

/// Application error type that converts to HTTP responses
///
/// `NotFound` carries a client-facing message; upstream failures are logged
/// and surfaced as a generic 500 so transport details never leak out.
#[derive(Debug, Clone)]
pub enum AppError {
    NotFound(String),
    Upstream(String),
    Config(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Upstream(msg) => {
                tracing::error!(error = %msg, "Upstream request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Upstream request failed".into(),
                )
            }
            AppError::Config(msg) => {
                tracing::error!(error = %msg, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Upstream(msg) => write!(f, "Upstream error: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<mangadex_api::MangaDexError> for AppError {
    fn from(e: mangadex_api::MangaDexError) -> Self {
        AppError::Upstream(e.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::Upstream(e.to_string())
    }
}

// Cache misses coalesced across requests share one fetch result; the shared
// failure arrives wrapped in an Arc.
impl From<Arc<AppError>> for AppError {
    fn from(e: Arc<AppError>) -> Self {
        (*e).clone()
    }
}

impl From<tracing_subscriber::filter::ParseError> for AppError {
    fn from(e: tracing_subscriber::filter::ParseError) -> Self {
        AppError::Config(e.to_string())
    }
}

/// Result type for proxy operations
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = AppError::NotFound("No cover for this manga".to_string());
        assert_eq!(format!("{}", err), "Not found: No cover for this manga");
    }

    #[test]
    fn test_not_found_status() {
        let response = AppError::NotFound("gone".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_upstream_status_hides_details() {
        let response = AppError::Upstream("connection refused".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_shared_error_unwraps_to_owned() {
        let shared = Arc::new(AppError::NotFound("missing".to_string()));
        let owned = AppError::from(shared);
        assert!(matches!(owned, AppError::NotFound(msg) if msg == "missing"));
    }
}
