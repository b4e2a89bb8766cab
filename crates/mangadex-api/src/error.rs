//! Error types for the MangaDex API client

use std::fmt;

/// Errors that can occur when talking to the MangaDex API or image hosts
#[derive(Debug)]
pub enum MangaDexError {
    /// HTTP request failed
    Http(reqwest::Error),
    /// Failed to parse JSON response
    Json(serde_json::Error),
    /// Upstream answered with a non-success status that is not a plain 404
    Status(reqwest::StatusCode),
}

impl fmt::Display for MangaDexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "MangaDex HTTP error: {}", e),
            Self::Json(e) => write!(f, "MangaDex JSON parse error: {}", e),
            Self::Status(code) => write!(f, "MangaDex returned status {}", code),
        }
    }
}

impl std::error::Error for MangaDexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Status(_) => None,
        }
    }
}

impl From<reqwest::Error> for MangaDexError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e)
    }
}

impl From<serde_json::Error> for MangaDexError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Result type for MangaDex API operations
pub type Result<T> = std::result::Result<T, MangaDexError>;
