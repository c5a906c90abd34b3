//! Error types for the catalog crate.
//!
//! Every upstream failure is mapped onto one of a small number of kinds so
//! callers (and ultimately the UI) can tell a transient network problem from
//! a rate limit or a missing API key.

use thiserror::Error;

/// Errors that can occur while talking to the upstream catalog
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// The client has no credentials, so no request was sent
    #[error("Catalog client is not configured (missing API key)")]
    NotConfigured,

    /// Transport-level failure (DNS, connection reset, ...)
    #[error("Network failure: {0}")]
    Network(String),

    /// The request did not complete within the client timeout
    #[error("Request to the catalog timed out")]
    Timeout,

    /// Upstream asked us to slow down
    #[error("Rate limited by the catalog (retry after {retry_after:?}s)")]
    RateLimited { retry_after: Option<u64> },

    /// Upstream answered with a non-success status
    #[error("Catalog API error {status_code}: {message}")]
    Api { status_code: u16, message: String },

    /// Upstream answered, but the payload could not be decoded
    #[error("Failed to decode catalog response: {0}")]
    Decode(String),
}

impl CatalogError {
    /// Whether the same request might succeed if tried again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CatalogError::Network(_) | CatalogError::Timeout | CatalogError::RateLimited { .. }
        )
    }

    /// Short message suitable for showing next to a retry affordance.
    pub fn user_message(&self) -> &'static str {
        match self {
            CatalogError::NotConfigured => "The content service is unavailable right now.",
            CatalogError::Network(_) => "Check your connection and try again.",
            CatalogError::Timeout => "The request took too long. Try again.",
            CatalogError::RateLimited { .. } => {
                "Too many requests. Wait a moment before trying again."
            }
            CatalogError::Api { .. } | CatalogError::Decode(_) => {
                "Something went wrong loading content."
            }
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CatalogError::Timeout
        } else if err.is_decode() {
            CatalogError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CatalogError::Api {
                status_code: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            CatalogError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Decode(err.to_string())
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
