//! Error types for the Hypixel client.

use crate::interpret::HeaderParseError;
use std::time::Duration;

/// Errors that can occur when interacting with the Hypixel API.
#[derive(Debug, thiserror::Error)]
pub enum HypixelError {
    /// HTTP request failed (network, timeout, etc.)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Hypixel API returned an error status code.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// No API key provided.
    #[error("Authentication required: set HYPIXEL_API_KEY environment variable or pass a key to HypixelClient::new()")]
    AuthRequired,

    /// Rate limited by the Hypixel API (HTTP 429 or a throttle body).
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// A `RateLimit-*` header carried a value that is not a valid count.
    #[error("Malformed {header} header: {value:?}")]
    RateLimitHeader { header: &'static str, value: String },

    /// Resource not found (HTTP 404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Base URL or path could not be turned into a request URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<HeaderParseError> for HypixelError {
    fn from(e: HeaderParseError) -> Self {
        HypixelError::RateLimitHeader {
            header: e.header,
            value: e.value,
        }
    }
}

/// Convenience alias for Results using [`HypixelError`].
pub type Result<T> = std::result::Result<T, HypixelError>;
