//! GitHub API error types.

use thiserror::Error;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Transport-level failure (DNS, TLS, timeout, connect).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status from the API.
    #[error("GitHub API returned HTTP {status}")]
    Status { status: u16 },

    /// HTTP 200 response whose body carries a GraphQL `errors` array.
    ///
    /// Distinct from [`GitHubError::Status`]: the transport succeeded
    /// but the query itself was rejected.
    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQl { messages: Vec<String> },

    /// Response body could not be decoded into the expected shape.
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    /// A cursor walk returned the same cursor twice in a row.
    #[error("Pagination stalled: cursor {cursor:?} repeated")]
    PaginationStalled { cursor: String },

    /// A walk exceeded the page safety ceiling.
    #[error("Pagination exceeded the {limit} page ceiling")]
    PageLimitExceeded { limit: u32 },

    /// Invalid endpoint or malformed base URL.
    #[error("Invalid URL: {message}")]
    Url { message: String },
}

impl GitHubError {
    /// Create a decode error.
    #[inline]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

/// Extract a short error message suitable for display.
///
/// Takes the first line of an error message, which is useful for errors
/// that include multi-line details.
#[inline]
pub fn short_error_message(e: &impl std::error::Error) -> String {
    let full = e.to_string();
    full.lines().next().unwrap_or(&full).to_string()
}

/// Result type for GitHub API operations.
pub type Result<T> = std::result::Result<T, GitHubError>;
