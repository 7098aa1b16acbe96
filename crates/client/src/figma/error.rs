//! Figma API client error types.

use std::sync::Arc;

/// Errors from the Figma REST API client.
#[derive(Debug, thiserror::Error)]
pub enum FigmaError {
    /// Missing Figma access token.
    #[error("missing access token: FIGMA_ACCESS_TOKEN not set")]
    MissingToken,

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication failed (invalid or expired token).
    #[error("authentication failed: invalid Figma token")]
    AuthError,

    /// File or node does not exist (or the token cannot see it).
    #[error("not found: {0}")]
    NotFound(String),

    /// Rate limited by the Figma API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for FigmaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FigmaError::Timeout } else { FigmaError::Network(Arc::new(err)) }
    }
}

impl From<FigmaError> for figcache_core::Error {
    fn from(err: FigmaError) -> Self {
        figcache_core::Error::Fetch(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FigmaError::MissingToken;
        assert!(err.to_string().contains("access token"));

        let err = FigmaError::NotFound("abc123".to_string());
        assert!(err.to_string().contains("abc123"));
    }

    #[test]
    fn test_into_core_error() {
        let err: figcache_core::Error = FigmaError::RateLimited.into();
        assert!(err.to_string().contains("rate limited"));
    }
}
