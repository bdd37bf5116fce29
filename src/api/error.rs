//! API error types for the YouTrack client.

use thiserror::Error;

/// Errors that can occur when talking to the YouTrack REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Authentication failed - invalid or expired permanent token.
    #[error("Authentication failed: check your permanent token")]
    Unauthorized,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other non-success status.
    #[error("Unexpected status for {method} {url}: {status}")]
    UnexpectedStatus {
        method: String,
        url: String,
        status: u16,
    },

    /// A response body was required but the server sent none.
    #[error("Unexpected empty response from {method} {url}")]
    EmptyResponse { method: String, url: String },

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The token cannot be used in an HTTP header.
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(String),
}

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: u16, method: &str, url: &str) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound(url.to_string()),
            _ => ApiError::UnexpectedStatus {
                method: method.to_string(),
                url: url.to_string(),
                status,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_status_401() {
        let err = ApiError::from_status(401, "GET", "https://yt/api/issues");
        assert!(matches!(err, ApiError::Unauthorized));
    }

    #[test]
    fn test_error_from_status_404() {
        let err = ApiError::from_status(404, "GET", "https://yt/api/issues/HD-1");
        match err {
            ApiError::NotFound(url) => assert_eq!(url, "https://yt/api/issues/HD-1"),
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_error_from_status_500() {
        let err = ApiError::from_status(500, "POST", "https://yt/api/issues");
        assert!(matches!(err, ApiError::UnexpectedStatus { status: 500, .. }));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("POST https://yt/api/issues"));
    }

    #[test]
    fn test_error_display() {
        let err = ApiError::EmptyResponse {
            method: "GET".to_string(),
            url: "https://yt/api/issues/1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unexpected empty response from GET https://yt/api/issues/1"
        );
    }
}
