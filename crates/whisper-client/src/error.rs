//! Error types for watchlist and analysis operations

use thiserror::Error;

/// Errors raised while talking to the backend or driving the view
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend refused a mutation and explained why
    #[error("Rejected ({status}): {detail}")]
    Rejected {
        status: u16,
        detail: String,
    },

    /// Backend answered with a non-success status
    #[error("Unexpected status {status}: {body}")]
    UnexpectedStatus {
        status: u16,
        body: String,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Markup template failed to render
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// An analysis is already starting or polling
    #[error("An analysis is already in progress")]
    AnalysisInProgress,
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::Rejected {
            status: 400,
            detail: "Stock already tracked".to_string(),
        };
        assert_eq!(err.to_string(), "Rejected (400): Stock already tracked");

        let err = ClientError::UnexpectedStatus {
            status: 502,
            body: "bad gateway".to_string(),
        };
        assert_eq!(err.to_string(), "Unexpected status 502: bad gateway");
    }

    #[test]
    fn test_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Json(_)));

        let url_err = url::Url::parse("not a url").unwrap_err();
        let err: ClientError = url_err.into();
        assert!(err.to_string().starts_with("Invalid URL"));
    }
}
