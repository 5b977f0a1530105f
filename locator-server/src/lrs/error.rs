//! Lookup service error types.

use crate::domain::TranslateError;

/// Errors from talking to the lookup service.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The service reported an error inside a successful response
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    /// Mock transport had nothing to serve
    #[error("mock transport: {0}")]
    Mock(String),
}

impl From<LookupError> for TranslateError {
    fn from(err: LookupError) -> Self {
        TranslateError::ServiceError(err.to_string())
    }
}
