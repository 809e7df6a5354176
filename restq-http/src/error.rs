//! Error types for HTTP transport.

use restq_query::{ErrorCode, QueryError};
use thiserror::Error;

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// Errors that can occur while talking to a collection endpoint.
#[derive(Error, Debug)]
pub enum HttpError {
    /// Request could not be sent or its body could not be read.
    #[error("http error: {0}")]
    Request(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text, possibly empty.
        body: String,
    },

    /// URL could not be parsed or joined.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required configuration value was not provided.
    #[error("missing configuration: {0}")]
    MissingConfig(String),

    /// Response body was not valid JSON.
    #[error("decode error: {0}")]
    Decode(String),

    /// Request did not complete in time.
    #[error("request timed out after {0}ms")]
    Timeout(u64),
}

impl HttpError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Check if this is a timeout error.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Timeout(_) => true,
            Self::Request(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// Status code of the response, when one was received.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<HttpError> for QueryError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Timeout(ms) => QueryError::timeout(ms),
            HttpError::Status { status, body } => QueryError::http_status(status, body),
            HttpError::Config(msg) => QueryError::invalid_configuration(msg),
            HttpError::MissingConfig(key) => QueryError::missing_configuration(key),
            HttpError::Url(e) => QueryError::invalid_configuration(e.to_string()).with_source(e),
            HttpError::Decode(msg) => QueryError::deserialization(msg),
            HttpError::Request(e) => {
                if e.is_timeout() {
                    return QueryError::new(ErrorCode::RequestTimeout, e.to_string()).with_source(e);
                }
                if e.is_decode() {
                    return QueryError::deserialization(e.to_string()).with_source(e);
                }
                QueryError::transport(e.to_string()).with_source(e)
            }
        }
    }
}
