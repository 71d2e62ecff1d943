//! Error taxonomy for dataset service operations.

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Every failure a client call can surface.
///
/// Transport-level errors are normalized into this taxonomy at the client
/// boundary; callers never see a raw `reqwest::Error`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential missing or rejected by the server
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced resource does not exist (e.g. a dataset deleted elsewhere)
    #[error("not found: {0}")]
    NotFound(String),

    /// Request rejected by server-side validation
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Could not reach the server at all
    #[error("network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Any other server-side failure
    #[error("server error {status}: {message}")]
    ServerError { status: u16, message: String },
}

impl ApiError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    /// True when the credential was missing or rejected; the session layer
    /// answers this with a forced local logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// The server-provided message, when one was carried.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::ValidationFailed(msg)
            | Self::NetworkUnavailable(msg) => msg,
            Self::ServerError { message, .. } => message,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_request() {
            return Self::NetworkUnavailable(err.to_string());
        }
        match err.status() {
            Some(status) => Self::server_error(status.as_u16(), err.to_string()),
            None => Self::NetworkUnavailable(err.to_string()),
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        Self::ValidationFailed(format!("invalid URL: {err}"))
    }
}
