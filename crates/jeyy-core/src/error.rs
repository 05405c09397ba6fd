//! Error types for Jeyy API operations.
//!
//! This module provides the error taxonomy shared by every Jeyy client: remote
//! failures carrying the raw response body, session lifecycle misuse, and the
//! transport-level conversions from `reqwest`, `url` and `serde_json`.

use thiserror::Error;

/// Main error type for Jeyy API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The API answered with a status other than 200.
    ///
    /// The message is the raw response text, exactly as the server sent it.
    #[error("{body}")]
    Remote {
        /// HTTP status code returned by the API
        status: u16,
        /// Raw response body text
        body: String,
    },

    /// The session was used after it had been closed
    #[error("Session has closed")]
    SessionClosed,

    /// An owned session was closed twice
    #[error("Session is already closed")]
    AlreadyClosed,

    /// Attempted to close a session supplied by the caller
    #[error("Session was created manually; close the session itself instead")]
    NotOwned,

    /// An input object did not have the expected shape
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Jeyy API is unreachable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for the API: {0}")]
    Timeout(String),

    /// Failed to decode a JSON response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Specialized result type for Jeyy API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Remote { .. } => "REMOTE_ERROR",
            Self::SessionClosed => "SESSION_CLOSED",
            Self::AlreadyClosed => "ALREADY_CLOSED",
            Self::NotOwned => "NOT_OWNED",
            Self::TypeMismatch(_) => "TYPE_MISMATCH",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status of a remote failure.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the API itself rejected the request.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Returns true if the error comes from misusing the session lifecycle.
    #[must_use]
    pub const fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::SessionClosed | Self::AlreadyClosed | Self::NotOwned
        )
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
