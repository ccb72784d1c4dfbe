//! Error types for the notepad client.

use thiserror::Error;

/// Result type alias using notepad's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notepad operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// The service refused the request payload (400/422)
    #[error("Rejected: {0}")]
    Rejected(String),

    /// Authentication/authorization failed
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The service failed or throttled the request (5xx/429)
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether repeating the same request may succeed.
    ///
    /// Transport failures and server-side failures are transient; anything
    /// the service rejected on its merits is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Server { .. } | Error::Request(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Serialization(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}
