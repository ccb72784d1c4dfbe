//! HTTP status classification for the note service.

use notepad_core::Error;
use serde::Deserialize;

/// Note service error classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceErrorCode {
    /// The service refused the payload (validation).
    BadRequest,
    /// Missing or invalid credentials.
    Unauthorized,
    /// Endpoint or resource missing.
    NotFound,
    /// Rate limit exceeded.
    RateLimited,
    /// Server error.
    ServerError,
    /// Unknown error.
    Unknown,
}

impl ServiceErrorCode {
    /// Determine error class from an HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => Self::BadRequest,
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited | Self::ServerError)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Pull a human-readable message out of an error response body.
///
/// The service answers with `{"message": "..."}`; anything else is passed
/// through as-is.
pub fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

/// Convert a non-success response into a core error.
pub fn status_to_error(status: u16, body: &str) -> Error {
    let message = extract_message(body);
    match ServiceErrorCode::from_status(status) {
        ServiceErrorCode::BadRequest => Error::Rejected(message),
        ServiceErrorCode::Unauthorized => Error::Unauthorized(message),
        ServiceErrorCode::NotFound => Error::NotFound(message),
        ServiceErrorCode::RateLimited | ServiceErrorCode::ServerError => {
            Error::Server { status, message }
        }
        ServiceErrorCode::Unknown => {
            Error::Internal(format!("Unexpected status {}: {}", status, message))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_from_400() {
        assert_eq!(ServiceErrorCode::from_status(400), ServiceErrorCode::BadRequest);
        assert_eq!(ServiceErrorCode::from_status(422), ServiceErrorCode::BadRequest);
    }

    #[test]
    fn test_error_code_from_401() {
        assert_eq!(ServiceErrorCode::from_status(401), ServiceErrorCode::Unauthorized);
        assert_eq!(ServiceErrorCode::from_status(403), ServiceErrorCode::Unauthorized);
    }

    #[test]
    fn test_error_code_from_5xx() {
        assert_eq!(ServiceErrorCode::from_status(500), ServiceErrorCode::ServerError);
        assert_eq!(ServiceErrorCode::from_status(503), ServiceErrorCode::ServerError);
    }

    #[test]
    fn test_error_code_from_unknown() {
        assert_eq!(ServiceErrorCode::from_status(418), ServiceErrorCode::Unknown);
    }

    #[test]
    fn test_retryable_codes() {
        assert!(ServiceErrorCode::RateLimited.is_retryable());
        assert!(ServiceErrorCode::ServerError.is_retryable());
        assert!(!ServiceErrorCode::BadRequest.is_retryable());
        assert!(!ServiceErrorCode::Unauthorized.is_retryable());
    }

    #[test]
    fn test_extract_message_from_json() {
        assert_eq!(
            extract_message(r#"{"message":"title is required"}"#),
            "title is required"
        );
    }

    #[test]
    fn test_extract_message_passthrough() {
        assert_eq!(extract_message("Bad Gateway\n"), "Bad Gateway");
        assert_eq!(extract_message(""), "no response body");
    }

    #[test]
    fn test_status_to_error_mapping() {
        assert!(matches!(status_to_error(400, ""), Error::Rejected(_)));
        assert!(matches!(status_to_error(401, ""), Error::Unauthorized(_)));
        assert!(matches!(status_to_error(404, ""), Error::NotFound(_)));
        assert!(matches!(
            status_to_error(429, ""),
            Error::Server { status: 429, .. }
        ));
        assert!(matches!(status_to_error(418, ""), Error::Internal(_)));
    }

    #[test]
    fn test_status_to_error_retryability_agrees() {
        for status in [302, 400, 401, 403, 404, 418, 422, 429, 500, 502, 503] {
            assert_eq!(
                status_to_error(status, "").is_retryable(),
                ServiceErrorCode::from_status(status).is_retryable(),
                "status {}",
                status
            );
        }
    }
}
