//! Error types for provider API operations.

use reqwest::StatusCode;

/// Result type alias for provider API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Provider API error types.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP transport error (connection refused, DNS, TLS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response from the provider.
    #[error("Provider returned {status}: {reason}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Human-readable reason.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL parsing error.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Creates a status error from a response code and reason.
    #[must_use]
    pub fn status(status: StatusCode, reason: impl Into<String>) -> Self {
        Self::Status {
            status: status.as_u16(),
            reason: reason.into(),
        }
    }

    /// Returns the HTTP status code, if this error carries one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the provider rejected the bearer token (HTTP 401).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.status_code(), Some(401))
    }
}

/// Error body returned by the provider on failure.
///
/// The provider speaks JSON-LD, so depending on the endpoint the message
/// arrives as `detail`, `message` or `hydra:description`.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, rename = "hydra:description")]
    description: Option<String>,
}

impl ErrorResponse {
    /// Picks the most specific message available.
    pub(crate) fn reason(self) -> Option<String> {
        self.detail
            .or(self.message)
            .or(self.description)
            .filter(|s| !s.trim().is_empty())
    }

    /// Converts a failed response body into an Error.
    pub(crate) fn into_error(status: StatusCode, body: &str) -> Error {
        let reason = serde_json::from_str::<Self>(body)
            .ok()
            .and_then(Self::reason)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string()
            });
        Error::status(status, reason)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unauthorized_detection() {
        let err = Error::status(StatusCode::UNAUTHORIZED, "JWT Token not found");
        assert!(err.is_unauthorized());
        assert_eq!(err.status_code(), Some(401));

        let err = Error::status(StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(!err.is_unauthorized());
        assert!(!Error::InvalidConfig("x".into()).is_unauthorized());
    }

    #[test]
    fn test_reason_from_body() {
        let err = ErrorResponse::into_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"hydra:title":"An error occurred","hydra:description":"address: This value is already used."}"#,
        );
        assert_eq!(
            err.to_string(),
            "Provider returned 422: address: This value is already used."
        );

        let err = ErrorResponse::into_error(StatusCode::UNAUTHORIZED, r#"{"code":401,"message":"Expired JWT Token"}"#);
        assert!(matches!(err, Error::Status { ref reason, .. } if reason == "Expired JWT Token"));
    }

    #[test]
    fn test_reason_falls_back_to_status_phrase() {
        let err = ErrorResponse::into_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(err, Error::Status { status: 502, ref reason } if reason == "Bad Gateway"));

        let err = ErrorResponse::into_error(StatusCode::NOT_FOUND, r#"{"detail":"   "}"#);
        assert!(matches!(err, Error::Status { ref reason, .. } if reason == "Not Found"));
    }
}
