//! Fetch error types.

use std::time::Duration;

use fraudcheck_core::{FailureKind, ProviderFailure};
use thiserror::Error;

/// Reason reported when a login exchange fails.
pub const AUTHENTICATION_FAILED: &str = "authentication failed";
/// Reason reported when a login page carries no CSRF token.
pub const CSRF_TOKEN_NOT_FOUND: &str = "CSRF token not found";
/// Reason reported for empty or error-bearing payloads.
pub const INVALID_RESPONSE: &str = "invalid response from provider";
/// Reason reported when the stats endpoint fails after authentication.
pub const CUSTOMER_DATA_FAILED: &str = "failed to retrieve customer data";
/// Reason reported when a fresh session is rejected again.
pub const SESSION_REJECTED: &str = "session rejected after re-authentication";

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP exchange failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    /// The courier did not answer within its deadline.
    #[error("Courier timed out after {0:?}")]
    Timeout(Duration),

    /// Login was rejected or returned no usable credential.
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The login page carried no CSRF token.
    #[error("CSRF token not found on login page")]
    CsrfTokenNotFound,

    /// Stats endpoint rejected the bearer token.
    #[error("Unauthorized (status {status})")]
    Unauthorized {
        /// HTTP status returned.
        status: u16,
    },

    /// Stats endpoint reported an expired web session.
    #[error("Session expired")]
    SessionExpired,

    /// The courier answered with a non-success status.
    #[error("Upstream error: {reason}")]
    Upstream {
        /// Failure reason.
        reason: String,
        /// HTTP status, if any.
        status: Option<u16>,
    },

    /// Payload was empty, not JSON, or carried an error field.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Credential cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl FetchError {
    /// Non-success stats response.
    pub fn upstream_status(status: u16) -> Self {
        Self::Upstream {
            reason: CUSTOMER_DATA_FAILED.to_string(),
            status: Some(status),
        }
    }

    /// Returns true for errors that invalidate the cached credential and
    /// allow one re-authentication.
    pub fn is_reauth_signal(&self) -> bool {
        matches!(self, Self::Unauthorized { .. } | Self::SessionExpired)
    }

    /// Converts a terminal error into the report entry for its courier.
    pub fn to_failure(&self) -> ProviderFailure {
        match self {
            Self::AuthenticationFailed(_) => {
                ProviderFailure::new(FailureKind::Authentication, AUTHENTICATION_FAILED)
            }
            Self::CsrfTokenNotFound => {
                ProviderFailure::new(FailureKind::Authentication, CSRF_TOKEN_NOT_FOUND)
            }
            Self::SessionExpired => {
                ProviderFailure::new(FailureKind::Authentication, SESSION_REJECTED)
            }
            Self::Unauthorized { status } => {
                ProviderFailure::new(FailureKind::Upstream, CUSTOMER_DATA_FAILED)
                    .with_status(*status)
            }
            Self::Upstream { reason, status } => {
                let failure = ProviderFailure::new(FailureKind::Upstream, reason.clone());
                match status {
                    Some(status) => failure.with_status(*status),
                    None => failure,
                }
            }
            Self::InvalidResponse(_) | Self::Json(_) => {
                ProviderFailure::new(FailureKind::Upstream, INVALID_RESPONSE)
            }
            Self::Timeout(_) | Self::Http(HttpError::Timeout) => {
                ProviderFailure::new(FailureKind::Timeout, "courier timed out")
            }
            Self::Http(e) => ProviderFailure::new(FailureKind::Transport, e.to_string()),
            Self::Cache(e) => ProviderFailure::new(FailureKind::Transport, e.to_string()),
        }
    }
}

// ============================================================================
// HTTP Error
// ============================================================================

/// HTTP-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Request error.
    #[error("Request error: {0}")]
    Request(reqwest::Error),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Redirect chain longer than the client follows.
    #[error("Too many redirects (limit {0})")]
    TooManyRedirects(usize),

    /// Timeout.
    #[error("Request timed out")]
    Timeout,
}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

// ============================================================================
// Cache Error
// ============================================================================

/// Error type for credential cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Backing storage could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored entries could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend unavailable.
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failure_reason() {
        let failure = FetchError::AuthenticationFailed("no token".into()).to_failure();
        assert_eq!(failure.reason, "authentication failed");
        assert_eq!(failure.kind, FailureKind::Authentication);
        assert_eq!(failure.status, None);
    }

    #[test]
    fn test_csrf_failure_reason() {
        let failure = FetchError::CsrfTokenNotFound.to_failure();
        assert_eq!(failure.reason, "CSRF token not found");
    }

    #[test]
    fn test_terminal_unauthorized_keeps_status() {
        let failure = FetchError::Unauthorized { status: 401 }.to_failure();
        assert_eq!(failure.reason, "failed to retrieve customer data");
        assert_eq!(failure.status, Some(401));
    }

    #[test]
    fn test_invalid_payload_reason() {
        let failure = FetchError::InvalidResponse("empty body".into()).to_failure();
        assert_eq!(failure.reason, "invalid response from provider");
        assert_eq!(failure.kind, FailureKind::Upstream);
    }

    #[test]
    fn test_reauth_signals() {
        assert!(FetchError::Unauthorized { status: 401 }.is_reauth_signal());
        assert!(FetchError::SessionExpired.is_reauth_signal());
        assert!(!FetchError::CsrfTokenNotFound.is_reauth_signal());
        assert!(!FetchError::upstream_status(500).is_reauth_signal());
    }

    #[test]
    fn test_timeout_failure_kind() {
        let failure = FetchError::Timeout(Duration::from_secs(5)).to_failure();
        assert_eq!(failure.kind, FailureKind::Timeout);
        let failure = FetchError::Http(HttpError::Timeout).to_failure();
        assert_eq!(failure.kind, FailureKind::Timeout);
    }
}
