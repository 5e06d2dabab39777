//! Store error types.

use fraudcheck_fetch::{CacheError, HttpError};
use thiserror::Error;

/// Errors that can occur in the store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The HTTP transport could not be built from the configuration.
    #[error("HTTP client error: {0}")]
    Http(#[from] HttpError),
}

impl StoreError {
    /// Returns true for configuration problems, which are fatal at startup.
    pub fn is_config(&self) -> bool {
        matches!(self, StoreError::Config(_))
    }
}

impl From<StoreError> for CacheError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(e) => CacheError::Io(e),
            StoreError::Serialization(e) => CacheError::Serialization(e),
            other => CacheError::Unavailable(other.to_string()),
        }
    }
}
