//! Core error types for `FraudCheck`.

use thiserror::Error;

/// Core error type for `FraudCheck` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The phone number does not match the accepted mobile format.
    ///
    /// Raised before any network call is made.
    #[error("Invalid phone number: {0:?}")]
    InvalidPhoneNumber(String),

    /// Delivery counts that break `total == success + cancel`.
    #[error("Inconsistent delivery stats: {success} + {cancel} != {total}")]
    InvalidStats {
        /// Delivered count.
        success: u64,
        /// Cancelled count.
        cancel: u64,
        /// Reported total.
        total: u64,
    },

    /// Unknown courier name.
    #[error("Unknown courier: {0}")]
    UnknownCourier(String),

    /// The courier exists but is not configured in this checker.
    #[error("Courier not configured: {0}")]
    CourierNotConfigured(crate::CourierKind),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if this is a validation failure of caller input.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidPhoneNumber(_))
    }
}
