// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `FraudCheck` Core
//!
//! Core types and models shared by every `FraudCheck` crate.
//!
//! This crate has no I/O. It defines:
//!
//! - Domain models (couriers, phone numbers, delivery stats, reports)
//! - Error types
//!
//! ## Key Types
//!
//! ### Courier Types
//! - [`CourierKind`] - Enum of all supported courier platforms
//! - [`PhoneNumber`] - A validated Bangladeshi mobile number
//!
//! ### Result Types
//! - [`DeliveryStats`] - Normalized success/cancel/total counts
//! - [`ProviderResult`] - Stats or a failure, per courier
//! - [`ProviderFailure`] - Failure entry with reason and upstream status
//! - [`FraudReport`] - Aggregated results for one phone number

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Courier types
    CourierKind,
    PhoneNumber,
    // Result types
    DeliveryStats,
    FailureKind,
    FraudReport,
    ProviderFailure,
    ProviderResult,
};
