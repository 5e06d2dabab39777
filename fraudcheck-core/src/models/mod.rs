//! Domain models for `FraudCheck`.
//!
//! ## Submodules
//!
//! - [`courier`] - Courier types (`CourierKind`, `PhoneNumber`)
//! - [`stats`] - Normalized delivery statistics
//! - [`report`] - Per-courier results and the aggregated report

mod courier;
mod report;
mod stats;

// Re-export everything at the models level
pub use courier::{CourierKind, PhoneNumber};
pub use report::{FailureKind, FraudReport, ProviderFailure, ProviderResult};
pub use stats::DeliveryStats;
