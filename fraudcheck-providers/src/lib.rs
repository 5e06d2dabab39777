// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `FraudCheck` Providers
//!
//! Courier implementations and the fraud-check aggregator.
//!
//! Each courier module includes:
//!
//! - **Descriptor**: Static configuration (metadata, cache key, domains)
//! - **Strategies**: The courier's authentication and stats call
//! - **Parser**: Response normalization into delivery stats
//!
//! ## Supported Couriers
//!
//! | Courier   | Auth                   | Stats source             |
//! |-----------|------------------------|--------------------------|
//! | Steadfast | Web login, CSRF + cookies | Dashboard fraud check |
//! | Pathao    | Bearer token           | Merchant API             |
//! | RedX      | Bearer token           | Customer success rate    |
//!
//! ## Usage
//!
//! ```ignore
//! use fraudcheck_providers::FraudChecker;
//! use fraudcheck_store::Config;
//!
//! let config = Config::load()?.with_env();
//! let checker = FraudChecker::from_config(&config)?;
//! let report = checker.check("01712345678").await?;
//! ```

pub mod checker;
mod counts;
pub mod descriptor;
pub mod registry;

// Courier modules (alphabetical)
pub mod pathao;
pub mod redx;
pub mod steadfast;

// Re-export key types
pub use checker::FraudChecker;
pub use descriptor::{CourierDescriptor, CourierMetadata, FetchPlan};
pub use registry::ProviderRegistry;

// Re-export courier descriptors and strategies
pub use pathao::{PathaoApiStrategy, pathao_descriptor};
pub use redx::{RedxApiStrategy, redx_descriptor};
pub use steadfast::{SteadfastWebStrategy, extract_csrf_token, is_session_expired, steadfast_descriptor};
