// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `FraudCheck` Store
//!
//! Configuration and persistence for the `FraudCheck` crates.
//!
//! This crate provides:
//!
//! - **Config**: courier credentials, timeouts and cache settings, loaded
//!   from JSON and environment variables and validated eagerly
//! - **FileCredentialCache**: credential cache persisted to disk
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use fraudcheck_store::Config;
//!
//! let config = Config::load()?.with_env();
//! config.validate()?;
//! let ctx = config.context_builder()?.build()?;
//! ```

pub mod config;
pub mod credential_store;
pub mod error;
pub mod persistence;

pub use config::{
    CacheBackend, CacheConfig, Config, CouriersConfig, HttpConfig, PathaoConfig, RedxConfig,
    SteadfastConfig,
};
pub use credential_store::FileCredentialCache;
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_config_path, default_credentials_path,
    load_json, load_json_or_default, save_json,
};
#[cfg(test)]
mod persistence_tests;
