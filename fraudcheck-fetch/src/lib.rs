// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `FraudCheck` Fetch
//!
//! HTTP host APIs, credential caching and fetch strategies for the
//! `FraudCheck` couriers.
//!
//! ## Host APIs
//!
//! The [`host`] module provides abstractions for system interactions:
//!
//! - [`host::http`] - HTTP client trait with a reqwest implementation
//! - [`host::cookies`] - Cookie jar for web-session couriers
//! - [`host::credentials`] - Credential cache with TTL
//!
//! ## Fetching
//!
//! - [`strategy::FetchStrategy`] - Trait implemented once per courier
//! - [`auth::Authenticator`] - Login plus authenticated stats call
//! - [`auth::fetch_with_reauth`] - Cached credential with one re-auth
//! - [`context::FetchContext`] - Provides access to host APIs
//!
//! ## Example
//!
//! ```ignore
//! use fraudcheck_fetch::FetchContext;
//!
//! let ctx = FetchContext::new()?;
//! let strategy = PathaoApiStrategy::new(credentials);
//! let result = strategy.fetch(&ctx, &phone).await?;
//! ```

// Core modules
pub mod auth;
pub mod context;
pub mod error;
pub mod host;
pub mod strategy;

// Re-export key types at crate root

// Errors
pub use error::{CacheError, FetchError, HttpError};

// Host APIs
pub use host::{
    CookieJar, CredentialCache, HttpClient, HttpRequest, HttpResponse, InMemoryCredentialCache,
    ProviderCredential, ReqwestHttpClient, RequestBody,
};

// Strategy & Auth
pub use auth::{Authenticator, fetch_with_reauth};
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use strategy::{FetchKind, FetchResult, FetchStrategy};
