//! Host APIs for `FraudCheck` fetch strategies.
//!
//! This module provides abstractions for interacting with external systems:
//!
//! - [`http`] - HTTP client trait and the reqwest-backed implementation
//! - [`cookies`] - Cookie jar for web sessions
//! - [`credentials`] - Credential cache trait and in-memory implementation

pub mod cookies;
pub mod credentials;
pub mod http;

// Re-export key types
pub use cookies::CookieJar;
pub use credentials::{CredentialCache, InMemoryCredentialCache, ProviderCredential};
pub use http::{HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, RequestBody};
