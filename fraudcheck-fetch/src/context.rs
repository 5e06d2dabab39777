//! Fetch context providing access to host APIs.
//!
//! The fetch context is passed to all strategies and provides unified
//! access to the HTTP transport and the credential cache.

use std::sync::Arc;
use std::time::Duration;

use crate::error::HttpError;
use crate::host::credentials::DEFAULT_CREDENTIAL_TTL;
use crate::host::http::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};
use crate::host::{CredentialCache, HttpClient, InMemoryCredentialCache, ReqwestHttpClient};

/// Default deadline for one courier lookup, re-authentication included.
const DEFAULT_COURIER_TIMEOUT_SECS: u64 = 45;

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSettings {
    /// Total timeout of a single HTTP request.
    pub request_timeout: Duration,
    /// Connect timeout of a single HTTP request.
    pub connect_timeout: Duration,
    /// Deadline for a whole courier lookup.
    pub courier_timeout: Duration,
    /// Lifetime of cached credentials.
    pub credential_ttl: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            courier_timeout: Duration::from_secs(DEFAULT_COURIER_TIMEOUT_SECS),
            credential_ttl: DEFAULT_CREDENTIAL_TTL,
        }
    }
}

impl FetchSettings {
    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Sets the per-courier deadline.
    #[must_use]
    pub fn with_courier_timeout(mut self, timeout: Duration) -> Self {
        self.courier_timeout = timeout;
        self
    }

    /// Sets the credential lifetime.
    #[must_use]
    pub fn with_credential_ttl(mut self, ttl: Duration) -> Self {
        self.credential_ttl = ttl;
        self
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Context provided to fetch strategies, giving access to host APIs.
///
/// Cloning is cheap; clones share the transport and the cache.
#[derive(Clone)]
pub struct FetchContext {
    /// HTTP transport.
    pub http: Arc<dyn HttpClient>,
    /// Credential cache shared by every courier.
    pub credentials: Arc<dyn CredentialCache>,
    /// Fetch settings.
    pub settings: FetchSettings,
}

impl FetchContext {
    /// Creates a context with the reqwest transport and an in-memory cache.
    pub fn new() -> Result<Self, HttpError> {
        Self::builder().build()
    }

    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Returns the per-courier deadline.
    pub fn courier_timeout(&self) -> Duration {
        self.settings.courier_timeout
    }

    /// Returns the credential lifetime.
    pub fn credential_ttl(&self) -> Duration {
        self.settings.credential_ttl
    }
}

impl std::fmt::Debug for FetchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchContext")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a `FetchContext`.
#[derive(Default)]
pub struct FetchContextBuilder {
    http: Option<Arc<dyn HttpClient>>,
    credentials: Option<Arc<dyn CredentialCache>>,
    allowed_domains: Option<Vec<String>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP transport.
    #[must_use]
    pub fn http(mut self, http: Arc<dyn HttpClient>) -> Self {
        self.http = Some(http);
        self
    }

    /// Sets the credential cache.
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialCache>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Restricts the default transport to these domains.
    ///
    /// Ignored when a transport is set explicitly.
    #[must_use]
    pub fn allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Sets the fetch settings.
    #[must_use]
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the per-courier deadline.
    #[must_use]
    pub fn courier_timeout(mut self, timeout: Duration) -> Self {
        self.settings.courier_timeout = timeout;
        self
    }

    /// Sets the credential lifetime.
    #[must_use]
    pub fn credential_ttl(mut self, ttl: Duration) -> Self {
        self.settings.credential_ttl = ttl;
        self
    }

    /// Builds the fetch context.
    ///
    /// Fails only if the default reqwest transport cannot be created.
    pub fn build(self) -> Result<FetchContext, HttpError> {
        let http: Arc<dyn HttpClient> = match self.http {
            Some(http) => http,
            None => {
                let client = ReqwestHttpClient::with_timeouts(
                    self.settings.request_timeout,
                    self.settings.connect_timeout,
                )?;
                match self.allowed_domains {
                    Some(domains) => Arc::new(client.with_allowed_domains(domains)),
                    None => Arc::new(client),
                }
            }
        };

        Ok(FetchContext {
            http,
            credentials: self
                .credentials
                .unwrap_or_else(|| Arc::new(InMemoryCredentialCache::new())),
            settings: self.settings,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.request_timeout, Duration::from_secs(30));
        assert_eq!(settings.credential_ttl, Duration::from_secs(50 * 60));
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .courier_timeout(Duration::from_secs(5))
            .credential_ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(ctx.courier_timeout(), Duration::from_secs(5));
        assert_eq!(ctx.credential_ttl(), Duration::from_secs(60));
    }

    #[tokio::test]
    async fn test_clones_share_cache() {
        use crate::host::ProviderCredential;

        let ctx = FetchContext::new().unwrap();
        let other = ctx.clone();
        ctx.credentials
            .put("k", ProviderCredential::bearer("t", None), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(other.credentials.get("k").await.unwrap().is_some());
    }
}
