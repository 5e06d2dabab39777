//! Credential cache for per-courier authentication material.
//!
//! Couriers store either a bearer token or a web session under a fixed key
//! and reuse it until it expires or is rejected. Writes are last-write-wins
//! per key; keys are never shared between couriers.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, trace};

use super::cookies::CookieJar;
use crate::error::CacheError;

/// Default credential lifetime.
pub const DEFAULT_CREDENTIAL_TTL: Duration = Duration::from_secs(50 * 60);

// ============================================================================
// Provider Credential
// ============================================================================

/// Authentication material for one courier.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderCredential {
    /// Token sent as `Authorization: Bearer`.
    BearerToken {
        /// Token value.
        value: String,
        /// Expiry reported by the courier, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        expires_at: Option<DateTime<Utc>>,
    },
    /// Cookie-based web session.
    SessionState {
        /// Session cookies.
        cookies: CookieJar,
        /// CSRF token scraped from the login page.
        csrf_token: String,
    },
}

impl ProviderCredential {
    /// Creates a bearer credential.
    pub fn bearer(value: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self::BearerToken {
            value: value.into(),
            expires_at,
        }
    }

    /// Creates a session credential.
    pub fn session(cookies: CookieJar, csrf_token: impl Into<String>) -> Self {
        Self::SessionState {
            cookies,
            csrf_token: csrf_token.into(),
        }
    }

    /// Returns the token of a bearer credential.
    pub fn as_bearer(&self) -> Option<&str> {
        match self {
            Self::BearerToken { value, .. } => Some(value),
            Self::SessionState { .. } => None,
        }
    }

    /// Returns the cookies and CSRF token of a session credential.
    pub fn as_session(&self) -> Option<(&CookieJar, &str)> {
        match self {
            Self::SessionState { cookies, csrf_token } => Some((cookies, csrf_token)),
            Self::BearerToken { .. } => None,
        }
    }

    /// Returns true if the courier-reported expiry has passed.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::BearerToken {
                expires_at: Some(at),
                ..
            } => *at <= now,
            _ => false,
        }
    }
}

impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BearerToken { expires_at, .. } => f
                .debug_struct("BearerToken")
                .field("value", &"[REDACTED]")
                .field("expires_at", expires_at)
                .finish(),
            Self::SessionState { cookies, .. } => f
                .debug_struct("SessionState")
                .field("cookies", &cookies.iter().map(|(k, _)| k).collect::<Vec<_>>())
                .field("csrf_token", &"[REDACTED]")
                .finish(),
        }
    }
}

// ============================================================================
// Credential Cache Trait
// ============================================================================

/// Key/value store with TTL for courier credentials.
///
/// Implementations must be safe for concurrent use by every courier.
#[async_trait]
pub trait CredentialCache: Send + Sync {
    /// Returns the live credential stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<ProviderCredential>, CacheError>;

    /// Stores a credential for `ttl`, replacing any previous value.
    async fn put(
        &self,
        key: &str,
        credential: ProviderCredential,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// Removes the credential stored under `key`.
    async fn forget(&self, key: &str) -> Result<(), CacheError>;
}

// ============================================================================
// In-Memory Cache
// ============================================================================

struct Entry {
    credential: ProviderCredential,
    deadline: Instant,
}

/// Process-local [`CredentialCache`].
#[derive(Default)]
pub struct InMemoryCredentialCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl InMemoryCredentialCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.deadline > now);
        before - entries.len()
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl fmt::Debug for InMemoryCredentialCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryCredentialCache").finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialCache for InMemoryCredentialCache {
    async fn get(&self, key: &str) -> Result<Option<ProviderCredential>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.deadline > now => {
                    trace!(key, hit = true, "Credential cache lookup");
                    return Ok(Some(entry.credential.clone()));
                }
                None => {
                    trace!(key, hit = false, "Credential cache lookup");
                    return Ok(None);
                }
                Some(_) => {}
            }
        }

        // Expired: evict, unless a newer value landed in between.
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.deadline <= now) {
            entries.remove(key);
            debug!(key, "Evicted expired credential");
        }
        Ok(None)
    }

    async fn put(
        &self,
        key: &str,
        credential: ProviderCredential,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let deadline = Instant::now() + ttl;
        self.entries.write().await.insert(
            key.to_string(),
            Entry {
                credential,
                deadline,
            },
        );
        debug!(key, ttl_secs = ttl.as_secs(), "Stored credential");
        Ok(())
    }

    async fn forget(&self, key: &str) -> Result<(), CacheError> {
        if self.entries.write().await.remove(key).is_some() {
            debug!(key, "Forgot credential");
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
