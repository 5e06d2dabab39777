//! Credential acquisition with a single re-authentication.
//!
//! Every courier follows the same cycle:
//!
//! 1. Reuse the cached credential, or log in and cache the new one.
//! 2. Call the stats endpoint.
//! 3. If the credential is rejected ([`FetchError::is_reauth_signal`]),
//!    forget it, log in once more and retry once. A second rejection is
//!    returned as is.
//!
//! Login failures are terminal and never retried. Cache failures degrade to
//! a miss so a broken cache never fails a lookup.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use fraudcheck_core::{CourierKind, DeliveryStats, PhoneNumber};
use tracing::{debug, info, warn};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::host::ProviderCredential;

// ============================================================================
// Authenticator Trait
// ============================================================================

/// Courier-specific half of the authentication cycle.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Courier this authenticator belongs to.
    fn courier(&self) -> CourierKind;

    /// Cache key of this courier's credential.
    fn cache_key(&self) -> &str;

    /// Performs a full login.
    ///
    /// Errors are terminal for the current lookup.
    async fn login(&self, ctx: &FetchContext) -> Result<ProviderCredential, FetchError>;

    /// Calls the stats endpoint with `credential`.
    ///
    /// Returns [`FetchError::Unauthorized`] or [`FetchError::SessionExpired`]
    /// when the credential is no longer accepted.
    async fn fetch_with(
        &self,
        ctx: &FetchContext,
        credential: &ProviderCredential,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError>;
}

// ============================================================================
// Re-auth Cycle
// ============================================================================

/// Runs the cached-credential, fetch, re-auth-once cycle.
pub async fn fetch_with_reauth<A>(
    auth: &A,
    ctx: &FetchContext,
    phone: &PhoneNumber,
) -> Result<DeliveryStats, FetchError>
where
    A: Authenticator + ?Sized,
{
    let courier = auth.courier();

    let credential = match cached_credential(auth, ctx).await {
        Some(credential) => credential,
        None => login_and_store(auth, ctx).await?,
    };

    match auth.fetch_with(ctx, &credential, phone).await {
        Err(e) if e.is_reauth_signal() => {
            warn!(courier = %courier, error = %e, "Credential rejected, re-authenticating once");
            forget_credential(auth, ctx).await;

            let credential = login_and_store(auth, ctx).await?;
            let result = auth.fetch_with(ctx, &credential, phone).await;
            if let Err(ref e) = result {
                if e.is_reauth_signal() {
                    warn!(courier = %courier, error = %e, "Fresh credential rejected");
                    forget_credential(auth, ctx).await;
                }
            }
            result
        }
        other => other,
    }
}

async fn cached_credential<A>(auth: &A, ctx: &FetchContext) -> Option<ProviderCredential>
where
    A: Authenticator + ?Sized,
{
    let key = auth.cache_key();
    match ctx.credentials.get(key).await {
        Ok(Some(credential)) if credential.is_expired_at(Utc::now()) => {
            debug!(key, "Cached credential past its expiry");
            forget_credential(auth, ctx).await;
            None
        }
        Ok(found) => found,
        Err(e) => {
            warn!(key, error = %e, "Credential cache read failed, treating as miss");
            None
        }
    }
}

async fn login_and_store<A>(auth: &A, ctx: &FetchContext) -> Result<ProviderCredential, FetchError>
where
    A: Authenticator + ?Sized,
{
    let courier = auth.courier();
    let credential = auth.login(ctx).await.inspect_err(|e| {
        warn!(courier = %courier, error = %e, "Login failed");
    })?;
    info!(courier = %courier, "Logged in");

    let ttl = effective_ttl(&credential, ctx.credential_ttl());
    if let Err(e) = ctx.credentials.put(auth.cache_key(), credential.clone(), ttl).await {
        warn!(courier = %courier, error = %e, "Failed to cache credential");
    }
    Ok(credential)
}

async fn forget_credential<A>(auth: &A, ctx: &FetchContext)
where
    A: Authenticator + ?Sized,
{
    if let Err(e) = ctx.credentials.forget(auth.cache_key()).await {
        warn!(key = auth.cache_key(), error = %e, "Failed to forget credential");
    }
}

/// Configured TTL, shortened to the courier-reported expiry when earlier.
fn effective_ttl(credential: &ProviderCredential, configured: Duration) -> Duration {
    match credential {
        ProviderCredential::BearerToken {
            expires_at: Some(at),
            ..
        } => {
            let remaining = (*at - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            remaining.min(configured)
        }
        _ => configured,
    }
}

// ============================================================================
// Tests
// ============================================================================
