//! Steadfast fetch strategies.

use async_trait::async_trait;
use fraudcheck_core::{CourierKind, DeliveryStats, PhoneNumber};
use fraudcheck_fetch::{
    Authenticator, FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy,
    ProviderCredential, fetch_with_reauth,
};
use fraudcheck_store::SteadfastConfig;
use tracing::{debug, instrument};

use super::parser::parse_fraud_check;
use super::session::{SessionExpiredPredicate, is_session_expired};
use super::web::SteadfastWebClient;

/// Cache key of the Steadfast session.
pub const STEADFAST_CACHE_KEY: &str = "steadfast_auth_data";

/// Fetch strategy using the Steadfast web dashboard.
pub struct SteadfastWebStrategy {
    client: SteadfastWebClient,
    config: SteadfastConfig,
    session_expired: SessionExpiredPredicate,
}

impl SteadfastWebStrategy {
    /// Creates a strategy from the Steadfast config section.
    pub fn new(config: SteadfastConfig) -> Self {
        let client = match config.base_url {
            Some(ref url) => SteadfastWebClient::with_base_url(url.clone()),
            None => SteadfastWebClient::new(),
        };
        Self {
            client,
            config,
            session_expired: is_session_expired,
        }
    }

    /// Replaces the session expiry check.
    #[must_use]
    pub fn with_session_predicate(mut self, predicate: SessionExpiredPredicate) -> Self {
        self.session_expired = predicate;
        self
    }
}

#[async_trait]
impl Authenticator for SteadfastWebStrategy {
    fn courier(&self) -> CourierKind {
        CourierKind::Steadfast
    }

    fn cache_key(&self) -> &str {
        STEADFAST_CACHE_KEY
    }

    async fn login(&self, ctx: &FetchContext) -> Result<ProviderCredential, FetchError> {
        self.client
            .login(&*ctx.http, &self.config.email, &self.config.password)
            .await
    }

    async fn fetch_with(
        &self,
        ctx: &FetchContext,
        credential: &ProviderCredential,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError> {
        let Some((cookies, _csrf)) = credential.as_session() else {
            return Err(FetchError::SessionExpired);
        };

        let response = self.client.fraud_check(&*ctx.http, cookies, phone).await?;
        if (self.session_expired)(&response) {
            return Err(FetchError::SessionExpired);
        }
        if !response.is_success() {
            return Err(FetchError::upstream_status(response.status.as_u16()));
        }
        parse_fraud_check(&response.body)
    }
}

#[async_trait]
impl FetchStrategy for SteadfastWebStrategy {
    fn id(&self) -> &str {
        "steadfast.web"
    }

    fn courier(&self) -> CourierKind {
        CourierKind::Steadfast
    }

    fn kind(&self) -> FetchKind {
        FetchKind::WebSession
    }

    #[instrument(skip(self, ctx), fields(phone = %phone))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        phone: &PhoneNumber,
    ) -> Result<FetchResult, FetchError> {
        debug!("Fetching Steadfast fraud check");
        let stats = fetch_with_reauth(self, ctx, phone).await?;
        Ok(FetchResult::new(stats, FetchStrategy::id(self), self.kind()))
    }
}
