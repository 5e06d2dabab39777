//! RedX fetch strategies.

use async_trait::async_trait;
use fraudcheck_core::{CourierKind, DeliveryStats, PhoneNumber};
use fraudcheck_fetch::{
    Authenticator, FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy,
    ProviderCredential, fetch_with_reauth,
};
use fraudcheck_store::RedxConfig;
use tracing::{debug, instrument};

use super::api::{REDX_API_BASE_URL, REDX_BASE_URL, RedxApiClient};

/// Cache key of the RedX bearer token.
pub const REDX_CACHE_KEY: &str = "redx_access_token";

/// Fetch strategy using the RedX API.
pub struct RedxApiStrategy {
    client: RedxApiClient,
    config: RedxConfig,
}

impl RedxApiStrategy {
    /// Creates a strategy from the RedX config section.
    pub fn new(config: RedxConfig) -> Self {
        let client = RedxApiClient::with_base_urls(
            config.api_base_url.as_deref().unwrap_or(REDX_API_BASE_URL),
            config.base_url.as_deref().unwrap_or(REDX_BASE_URL),
        );
        Self { client, config }
    }
}

#[async_trait]
impl Authenticator for RedxApiStrategy {
    fn courier(&self) -> CourierKind {
        CourierKind::Redx
    }

    fn cache_key(&self) -> &str {
        REDX_CACHE_KEY
    }

    async fn login(&self, ctx: &FetchContext) -> Result<ProviderCredential, FetchError> {
        self.client
            .login(&*ctx.http, &self.config.phone, &self.config.password)
            .await
    }

    async fn fetch_with(
        &self,
        ctx: &FetchContext,
        credential: &ProviderCredential,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError> {
        let token = credential
            .as_bearer()
            .ok_or(FetchError::Unauthorized { status: 401 })?;
        self.client.customer_stats(&*ctx.http, token, phone).await
    }
}

#[async_trait]
impl FetchStrategy for RedxApiStrategy {
    fn id(&self) -> &str {
        "redx.api"
    }

    fn courier(&self) -> CourierKind {
        CourierKind::Redx
    }

    fn kind(&self) -> FetchKind {
        FetchKind::BearerToken
    }

    #[instrument(skip(self, ctx), fields(phone = %phone))]
    async fn fetch(
        &self,
        ctx: &FetchContext,
        phone: &PhoneNumber,
    ) -> Result<FetchResult, FetchError> {
        debug!("Fetching RedX customer stats");
        let stats = fetch_with_reauth(self, ctx, phone).await?;
        Ok(FetchResult::new(stats, FetchStrategy::id(self), self.kind()))
    }
}
