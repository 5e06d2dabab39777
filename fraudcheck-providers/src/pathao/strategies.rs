//! Pathao fetch strategies.

use async_trait::async_trait;
use fraudcheck_core::{CourierKind, DeliveryStats, PhoneNumber};
use fraudcheck_fetch::{
    Authenticator, FetchContext, FetchError, FetchKind, FetchResult, FetchStrategy,
    ProviderCredential, fetch_with_reauth,
};
use fraudcheck_store::PathaoConfig;
use tracing::{debug, instrument};

use super::api::PathaoApiClient;

/// Cache key of the Pathao bearer token.
pub const PATHAO_CACHE_KEY: &str = "pathao_access_token";

/// Fetch strategy using the Pathao merchant API.
pub struct PathaoApiStrategy {
    client: PathaoApiClient,
    config: PathaoConfig,
}

impl PathaoApiStrategy {
    /// Creates a strategy from the Pathao config section.
    pub fn new(config: PathaoConfig) -> Self {
        let client = match config.base_url {
            Some(ref url) => PathaoApiClient::with_base_url(url.clone()),
            None => PathaoApiClient::new(),
        };
        Self { client, config }
    }
}

#[async_trait]
impl Authenticator for PathaoApiStrategy {
    fn courier(&self) -> CourierKind {
        CourierKind::Pathao
    }

    fn cache_key(&self) -> &str {
        PATHAO_CACHE_KEY
    }

    async fn login(&self, ctx: &FetchContext) -> Result<ProviderCredential, FetchError> {
        self.client
            .login(&*ctx.http, &self.config.username, &self.config.password)
            .await
    }

    async fn fetch_with(
        &self,
        ctx: &FetchContext,
        credential: &ProviderCredential,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError> {
        // A non-bearer entry under this key is unusable; treat it as rejected.
        let token = credential
            .as_bearer()
            .ok_or(FetchError::Unauthorized { status: 401 })?;
        self.client.customer_success(&*ctx.http, token, phone).await
    }
}

#[async_trait]
impl FetchStrategy for PathaoApiStrategy {
    fn id(&self) -> &str {
        "pathao.api"
    }

    fn courier(&self) -> CourierKind {
        CourierKind::Pathao
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
        debug!("Fetching Pathao customer stats");
        let stats = fetch_with_reauth(self, ctx, phone).await?;
        Ok(FetchResult::new(stats, FetchStrategy::id(self), self.kind()))
    }
}
