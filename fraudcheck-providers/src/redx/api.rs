//! RedX API client.

use fraudcheck_core::{DeliveryStats, PhoneNumber};
use fraudcheck_fetch::{FetchError, HttpClient, HttpRequest, ProviderCredential};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::parser::{parse_login_response, parse_stats_response};
use crate::counts::lenient_count;

// ============================================================================
// Constants
// ============================================================================

/// RedX login API base URL.
pub const REDX_API_BASE_URL: &str = "https://api.redx.com.bd";

/// RedX web base URL serving customer stats.
pub const REDX_BASE_URL: &str = "https://redx.com.bd";

/// Login endpoint (on the API host).
const LOGIN_ENDPOINT: &str = "/v4/auth/login";

/// Customer stats endpoint (on the web host).
const STATS_ENDPOINT: &str = "/api/redx_se/admin/parcel/customer-success-return-rate";

/// Country prefix RedX expects on phone numbers.
const COUNTRY_PREFIX: &str = "88";

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the RedX login endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RedxLoginResponse {
    /// Payload.
    #[serde(default)]
    pub data: Option<RedxLoginData>,
}

/// `data` object of [`RedxLoginResponse`].
#[derive(Debug, Default, Deserialize)]
pub struct RedxLoginData {
    /// Bearer token.
    #[serde(default, rename = "accessToken", alias = "access_token")]
    pub access_token: Option<String>,
}

/// Response from the customer stats endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RedxStatsResponse {
    /// Payload.
    #[serde(default)]
    pub data: Option<RedxStatsData>,
}

/// `data` object of [`RedxStatsResponse`].
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedxStatsData {
    /// All parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_parcels: u64,

    /// Delivered parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub delivered_parcels: u64,
}

impl RedxStatsResponse {
    /// Normalizes to delivery stats. Cancelled = total - delivered.
    pub fn to_stats(&self) -> DeliveryStats {
        let data = self.data.unwrap_or_default();
        DeliveryStats::from_success_and_total(data.delivered_parcels, data.total_parcels)
    }
}

/// Adds the country prefix unless already present.
fn with_country_prefix(phone: &str) -> String {
    if phone.starts_with(COUNTRY_PREFIX) {
        phone.to_string()
    } else {
        format!("{COUNTRY_PREFIX}{phone}")
    }
}

// ============================================================================
// API Client
// ============================================================================

/// RedX API client.
#[derive(Debug, Clone)]
pub struct RedxApiClient {
    api_base_url: String,
    base_url: String,
}

impl RedxApiClient {
    /// Creates a client for the public hosts.
    pub fn new() -> Self {
        Self::with_base_urls(REDX_API_BASE_URL, REDX_BASE_URL)
    }

    /// Creates a client for other hosts.
    pub fn with_base_urls(api_base_url: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Logs in and returns the bearer credential.
    #[instrument(skip(self, http, password))]
    pub async fn login(
        &self,
        http: &dyn HttpClient,
        phone: &str,
        password: &str,
    ) -> Result<ProviderCredential, FetchError> {
        let request = HttpRequest::post(format!("{}{LOGIN_ENDPOINT}", self.api_base_url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(json!({ "phone": with_country_prefix(phone), "password": password }));

        let response = http.send(request).await?;
        debug!(status = %response.status, "Login response");

        if !response.is_success() {
            return Err(FetchError::AuthenticationFailed(format!(
                "login returned {}",
                response.status
            )));
        }
        parse_login_response(&response.body)
    }

    /// Fetches delivery stats of `phone`.
    #[instrument(skip(self, http, token), fields(phone = %phone))]
    pub async fn customer_stats(
        &self,
        http: &dyn HttpClient,
        token: &str,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError> {
        let url = format!(
            "{}{STATS_ENDPOINT}?phoneNumber={}",
            self.base_url,
            phone.international()
        );
        let request = HttpRequest::get(url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .bearer(token);

        let response = http.send(request).await?;
        debug!(status = %response.status, "Customer stats response");

        if response.status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized {
                status: response.status.as_u16(),
            });
        }
        if !response.is_success() {
            return Err(FetchError::upstream_status(response.status.as_u16()));
        }
        parse_stats_response(&response.body)
    }
}

impl Default for RedxApiClient {
    fn default() -> Self {
        Self::new()
    }
}
