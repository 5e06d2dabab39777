//! Pathao merchant API client.

use fraudcheck_core::{DeliveryStats, PhoneNumber};
use fraudcheck_fetch::{FetchError, HttpClient, HttpRequest, ProviderCredential};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use super::parser::{parse_login_response, parse_success_response};
use crate::counts::lenient_count;

// ============================================================================
// Constants
// ============================================================================

/// Pathao merchant API base URL.
pub const PATHAO_BASE_URL: &str = "https://merchant.pathao.com";

/// Login endpoint.
const LOGIN_ENDPOINT: &str = "/api/v1/login";

/// Customer success endpoint.
const SUCCESS_ENDPOINT: &str = "/api/v1/user/success";

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the Pathao login endpoint.
#[derive(Debug, Deserialize)]
pub struct PathaoLoginResponse {
    /// Bearer token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response from the customer success endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct PathaoSuccessResponse {
    /// Payload.
    #[serde(default)]
    pub data: Option<PathaoSuccessData>,
}

/// `data` object of [`PathaoSuccessResponse`].
#[derive(Debug, Default, Deserialize)]
pub struct PathaoSuccessData {
    /// Customer delivery counts.
    #[serde(default)]
    pub customer: Option<PathaoCustomer>,
}

/// Delivery counts of one customer.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PathaoCustomer {
    /// Delivered parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub successful_delivery: u64,

    /// All parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_delivery: u64,
}

impl PathaoSuccessResponse {
    /// Normalizes to delivery stats. Cancelled = total - delivered.
    pub fn to_stats(&self) -> DeliveryStats {
        let customer = self
            .data
            .as_ref()
            .and_then(|d| d.customer.as_ref())
            .copied()
            .unwrap_or_default();
        DeliveryStats::from_success_and_total(customer.successful_delivery, customer.total_delivery)
    }
}

// ============================================================================
// API Client
// ============================================================================

/// Pathao merchant API client.
#[derive(Debug, Clone)]
pub struct PathaoApiClient {
    base_url: String,
}

impl PathaoApiClient {
    /// Creates a client for the public API.
    pub fn new() -> Self {
        Self::with_base_url(PATHAO_BASE_URL)
    }

    /// Creates a client for another API root.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// API root in use.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Logs in and returns the bearer credential.
    #[instrument(skip(self, http, password))]
    pub async fn login(
        &self,
        http: &dyn HttpClient,
        username: &str,
        password: &str,
    ) -> Result<ProviderCredential, FetchError> {
        let request = HttpRequest::post(format!("{}{LOGIN_ENDPOINT}", self.base_url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(json!({ "username": username, "password": password }));

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
    pub async fn customer_success(
        &self,
        http: &dyn HttpClient,
        token: &str,
        phone: &PhoneNumber,
    ) -> Result<DeliveryStats, FetchError> {
        let request = HttpRequest::post(format!("{}{SUCCESS_ENDPOINT}", self.base_url))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .bearer(token)
            .json(json!({ "phone": phone.as_str() }));

        let response = http.send(request).await?;
        debug!(status = %response.status, "Customer success response");

        if response.status == StatusCode::UNAUTHORIZED {
            return Err(FetchError::Unauthorized {
                status: response.status.as_u16(),
            });
        }
        if !response.is_success() {
            return Err(FetchError::upstream_status(response.status.as_u16()));
        }
        parse_success_response(&response.body)
    }
}

impl Default for PathaoApiClient {
    fn default() -> Self {
        Self::new()
    }
}
