//! Pathao response parsing.

use chrono::{Duration, Utc};
use fraudcheck_core::DeliveryStats;
use fraudcheck_fetch::{FetchError, ProviderCredential};

use super::api::{PathaoLoginResponse, PathaoSuccessResponse};

/// Seconds shaved off a reported token lifetime.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Parses the login response into a bearer credential.
///
/// A missing or blank `access_token` is an authentication failure.
pub fn parse_login_response(body: &str) -> Result<ProviderCredential, FetchError> {
    let response: PathaoLoginResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::AuthenticationFailed(format!("unreadable login response: {e}")))?;

    let token = response
        .access_token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| FetchError::AuthenticationFailed("no access_token in response".into()))?;

    let expires_at = response
        .expires_in
        .filter(|secs| *secs > EXPIRY_MARGIN_SECS)
        .map(|secs| Utc::now() + Duration::seconds(secs - EXPIRY_MARGIN_SECS));

    Ok(ProviderCredential::bearer(token, expires_at))
}

/// Parses the customer success response.
///
/// Missing counts read as zero. A body that is not JSON is invalid.
pub fn parse_success_response(body: &str) -> Result<DeliveryStats, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::InvalidResponse("empty body".into()));
    }
    let response: PathaoSuccessResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    Ok(response.to_stats())
}
