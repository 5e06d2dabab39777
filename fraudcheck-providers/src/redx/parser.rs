//! RedX response parsing.

use fraudcheck_core::DeliveryStats;
use fraudcheck_fetch::{FetchError, ProviderCredential};

use super::api::{RedxLoginResponse, RedxStatsResponse};

/// Parses the login response into a bearer credential.
///
/// RedX reports no token lifetime; the configured TTL applies.
pub fn parse_login_response(body: &str) -> Result<ProviderCredential, FetchError> {
    let response: RedxLoginResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::AuthenticationFailed(format!("unreadable login response: {e}")))?;

    response
        .data
        .and_then(|d| d.access_token)
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .map(|token| ProviderCredential::bearer(token, None))
        .ok_or_else(|| FetchError::AuthenticationFailed("no accessToken in response".into()))
}

/// Parses the customer stats response. Missing counts read as zero.
pub fn parse_stats_response(body: &str) -> Result<DeliveryStats, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::InvalidResponse("empty body".into()));
    }
    let response: RedxStatsResponse =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    Ok(response.to_stats())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let credential = parse_login_response(r#"{"data": {"accessToken": "jwt"}}"#).unwrap();
        assert_eq!(credential, ProviderCredential::bearer("jwt", None));
    }

    #[test]
    fn test_parse_login_rejects_blank() {
        for body in [r#"{"data": {}}"#, r#"{"data": {"accessToken": "  "}}"#, r#"{}"#] {
            assert!(matches!(
                parse_login_response(body),
                Err(FetchError::AuthenticationFailed(_))
            ));
        }
    }

    #[test]
    fn test_parse_stats() {
        let body = r#"{"data": {"totalParcels": 12, "deliveredParcels": 9}}"#;
        let stats = parse_stats_response(body).unwrap();
        assert_eq!(stats, DeliveryStats { success: 9, cancel: 3, total: 12 });
    }

    #[test]
    fn test_parse_stats_string_counts() {
        let body = r#"{"data": {"totalParcels": "4", "deliveredParcels": "4"}}"#;
        let stats = parse_stats_response(body).unwrap();
        assert_eq!(stats, DeliveryStats { success: 4, cancel: 0, total: 4 });
    }
}
