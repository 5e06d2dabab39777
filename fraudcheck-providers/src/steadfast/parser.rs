//! Steadfast fraud-check response parsing.

use fraudcheck_core::DeliveryStats;
use fraudcheck_fetch::FetchError;
use serde::Deserialize;
use serde_json::Value;

use crate::counts::lenient_count;

/// Fraud-check payload of the Steadfast dashboard.
#[derive(Debug, Default, Deserialize)]
pub struct SteadfastFraudResponse {
    /// Delivered parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_delivered: u64,

    /// Cancelled parcels.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_cancelled: u64,
}

impl SteadfastFraudResponse {
    /// Normalizes to delivery stats. Total = delivered + cancelled.
    pub fn to_stats(&self) -> DeliveryStats {
        DeliveryStats::from_success_and_cancel(self.total_delivered, self.total_cancelled)
    }
}

/// Parses the fraud-check body.
///
/// Empty bodies, non-JSON, non-object or empty JSON, and payloads carrying an
/// `error` field are invalid. Missing counts read as zero.
pub fn parse_fraud_check(body: &str) -> Result<DeliveryStats, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::InvalidResponse("empty body".into()));
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    let Value::Object(ref object) = value else {
        return Err(FetchError::InvalidResponse("expected a JSON object".into()));
    };
    if object.is_empty() {
        return Err(FetchError::InvalidResponse("empty object".into()));
    }
    if let Some(error) = object.get("error") {
        return Err(FetchError::InvalidResponse(format!("error field: {error}")));
    }

    let response: SteadfastFraudResponse =
        serde_json::from_value(value).map_err(|e| FetchError::InvalidResponse(e.to_string()))?;
    Ok(response.to_stats())
}
