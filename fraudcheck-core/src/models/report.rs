//! Per-courier results and the aggregated fraud report.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::courier::{CourierKind, PhoneNumber};
use super::stats::DeliveryStats;

// ============================================================================
// Provider Failure
// ============================================================================

/// Broad category of a courier failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Login failed, or the courier rejected fresh credentials.
    Authentication,
    /// The courier answered with an error or an unusable payload.
    Upstream,
    /// The courier did not answer within its deadline.
    Timeout,
    /// The request never completed (DNS, TLS, connection reset).
    Transport,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Authentication => "authentication",
            Self::Upstream => "upstream",
            Self::Timeout => "timeout",
            Self::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Failure entry for one courier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFailure {
    /// Human-readable reason, e.g. `"authentication failed"`.
    #[serde(rename = "error")]
    pub reason: String,
    /// Failure category.
    pub kind: FailureKind,
    /// HTTP status returned by the courier, when there was one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ProviderFailure {
    /// Creates a failure without an upstream status.
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            kind,
            status: None,
        }
    }

    /// Attaches the upstream HTTP status.
    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.reason),
            None => f.write_str(&self.reason),
        }
    }
}

// ============================================================================
// Provider Result
// ============================================================================

/// Outcome of one courier lookup: stats or a failure, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderResult {
    /// Normalized delivery stats.
    Stats(DeliveryStats),
    /// The courier could not be queried.
    Error(ProviderFailure),
}

impl ProviderResult {
    /// Returns the stats, if the lookup succeeded.
    pub fn stats(&self) -> Option<&DeliveryStats> {
        match self {
            Self::Stats(stats) => Some(stats),
            Self::Error(_) => None,
        }
    }

    /// Returns the failure, if the lookup failed.
    pub fn failure(&self) -> Option<&ProviderFailure> {
        match self {
            Self::Stats(_) => None,
            Self::Error(failure) => Some(failure),
        }
    }

    /// Returns true for a successful lookup.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Stats(_))
    }
}

impl From<DeliveryStats> for ProviderResult {
    fn from(stats: DeliveryStats) -> Self {
        Self::Stats(stats)
    }
}

impl From<ProviderFailure> for ProviderResult {
    fn from(failure: ProviderFailure) -> Self {
        Self::Error(failure)
    }
}

// ============================================================================
// Fraud Report
// ============================================================================

/// Results of every configured courier for one phone number.
///
/// Holds exactly one entry per courier that was queried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudReport {
    /// The phone number that was checked.
    pub phone: PhoneNumber,
    /// When the check was started.
    pub checked_at: DateTime<Utc>,
    /// Result per courier.
    pub results: BTreeMap<CourierKind, ProviderResult>,
}

impl FraudReport {
    /// Creates an empty report for `phone`, stamped with the current time.
    pub fn new(phone: PhoneNumber) -> Self {
        Self {
            phone,
            checked_at: Utc::now(),
            results: BTreeMap::new(),
        }
    }

    /// Records the result of one courier, replacing any previous entry.
    pub fn insert(&mut self, courier: CourierKind, result: impl Into<ProviderResult>) {
        self.results.insert(courier, result.into());
    }

    /// Returns the result of one courier.
    pub fn get(&self, courier: CourierKind) -> Option<&ProviderResult> {
        self.results.get(&courier)
    }

    /// Number of couriers in the report.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if no courier was queried.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over couriers that returned stats.
    pub fn successes(&self) -> impl Iterator<Item = (CourierKind, &DeliveryStats)> {
        self.results
            .iter()
            .filter_map(|(kind, result)| result.stats().map(|s| (*kind, s)))
    }

    /// Iterates over couriers that failed.
    pub fn failures(&self) -> impl Iterator<Item = (CourierKind, &ProviderFailure)> {
        self.results
            .iter()
            .filter_map(|(kind, result)| result.failure().map(|f| (*kind, f)))
    }

    /// Stats summed over every courier that answered.
    pub fn combined(&self) -> DeliveryStats {
        self.successes().map(|(_, stats)| *stats).sum()
    }

    /// Combined delivered share across couriers, `None` without parcels.
    pub fn overall_success_rate(&self) -> Option<f64> {
        self.combined().success_rate()
    }
}
