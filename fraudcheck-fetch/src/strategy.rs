//! Fetch strategy trait and types.
//!
//! A strategy is the way one courier is queried. Each configured courier
//! contributes exactly one strategy to the checker.

use async_trait::async_trait;
use fraudcheck_core::{CourierKind, DeliveryStats, PhoneNumber};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::context::FetchContext;
use crate::error::FetchError;

// ============================================================================
// Fetch Kind
// ============================================================================

/// The authentication mechanism a strategy uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    /// API login returning a bearer token.
    BearerToken,
    /// Web login with CSRF token and session cookies.
    WebSession,
}

impl FetchKind {
    /// Returns the display name for this kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::BearerToken => "Bearer Token",
            Self::WebSession => "Web Session",
        }
    }
}

impl fmt::Display for FetchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Fetch Result
// ============================================================================

/// The result of a successful fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Normalized stats.
    pub stats: DeliveryStats,
    /// The strategy that produced them.
    pub strategy_id: String,
    /// The kind of fetch used.
    pub kind: FetchKind,
}

impl FetchResult {
    /// Creates a new fetch result.
    pub fn new(stats: DeliveryStats, strategy_id: impl Into<String>, kind: FetchKind) -> Self {
        Self {
            stats,
            strategy_id: strategy_id.into(),
            kind,
        }
    }
}

// ============================================================================
// Fetch Strategy Trait
// ============================================================================

/// A way of fetching delivery stats from one courier.
///
/// ## Implementing a Strategy
///
/// ```ignore
/// struct PathaoApiStrategy;
///
/// #[async_trait]
/// impl FetchStrategy for PathaoApiStrategy {
///     fn id(&self) -> &str {
///         "pathao.api"
///     }
///
///     fn courier(&self) -> CourierKind {
///         CourierKind::Pathao
///     }
///
///     fn kind(&self) -> FetchKind {
///         FetchKind::BearerToken
///     }
///
///     async fn fetch(&self, ctx: &FetchContext, phone: &PhoneNumber)
///         -> Result<FetchResult, FetchError>
///     {
///         let stats = fetch_with_reauth(self, ctx, phone).await?;
///         Ok(FetchResult::new(stats, self.id(), self.kind()))
///     }
/// }
/// ```
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    /// Unique identifier for this strategy (e.g., "pathao.api").
    ///
    /// Format: `{courier}.{method}`
    fn id(&self) -> &str;

    /// The courier this strategy queries.
    fn courier(&self) -> CourierKind;

    /// The kind of fetch this strategy uses.
    fn kind(&self) -> FetchKind;

    /// Human-readable name for this strategy.
    fn display_name(&self) -> String {
        format!("{} ({})", self.id(), self.kind().display_name())
    }

    /// Fetches stats for an already validated phone number.
    async fn fetch(&self, ctx: &FetchContext, phone: &PhoneNumber)
    -> Result<FetchResult, FetchError>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_kind_display() {
        assert_eq!(FetchKind::BearerToken.display_name(), "Bearer Token");
        assert_eq!(FetchKind::WebSession.to_string(), "Web Session");
    }

    #[test]
    fn test_fetch_kind_serde() {
        let json = serde_json::to_string(&FetchKind::WebSession).unwrap();
        assert_eq!(json, "\"web_session\"");
    }
}
