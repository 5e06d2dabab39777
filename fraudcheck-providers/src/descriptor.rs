//! Courier descriptor system.
//!
//! A descriptor contains all the static configuration for a courier:
//! - Metadata (display name, website)
//! - Fetch plan (auth mechanism, cache key, how to build the strategy)
//! - Network allowlist

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::{FetchKind, FetchStrategy};
use fraudcheck_store::Config;

// ============================================================================
// Courier Descriptor
// ============================================================================

/// Complete descriptor for a courier.
pub struct CourierDescriptor {
    /// Courier identifier.
    pub id: CourierKind,
    /// Display metadata.
    pub metadata: CourierMetadata,
    /// How to fetch delivery stats.
    pub fetch_plan: FetchPlan,
    /// Hosts the courier's requests may reach.
    pub domains: &'static [&'static str],
}

impl CourierDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &str {
        self.metadata.display_name
    }

    /// Returns the credential cache key.
    pub fn cache_key(&self) -> &str {
        self.fetch_plan.cache_key
    }

    /// Builds the strategy for this courier, if `config` configures it.
    pub fn build_strategy(&self, config: &Config) -> Option<Box<dyn FetchStrategy>> {
        (self.fetch_plan.build_strategy)(config)
    }
}

// ============================================================================
// Metadata
// ============================================================================

/// Display metadata of a courier.
#[derive(Debug, Clone, Copy)]
pub struct CourierMetadata {
    /// Human-readable name.
    pub display_name: &'static str,
    /// Public website.
    pub website: &'static str,
}

// ============================================================================
// Fetch Plan
// ============================================================================

/// Configuration for how to fetch delivery stats.
pub struct FetchPlan {
    /// Authentication mechanism.
    pub kind: FetchKind,
    /// Credential cache key.
    pub cache_key: &'static str,
    /// Builds the strategy from the courier's config section.
    pub build_strategy: fn(&Config) -> Option<Box<dyn FetchStrategy>>,
}
