//! Courier registry for managing all courier descriptors.
//!
//! The registry provides static access to all courier configurations
//! and is the central point for turning a [`Config`] into strategies.

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::FetchStrategy;
use fraudcheck_store::Config;
use std::sync::OnceLock;
use tracing::debug;
use url::Url;

use crate::descriptor::CourierDescriptor;
use crate::pathao::pathao_descriptor;
use crate::redx::redx_descriptor;
use crate::steadfast::steadfast_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all courier descriptors.
static DESCRIPTORS: OnceLock<Vec<CourierDescriptor>> = OnceLock::new();

/// Initializes all courier descriptors, in report order.
fn init_descriptors() -> Vec<CourierDescriptor> {
    vec![
        steadfast_descriptor(),
        pathao_descriptor(),
        redx_descriptor(),
    ]
}

// ============================================================================
// Courier Registry
// ============================================================================

/// Global registry of all courier descriptors.
///
/// The registry is initialized lazily on first access. It holds static
/// descriptors only; strategies are built per [`Config`].
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Returns all courier descriptors.
    pub fn all() -> &'static [CourierDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a courier descriptor by kind.
    pub fn get(id: CourierKind) -> Option<&'static CourierDescriptor> {
        Self::all().iter().find(|d| d.id == id)
    }

    /// Returns the number of registered couriers.
    pub fn count() -> usize {
        Self::all().len()
    }

    /// Returns all courier kinds.
    pub fn kinds() -> Vec<CourierKind> {
        Self::all().iter().map(|d| d.id).collect()
    }

    /// Builds one strategy per courier configured in `config`.
    pub fn build_strategies(config: &Config) -> Vec<Box<dyn FetchStrategy>> {
        Self::all()
            .iter()
            .filter_map(|desc| {
                let strategy = desc.build_strategy(config)?;
                debug!(courier = %desc.id, strategy = strategy.id(), "Built strategy");
                Some(strategy)
            })
            .collect()
    }

    /// Hosts the configured couriers may reach.
    ///
    /// Every descriptor's domains, plus the host of any base URL override.
    pub fn allowed_domains(config: &Config) -> Vec<String> {
        let couriers = &config.couriers;
        let overrides = [
            couriers.steadfast.as_ref().and_then(|c| c.base_url.as_deref()),
            couriers.pathao.as_ref().and_then(|c| c.base_url.as_deref()),
            couriers.redx.as_ref().and_then(|c| c.api_base_url.as_deref()),
            couriers.redx.as_ref().and_then(|c| c.base_url.as_deref()),
        ];

        let mut domains: Vec<String> = Self::all()
            .iter()
            .flat_map(|d| d.domains.iter().map(|s| (*s).to_string()))
            .collect();
        domains.extend(
            overrides
                .into_iter()
                .flatten()
                .filter_map(|raw| Url::parse(raw).ok()?.host_str().map(str::to_string)),
        );
        domains.sort();
        domains.dedup();
        domains
    }
}

// ============================================================================
// Tests
// ============================================================================
