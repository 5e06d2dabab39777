//! Steadfast courier descriptor.

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::{FetchKind, FetchStrategy};
use fraudcheck_store::Config;

use super::strategies::{STEADFAST_CACHE_KEY, SteadfastWebStrategy};
use crate::descriptor::{CourierDescriptor, CourierMetadata, FetchPlan};

/// Returns the Steadfast descriptor.
pub fn steadfast_descriptor() -> CourierDescriptor {
    CourierDescriptor {
        id: CourierKind::Steadfast,
        metadata: CourierMetadata {
            display_name: "Steadfast",
            website: "https://www.steadfast.com.bd",
        },
        fetch_plan: FetchPlan {
            kind: FetchKind::WebSession,
            cache_key: STEADFAST_CACHE_KEY,
            build_strategy: build_steadfast_strategy,
        },
        domains: &["steadfast.com.bd"],
    }
}

fn build_steadfast_strategy(config: &Config) -> Option<Box<dyn FetchStrategy>> {
    let section = config.couriers.steadfast.clone()?;
    Some(Box::new(SteadfastWebStrategy::new(section)))
}
