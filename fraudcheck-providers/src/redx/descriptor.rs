//! RedX courier descriptor.

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::{FetchKind, FetchStrategy};
use fraudcheck_store::Config;

use super::strategies::{REDX_CACHE_KEY, RedxApiStrategy};
use crate::descriptor::{CourierDescriptor, CourierMetadata, FetchPlan};

/// Returns the RedX descriptor.
pub fn redx_descriptor() -> CourierDescriptor {
    CourierDescriptor {
        id: CourierKind::Redx,
        metadata: CourierMetadata {
            display_name: "RedX",
            website: "https://redx.com.bd",
        },
        fetch_plan: FetchPlan {
            kind: FetchKind::BearerToken,
            cache_key: REDX_CACHE_KEY,
            build_strategy: build_redx_strategy,
        },
        domains: &["redx.com.bd"],
    }
}

fn build_redx_strategy(config: &Config) -> Option<Box<dyn FetchStrategy>> {
    let section = config.couriers.redx.clone()?;
    Some(Box::new(RedxApiStrategy::new(section)))
}
