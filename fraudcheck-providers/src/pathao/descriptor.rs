//! Pathao courier descriptor.

use fraudcheck_core::CourierKind;
use fraudcheck_fetch::{FetchKind, FetchStrategy};
use fraudcheck_store::Config;

use super::strategies::{PATHAO_CACHE_KEY, PathaoApiStrategy};
use crate::descriptor::{CourierDescriptor, CourierMetadata, FetchPlan};

/// Returns the Pathao descriptor.
pub fn pathao_descriptor() -> CourierDescriptor {
    CourierDescriptor {
        id: CourierKind::Pathao,
        metadata: CourierMetadata {
            display_name: "Pathao",
            website: "https://merchant.pathao.com",
        },
        fetch_plan: FetchPlan {
            kind: FetchKind::BearerToken,
            cache_key: PATHAO_CACHE_KEY,
            build_strategy: build_pathao_strategy,
        },
        domains: &["merchant.pathao.com"],
    }
}

fn build_pathao_strategy(config: &Config) -> Option<Box<dyn FetchStrategy>> {
    let section = config.couriers.pathao.clone()?;
    Some(Box::new(PathaoApiStrategy::new(section)))
}
