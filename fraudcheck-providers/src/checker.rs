//! Fraud-check aggregation across couriers.
//!
//! [`FraudChecker`] validates the phone number once, then queries every
//! configured courier concurrently. Each courier is bounded by its own
//! deadline and its failure lands in the report instead of aborting the
//! others.

use std::collections::BTreeMap;
use std::time::Instant;

use fraudcheck_core::{CoreError, CourierKind, FraudReport, PhoneNumber, ProviderResult};
use fraudcheck_fetch::{FetchContext, FetchError, FetchStrategy};
use fraudcheck_store::{Config, StoreError};
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::registry::ProviderRegistry;

// ============================================================================
// Fraud Checker
// ============================================================================

/// Queries every configured courier for one phone number.
pub struct FraudChecker {
    ctx: FetchContext,
    strategies: BTreeMap<CourierKind, Box<dyn FetchStrategy>>,
}

impl FraudChecker {
    /// Creates a checker from explicit strategies.
    ///
    /// One strategy per courier; a later strategy for the same courier
    /// replaces the earlier one.
    pub fn new(ctx: FetchContext, strategies: Vec<Box<dyn FetchStrategy>>) -> Self {
        let mut map = BTreeMap::new();
        for strategy in strategies {
            let courier = strategy.courier();
            if let Some(previous) = map.insert(courier, strategy) {
                warn!(
                    courier = %courier,
                    replaced = previous.id(),
                    "Duplicate strategy for courier, keeping the last one"
                );
            }
        }
        Self {
            ctx,
            strategies: map,
        }
    }

    /// Creates a checker for every courier configured in `config`.
    ///
    /// Requests are restricted to the couriers' domains.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an invalid configuration, or
    /// [`StoreError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let ctx = config
            .context_builder()?
            .allowed_domains(ProviderRegistry::allowed_domains(config))
            .build()?;
        Ok(Self::new(ctx, ProviderRegistry::build_strategies(config)))
    }

    /// Creates a checker for `config` on an existing context.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for an invalid configuration.
    pub fn with_context(config: &Config, ctx: FetchContext) -> Result<Self, StoreError> {
        config.validate()?;
        Ok(Self::new(ctx, ProviderRegistry::build_strategies(config)))
    }

    /// Configured couriers, in report order.
    pub fn couriers(&self) -> Vec<CourierKind> {
        self.strategies.keys().copied().collect()
    }

    /// Context shared by all couriers.
    pub fn context(&self) -> &FetchContext {
        &self.ctx
    }

    /// Checks `phone` against every configured courier.
    ///
    /// # Errors
    ///
    /// Only [`CoreError::InvalidPhoneNumber`]; courier failures are entries
    /// of the report.
    #[instrument(skip(self))]
    pub async fn check(&self, phone: &str) -> Result<FraudReport, CoreError> {
        let phone = PhoneNumber::parse(phone)?;

        let lookups = self.strategies.iter().map(|(courier, strategy)| {
            let phone = &phone;
            async move { (*courier, self.run(strategy.as_ref(), phone).await) }
        });
        let results = join_all(lookups).await;

        let mut report = FraudReport::new(phone);
        for (courier, result) in results {
            report.insert(courier, result);
        }
        info!(
            couriers = report.len(),
            failures = report.failures().count(),
            "Fraud check complete"
        );
        Ok(report)
    }

    /// Checks `phone` against one courier.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPhoneNumber`], or
    /// [`CoreError::CourierNotConfigured`] when `courier` has no strategy.
    #[instrument(skip(self))]
    pub async fn check_courier(
        &self,
        courier: CourierKind,
        phone: &str,
    ) -> Result<ProviderResult, CoreError> {
        let phone = PhoneNumber::parse(phone)?;
        let strategy = self
            .strategies
            .get(&courier)
            .ok_or(CoreError::CourierNotConfigured(courier))?;
        Ok(self.run(strategy.as_ref(), &phone).await)
    }

    async fn run(&self, strategy: &dyn FetchStrategy, phone: &PhoneNumber) -> ProviderResult {
        let courier = strategy.courier();
        let deadline = self.ctx.courier_timeout();
        let started = Instant::now();

        let outcome = tokio::time::timeout(deadline, strategy.fetch(&self.ctx, phone))
            .await
            .unwrap_or_else(|_| Err(FetchError::Timeout(deadline)));
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(result) => {
                info!(
                    courier = %courier,
                    strategy = %result.strategy_id,
                    success = result.stats.success,
                    total = result.stats.total,
                    duration_ms,
                    "Courier check succeeded"
                );
                ProviderResult::Stats(result.stats)
            }
            Err(e) => {
                let failure = e.to_failure();
                warn!(
                    courier = %courier,
                    error = %e,
                    kind = %failure.kind,
                    duration_ms,
                    "Courier check failed"
                );
                ProviderResult::Error(failure)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
