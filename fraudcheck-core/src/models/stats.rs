//! Normalized delivery statistics.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Delivery history of one customer at one courier.
///
/// `total == success + cancel` holds for every value built through the
/// constructors. Couriers report either `(success, cancel)` or
/// `(success, total)`; use the matching constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeliveryStats {
    /// Successfully delivered parcels.
    pub success: u64,
    /// Cancelled or returned parcels.
    pub cancel: u64,
    /// All parcels.
    pub total: u64,
}

impl DeliveryStats {
    /// Builds stats from delivered and cancelled counts.
    pub fn from_success_and_cancel(success: u64, cancel: u64) -> Self {
        Self {
            success,
            cancel,
            total: success.saturating_add(cancel),
        }
    }

    /// Builds stats from delivered and total counts.
    ///
    /// A total smaller than `success` is raised to `success` (cancel = 0).
    pub fn from_success_and_total(success: u64, total: u64) -> Self {
        let total = total.max(success);
        Self {
            success,
            cancel: total - success,
            total,
        }
    }

    /// Returns true when no parcels are recorded.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Delivered share of all parcels in `[0, 1]`, `None` without parcels.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.success as f64 / self.total as f64)
        }
    }

    /// Checks the `total == success + cancel` invariant.
    ///
    /// Useful for stats that were deserialized rather than constructed.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.success.checked_add(self.cancel) == Some(self.total) {
            Ok(())
        } else {
            Err(CoreError::InvalidStats {
                success: self.success,
                cancel: self.cancel,
                total: self.total,
            })
        }
    }
}

impl std::ops::Add for DeliveryStats {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_success_and_cancel(
            self.success.saturating_add(rhs.success),
            self.cancel.saturating_add(rhs.cancel),
        )
    }
}

impl std::iter::Sum for DeliveryStats {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_and_cancel_sums_total() {
        let stats = DeliveryStats::from_success_and_cancel(5, 1);
        assert_eq!(stats, DeliveryStats { success: 5, cancel: 1, total: 6 });
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn test_success_and_total_derives_cancel() {
        let stats = DeliveryStats::from_success_and_total(8, 10);
        assert_eq!(stats, DeliveryStats { success: 8, cancel: 2, total: 10 });
    }

    #[test]
    fn test_success_above_total_is_clamped() {
        let stats = DeliveryStats::from_success_and_total(12, 10);
        assert_eq!(stats.total, 12);
        assert_eq!(stats.cancel, 0);
        assert!(stats.validate().is_ok());
    }

    #[test]
    fn test_zero_stats() {
        let stats = DeliveryStats::from_success_and_total(0, 0);
        assert!(stats.is_empty());
        assert_eq!(stats.success_rate(), None);
    }

    #[test]
    fn test_success_rate() {
        let stats = DeliveryStats::from_success_and_total(3, 4);
        assert_eq!(stats.success_rate(), Some(0.75));
    }

    #[test]
    fn test_validate_rejects_inconsistent_stats() {
        let stats = DeliveryStats { success: 1, cancel: 1, total: 5 };
        assert!(stats.validate().is_err());
    }

    #[test]
    fn test_sum() {
        let total: DeliveryStats = [
            DeliveryStats::from_success_and_total(8, 10),
            DeliveryStats::from_success_and_cancel(5, 1),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, DeliveryStats { success: 13, cancel: 3, total: 16 });
    }
}
