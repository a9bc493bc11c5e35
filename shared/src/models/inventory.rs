//! Inventory levels and replenishment math

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::ReplenishmentPolicy;

/// Stock position for a single product
///
/// Exactly one level row exists per product. `quantity` is what is on hand,
/// `capacity` is the target fill level, and `reorder_level` is the threshold
/// at which the product counts as running low.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryLevel {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub capacity: Decimal,
    pub reorder_level: Decimal,
    pub created_at: DateTime<Utc>,
}

impl InventoryLevel {
    /// Whether the on-hand quantity has fallen to the reorder threshold.
    ///
    /// A reorder level of zero disables the check entirely; those products
    /// are never reported as running low.
    pub fn running_low(&self) -> bool {
        if self.reorder_level == Decimal::ZERO {
            false
        } else {
            self.quantity <= self.reorder_level
        }
    }

    /// Shortfall to refill the store to target capacity, clamped at zero.
    pub fn needed_at_store(&self) -> Decimal {
        if self.quantity >= self.capacity {
            Decimal::ZERO
        } else {
            self.capacity - self.quantity
        }
    }

    /// Cost of refilling to capacity at the product's current unit price.
    pub fn restock_cost(&self, unit_price: Decimal) -> Decimal {
        unit_price * self.needed_at_store()
    }
}

/// A proposed order line produced by the replenishment calculator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplenishmentCandidate {
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// Compute candidate order lines from the full set of inventory levels.
///
/// Produces one candidate per selected level, with quantity equal to that
/// level's `needed_at_store`. Selection depends on the policy: either only
/// the running-low rows, or every row. Pure; opening an order and attaching
/// the lines is the caller's decision.
pub fn replenishment_candidates(
    levels: &[InventoryLevel],
    policy: ReplenishmentPolicy,
) -> Vec<ReplenishmentCandidate> {
    levels
        .iter()
        .filter(|level| match policy {
            ReplenishmentPolicy::RunningLowOnly => level.running_low(),
            ReplenishmentPolicy::AllProducts => true,
        })
        .map(|level| ReplenishmentCandidate {
            product_id: level.product_id,
            quantity: level.needed_at_store(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(quantity: i64, capacity: i64, reorder_level: i64) -> InventoryLevel {
        InventoryLevel {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity: Decimal::from(quantity),
            capacity: Decimal::from(capacity),
            reorder_level: Decimal::from(reorder_level),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn zero_reorder_level_is_never_low() {
        let l = level(0, 10, 0);
        assert!(!l.running_low());
    }

    #[test]
    fn overfull_level_needs_nothing() {
        let l = level(12, 10, 5);
        assert_eq!(l.needed_at_store(), Decimal::ZERO);
        assert!(!l.running_low());
    }

    #[test]
    fn policy_selects_rows() {
        let levels = vec![level(2, 10, 5), level(9, 10, 5)];
        let low = replenishment_candidates(&levels, ReplenishmentPolicy::RunningLowOnly);
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].quantity, Decimal::from(8));

        let all = replenishment_candidates(&levels, ReplenishmentPolicy::AllProducts);
        assert_eq!(all.len(), 2);
    }
}
