//! Inventory replenishment tests
//!
//! Covers the derived inventory fields and the replenishment calculator:
//! - running_low threshold behavior (including the reorder_level = 0 case)
//! - needed_at_store clamping
//! - candidate generation under both policies

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{replenishment_candidates, InventoryLevel};
use shared::types::ReplenishmentPolicy;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn level(quantity: Decimal, capacity: Decimal, reorder_level: Decimal) -> InventoryLevel {
    InventoryLevel {
        id: Uuid::new_v4(),
        product_id: Uuid::new_v4(),
        quantity,
        capacity,
        reorder_level,
        created_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// A level well under its threshold is low and needs the shortfall
    #[test]
    fn test_under_threshold_level() {
        let l = level(dec("2"), dec("10"), dec("5"));

        assert!(l.running_low());
        assert_eq!(l.needed_at_store(), dec("8"));
    }

    /// An overfull level needs nothing and is not low
    #[test]
    fn test_overfull_level_clamps_to_zero() {
        let l = level(dec("12"), dec("10"), dec("5"));

        assert!(!l.running_low());
        assert_eq!(l.needed_at_store(), Decimal::ZERO);
    }

    /// Quantity exactly at the reorder level counts as low
    #[test]
    fn test_boundary_quantity_is_low() {
        let l = level(dec("5"), dec("10"), dec("5"));
        assert!(l.running_low());
    }

    /// A zero reorder level disables the check
    #[test]
    fn test_zero_reorder_level_never_low() {
        let l = level(dec("0"), dec("10"), dec("0"));
        assert!(!l.running_low());
    }

    /// Restock cost is unit price times the shortfall
    #[test]
    fn test_restock_cost() {
        let l = level(dec("2"), dec("10"), dec("5"));
        assert_eq!(l.restock_cost(dec("2.5")), dec("20.0"));
    }

    /// The running-low policy drops well-stocked rows
    #[test]
    fn test_running_low_policy_filters() {
        let levels = vec![
            level(dec("2"), dec("10"), dec("5")),
            level(dec("9"), dec("10"), dec("5")),
            level(dec("7"), dec("10"), dec("0")),
        ];

        let candidates = replenishment_candidates(&levels, ReplenishmentPolicy::RunningLowOnly);

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].product_id, levels[0].product_id);
        assert_eq!(candidates[0].quantity, dec("8"));
    }

    /// The all-products policy keeps every row, even saturated ones
    #[test]
    fn test_all_products_policy_keeps_everything() {
        let levels = vec![
            level(dec("2"), dec("10"), dec("5")),
            level(dec("10"), dec("10"), dec("5")),
        ];

        let candidates = replenishment_candidates(&levels, ReplenishmentPolicy::AllProducts);

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[1].quantity, Decimal::ZERO);
    }

    /// No inventory means no candidates under either policy
    #[test]
    fn test_empty_inventory() {
        for policy in [ReplenishmentPolicy::RunningLowOnly, ReplenishmentPolicy::AllProducts] {
            assert!(replenishment_candidates(&[], policy).is_empty());
        }
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for non-negative stock quantities (0.0 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for positive reorder thresholds (0.1 to 1000.0)
    fn threshold_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// needed_at_store is never negative and equals the clamped shortfall
        #[test]
        fn prop_needed_at_store_clamped(
            quantity in quantity_strategy(),
            capacity in quantity_strategy(),
            reorder in quantity_strategy()
        ) {
            let l = level(quantity, capacity, reorder);
            let needed = l.needed_at_store();

            prop_assert!(needed >= Decimal::ZERO);

            let expected = if capacity > quantity {
                capacity - quantity
            } else {
                Decimal::ZERO
            };
            prop_assert_eq!(needed, expected);
        }

        /// With a positive threshold, running_low is exactly quantity <= threshold
        #[test]
        fn prop_running_low_iff_at_or_below_threshold(
            quantity in quantity_strategy(),
            capacity in quantity_strategy(),
            reorder in threshold_strategy()
        ) {
            let l = level(quantity, capacity, reorder);
            prop_assert_eq!(l.running_low(), quantity <= reorder);
        }

        /// A zero threshold never reports low, whatever the quantity
        #[test]
        fn prop_zero_threshold_never_low(
            quantity in quantity_strategy(),
            capacity in quantity_strategy()
        ) {
            let l = level(quantity, capacity, Decimal::ZERO);
            prop_assert!(!l.running_low());
        }

        /// Running-low candidates are a subset of all-products candidates
        #[test]
        fn prop_policies_nest(
            specs in prop::collection::vec(
                (quantity_strategy(), quantity_strategy(), quantity_strategy()),
                0..10
            )
        ) {
            let levels: Vec<InventoryLevel> = specs
                .into_iter()
                .map(|(q, c, r)| level(q, c, r))
                .collect();

            let low = replenishment_candidates(&levels, ReplenishmentPolicy::RunningLowOnly);
            let all = replenishment_candidates(&levels, ReplenishmentPolicy::AllProducts);

            prop_assert_eq!(all.len(), levels.len());
            for candidate in &low {
                prop_assert!(all.contains(candidate));
            }
        }

        /// Every candidate carries its level's needed_at_store quantity
        #[test]
        fn prop_candidate_quantities_match_shortfall(
            specs in prop::collection::vec(
                (quantity_strategy(), quantity_strategy(), quantity_strategy()),
                1..10
            )
        ) {
            let levels: Vec<InventoryLevel> = specs
                .into_iter()
                .map(|(q, c, r)| level(q, c, r))
                .collect();

            let all = replenishment_candidates(&levels, ReplenishmentPolicy::AllProducts);

            for (l, candidate) in levels.iter().zip(all.iter()) {
                prop_assert_eq!(candidate.product_id, l.product_id);
                prop_assert_eq!(candidate.quantity, l.needed_at_store());
            }
        }
    }
}
