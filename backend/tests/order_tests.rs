//! Order lifecycle tests
//!
//! Covers the status state machine, derived order cost, and the
//! vendor-grouped submission notice rendering.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{order_cost, vendor_grouped_summary, OrderLine, OrderStatus};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Legal lifecycle steps
    #[test]
    fn test_valid_transitions() {
        let valid = [
            (OrderStatus::New, OrderStatus::Submitted),
            (OrderStatus::New, OrderStatus::Cancelled),
            (OrderStatus::Submitted, OrderStatus::Received),
            (OrderStatus::Submitted, OrderStatus::Cancelled),
        ];

        for (from, to) in valid {
            assert!(from.can_transition_to(to), "{} -> {} should be legal", from, to);
        }
    }

    /// Illegal lifecycle steps
    #[test]
    fn test_invalid_transitions() {
        let invalid = [
            (OrderStatus::New, OrderStatus::Received),       // Skips Submitted
            (OrderStatus::Submitted, OrderStatus::New),      // Backward
            (OrderStatus::Received, OrderStatus::Submitted), // From terminal
            (OrderStatus::Cancelled, OrderStatus::New),      // From terminal
        ];

        for (from, to) in invalid {
            assert!(!from.can_transition_to(to), "{} -> {} should be illegal", from, to);
        }
    }

    /// Only New and Submitted count as open
    #[test]
    fn test_open_statuses() {
        assert!(OrderStatus::New.is_open());
        assert!(OrderStatus::Submitted.is_open());
        assert!(!OrderStatus::Received.is_open());
        assert!(!OrderStatus::Cancelled.is_open());
    }

    /// Status strings outside the enumerated set are rejected
    #[test]
    fn test_unknown_status_string_rejected() {
        assert!(OrderStatus::from_str("Pending").is_err());
        assert!(OrderStatus::from_str("received").is_err());
        assert!(OrderStatus::from_str("").is_err());
    }

    /// Cost of a two-line order
    #[test]
    fn test_order_cost() {
        let lines = vec![(dec("3"), dec("2.5")), (dec("1"), dec("10"))];
        assert_eq!(order_cost(lines), dec("17.5"));
    }

    /// An empty order costs nothing
    #[test]
    fn test_empty_order_cost() {
        let lines: Vec<(Decimal, Decimal)> = Vec::new();
        assert_eq!(order_cost(lines), Decimal::ZERO);
    }

    /// Items from two vendors render as two header groups plus a total line
    #[test]
    fn test_notice_groups_by_vendor() {
        let roaster = Uuid::from_u128(1);
        let supplier = Uuid::from_u128(2);

        let lines = vec![
            OrderLine {
                vendor_id: supplier,
                vendor_name: "Restaurant Supply Co".to_string(),
                product_name: "Paper Filters".to_string(),
                unit_name: "case".to_string(),
                quantity: dec("1"),
            },
            OrderLine {
                vendor_id: roaster,
                vendor_name: "Acme Roasters".to_string(),
                product_name: "House Blend".to_string(),
                unit_name: "bag".to_string(),
                quantity: dec("3"),
            },
            OrderLine {
                vendor_id: roaster,
                vendor_name: "Acme Roasters".to_string(),
                product_name: "Decaf Blend".to_string(),
                unit_name: "bag".to_string(),
                quantity: dec("2"),
            },
        ];

        let body = vendor_grouped_summary(&lines, dec("17.5"));

        let expected = "Acme Roasters:\n\
                        3 bags of House Blend\n\
                        2 bags of Decaf Blend\n\
                        Restaurant Supply Co:\n\
                        1 cases of Paper Filters\n\
                        Total cost: 17.5";
        assert_eq!(body, expected);
    }

    /// An order with no items still renders a total line
    #[test]
    fn test_notice_for_empty_order() {
        let body = vendor_grouped_summary(&[], Decimal::ZERO);
        assert_eq!(body, "Total cost: 0");
    }
}

// ============================================================================
// Lifecycle Simulation Helpers
// ============================================================================

#[cfg(test)]
mod lifecycle_helpers {
    use super::*;

    /// Simulate the create-order guard: every open order is closed out to
    /// Received before the new order opens in New.
    pub fn simulate_create_guard(existing: &mut Vec<OrderStatus>) {
        for status in existing.iter_mut() {
            if status.is_open() {
                *status = OrderStatus::Received;
            }
        }
        existing.push(OrderStatus::New);
    }

    #[test]
    fn test_guard_leaves_one_open_order() {
        let mut orders = vec![
            OrderStatus::New,
            OrderStatus::Submitted,
            OrderStatus::Received,
            OrderStatus::Cancelled,
        ];

        simulate_create_guard(&mut orders);

        let open = orders.iter().filter(|s| s.is_open()).count();
        assert_eq!(open, 1);
        assert_eq!(*orders.last().unwrap(), OrderStatus::New);
    }

    #[test]
    fn test_guard_closes_prior_orders_to_received() {
        let mut orders = vec![OrderStatus::New, OrderStatus::Submitted];

        simulate_create_guard(&mut orders);

        assert_eq!(orders[0], OrderStatus::Received);
        assert_eq!(orders[1], OrderStatus::Received);
    }

    /// The default order listing keeps exactly the open statuses
    #[test]
    fn test_default_listing_filter() {
        let orders = vec![
            OrderStatus::New,
            OrderStatus::Submitted,
            OrderStatus::Received,
            OrderStatus::Cancelled,
        ];

        let visible: Vec<&OrderStatus> = orders.iter().filter(|s| s.is_open()).collect();
        assert_eq!(visible, vec![&OrderStatus::New, &OrderStatus::Submitted]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for item quantities (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::New),
            Just(OrderStatus::Submitted),
            Just(OrderStatus::Received),
            Just(OrderStatus::Cancelled),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Order cost equals the folded sum of quantity * price
        #[test]
        fn prop_order_cost_is_line_sum(
            lines in prop::collection::vec((quantity_strategy(), price_strategy()), 0..20)
        ) {
            let expected = lines
                .iter()
                .fold(Decimal::ZERO, |acc, (q, p)| acc + q * p);

            prop_assert_eq!(order_cost(lines), expected);
        }

        /// Cost of non-negative lines is non-negative
        #[test]
        fn prop_order_cost_non_negative(
            lines in prop::collection::vec((quantity_strategy(), price_strategy()), 0..20)
        ) {
            prop_assert!(order_cost(lines) >= Decimal::ZERO);
        }

        /// Statuses survive a round trip through their wire strings
        #[test]
        fn prop_status_string_round_trip(status in status_strategy()) {
            let parsed = OrderStatus::from_str(status.as_str()).unwrap();
            prop_assert_eq!(parsed, status);
        }

        /// No status can step to itself, and terminal states go nowhere
        #[test]
        fn prop_transition_matrix_shape(
            from in status_strategy(),
            to in status_strategy()
        ) {
            if from == to {
                prop_assert!(!from.can_transition_to(to));
            }
            if !from.is_open() {
                prop_assert!(!from.can_transition_to(to));
            }
            // Every legal step leaves an open state
            if from.can_transition_to(to) {
                prop_assert!(from.is_open());
            }
        }

        /// However many orders exist in whatever states, the create guard
        /// leaves exactly one open order
        #[test]
        fn prop_guard_invariant(
            mut statuses in prop::collection::vec(status_strategy(), 0..20)
        ) {
            super::lifecycle_helpers::simulate_create_guard(&mut statuses);

            let open = statuses.iter().filter(|s| s.is_open()).count();
            prop_assert_eq!(open, 1);
        }

        /// The rendered notice always ends with the total-cost line and
        /// contains one header per distinct vendor
        #[test]
        fn prop_notice_shape(
            quantities in prop::collection::vec(quantity_strategy(), 1..8),
            vendor_count in 1u32..4
        ) {
            let lines: Vec<OrderLine> = quantities
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    let vendor = i as u32 % vendor_count;
                    OrderLine {
                        vendor_id: Uuid::from_u128(u128::from(vendor) + 1),
                        vendor_name: format!("Vendor {}", vendor),
                        product_name: format!("Product {}", i),
                        unit_name: "unit".to_string(),
                        quantity: *q,
                    }
                })
                .collect();

            let total = dec("42.0");
            let body = vendor_grouped_summary(&lines, total);
            let rendered: Vec<&str> = body.lines().collect();

            prop_assert_eq!(*rendered.last().unwrap(), "Total cost: 42.0");

            let headers = rendered.iter().filter(|l| l.ends_with(':')).count();
            let distinct = vendor_count.min(quantities.len() as u32) as usize;
            prop_assert_eq!(headers, distinct);

            // One line per item, plus headers, plus the total
            prop_assert_eq!(rendered.len(), lines.len() + distinct + 1);
        }
    }
}
