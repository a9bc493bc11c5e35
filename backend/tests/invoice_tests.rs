//! Invoicing tests
//!
//! Covers the derived money fields: line amount and invoice subtotal.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::models::{invoice_subtotal, InvoiceItem};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(price_per_unit: Decimal, quantity: Decimal) -> InvoiceItem {
    InvoiceItem {
        id: Uuid::new_v4(),
        invoice_id: Uuid::new_v4(),
        date_of_service: NaiveDate::from_ymd_opt(2024, 6, 1),
        description: "Service".to_string(),
        price_per_unit,
        quantity,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Line amount is price times quantity
    #[test]
    fn test_item_amount() {
        let i = item(dec("25.0"), dec("3"));
        assert_eq!(i.amount(), dec("75.0"));
    }

    /// Fractional quantities are billed exactly
    #[test]
    fn test_fractional_quantity_amount() {
        let i = item(dec("10.00"), dec("2.5"));
        assert_eq!(i.amount(), dec("25.0"));
    }

    /// Subtotal sums the line amounts
    #[test]
    fn test_invoice_subtotal() {
        let items = vec![item(dec("2.5"), dec("3")), item(dec("10"), dec("1"))];
        assert_eq!(invoice_subtotal(&items), dec("17.5"));
    }

    /// An invoice with no items subtotals to zero
    #[test]
    fn test_empty_invoice_subtotal() {
        let items: Vec<InvoiceItem> = Vec::new();
        assert_eq!(invoice_subtotal(&items), Decimal::ZERO);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for quantities (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for unit prices (0.01 to 1000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=100000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// amount is always price_per_unit * quantity
        #[test]
        fn prop_amount_is_product(
            price in price_strategy(),
            quantity in quantity_strategy()
        ) {
            let i = item(price, quantity);
            prop_assert_eq!(i.amount(), price * quantity);
        }

        /// Subtotal equals the folded sum of the line amounts
        #[test]
        fn prop_subtotal_is_amount_sum(
            specs in prop::collection::vec((price_strategy(), quantity_strategy()), 0..20)
        ) {
            let items: Vec<InvoiceItem> = specs
                .iter()
                .map(|(p, q)| item(*p, *q))
                .collect();

            let expected = items
                .iter()
                .fold(Decimal::ZERO, |acc, i| acc + i.amount());

            prop_assert_eq!(invoice_subtotal(&items), expected);
        }

        /// Subtotal of non-negative lines is non-negative
        #[test]
        fn prop_subtotal_non_negative(
            specs in prop::collection::vec((price_strategy(), quantity_strategy()), 0..20)
        ) {
            let items: Vec<InvoiceItem> = specs
                .iter()
                .map(|(p, q)| item(*p, *q))
                .collect();

            prop_assert!(invoice_subtotal(&items) >= Decimal::ZERO);
        }
    }
}
