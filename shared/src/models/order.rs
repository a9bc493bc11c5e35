//! Replenishment orders and their lifecycle

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Lifecycle state of a replenishment order
///
/// Orders move `New -> Submitted -> Received`; `Cancelled` is reachable from
/// either open state. `Received` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    New,
    Submitted,
    Received,
    Cancelled,
}

/// Error for an order status string outside the enumerated set
#[derive(Debug, Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub String);

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::New,
        OrderStatus::Submitted,
        OrderStatus::Received,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "New",
            OrderStatus::Submitted => "Submitted",
            OrderStatus::Received => "Received",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Open orders are the ones the store is still waiting on.
    pub fn is_open(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::Submitted)
    }

    /// Whether moving from `self` to `next` is a legal lifecycle step.
    ///
    /// Re-asserting the current status is not a transition and is handled by
    /// callers as a no-op.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::New, OrderStatus::Submitted)
                | (OrderStatus::New, OrderStatus::Cancelled)
                | (OrderStatus::Submitted, OrderStatus::Received)
                | (OrderStatus::Submitted, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = InvalidOrderStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "New" => Ok(OrderStatus::New),
            "Submitted" => Ok(OrderStatus::Submitted),
            "Received" => Ok(OrderStatus::Received),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(InvalidOrderStatus(other.to_string())),
        }
    }
}

/// A replenishment order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
}

/// A single product line on an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// Total cost of an order from `(quantity, unit_price)` pairs.
pub fn order_cost<I>(lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    lines
        .into_iter()
        .map(|(quantity, unit_price)| quantity * unit_price)
        .sum()
}

/// Denormalized order line used to render the submission notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub product_name: String,
    pub unit_name: String,
    pub quantity: Decimal,
}

/// Render the order-submitted notice body.
///
/// Lines are grouped by vendor (sorted by vendor id); each vendor group
/// opens with a `Vendor:` header followed by its item lines, and the whole
/// body closes with a total-cost line.
pub fn vendor_grouped_summary(lines: &[OrderLine], total_cost: Decimal) -> String {
    let mut sorted: Vec<&OrderLine> = lines.iter().collect();
    sorted.sort_by_key(|line| line.vendor_id);

    let mut body = Vec::with_capacity(sorted.len() + 1);
    let mut current_vendor: Option<Uuid> = None;
    for line in sorted {
        if current_vendor != Some(line.vendor_id) {
            body.push(format!("{}:", line.vendor_name));
            current_vendor = Some(line.vendor_id);
        }
        body.push(format!(
            "{} {}s of {}",
            line.quantity, line.unit_name, line.product_name
        ));
    }
    body.push(format!("Total cost: {}", total_cost));
    body.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("Pending".parse::<OrderStatus>().is_err());
        assert!("new".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn terminal_states_admit_nothing() {
        for next in OrderStatus::ALL {
            assert!(!OrderStatus::Received.can_transition_to(next));
            assert!(!OrderStatus::Cancelled.can_transition_to(next));
        }
    }
}
