//! Customer billing: customers, invoices, invoice items

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billable customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// An invoice issued to a customer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub invoice_number: i32,
    pub date: DateTime<Utc>,
    pub paid: bool,
    pub customer_id: Uuid,
}

/// A line on an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub date_of_service: Option<NaiveDate>,
    pub description: String,
    pub price_per_unit: Decimal,
    pub quantity: Decimal,
}

impl InvoiceItem {
    /// Line amount, always `price_per_unit * quantity`.
    pub fn amount(&self) -> Decimal {
        self.price_per_unit * self.quantity
    }
}

/// Invoice subtotal: the sum of its line amounts.
pub fn invoice_subtotal<'a, I>(items: I) -> Decimal
where
    I: IntoIterator<Item = &'a InvoiceItem>,
{
    items.into_iter().map(InvoiceItem::amount).sum()
}
