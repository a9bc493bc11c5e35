//! Catalog reference data: units, categories, vendors, products

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unit of measure a product is counted in (bag, case, pound, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unit {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Product grouping used for reporting and browsing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Supplier a product is reordered from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A sellable/stockable product
///
/// References its unit of measure, category, and the vendor that
/// replenishment orders for it are placed with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub unit_id: Uuid,
    pub category_id: Uuid,
    pub vendor_id: Uuid,
    pub created_at: DateTime<Utc>,
}
