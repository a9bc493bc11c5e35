//! Inventory service for per-product stock levels

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::InventoryLevel;
use shared::validation::validate_non_negative;

use crate::error::{AppError, AppResult};

/// Inventory service for stock levels and their derived fields
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Inventory level row joined with the product's unit price
#[derive(Debug, FromRow)]
struct LevelRow {
    id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    capacity: Decimal,
    reorder_level: Decimal,
    created_at: DateTime<Utc>,
    unit_price: Decimal,
}

impl LevelRow {
    fn level(&self) -> InventoryLevel {
        InventoryLevel {
            id: self.id,
            product_id: self.product_id,
            quantity: self.quantity,
            capacity: self.capacity,
            reorder_level: self.reorder_level,
            created_at: self.created_at,
        }
    }
}

/// Inventory representation returned to clients; the last three fields are
/// derived on every read, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryResponse {
    #[serde(flatten)]
    pub level: InventoryLevel,
    pub running_low: bool,
    pub needed_at_store: Decimal,
    pub cost: Decimal,
}

impl From<LevelRow> for InventoryResponse {
    fn from(row: LevelRow) -> Self {
        let level = row.level();
        InventoryResponse {
            running_low: level.running_low(),
            needed_at_store: level.needed_at_store(),
            cost: level.restock_cost(row.unit_price),
            level,
        }
    }
}

/// Input for creating an inventory level
#[derive(Debug, Deserialize)]
pub struct CreateInventoryInput {
    pub product_id: Uuid,
    pub quantity: Decimal,
    pub capacity: Decimal,
    pub reorder_level: Decimal,
}

/// Input for updating an inventory level
#[derive(Debug, Deserialize)]
pub struct UpdateInventoryInput {
    pub quantity: Option<Decimal>,
    pub capacity: Option<Decimal>,
    pub reorder_level: Option<Decimal>,
}

const SELECT_LEVEL: &str = r#"
    SELECT il.id, il.product_id, il.quantity, il.capacity, il.reorder_level,
           il.created_at, p.unit_price
    FROM inventory_levels il
    JOIN products p ON p.id = il.product_id
"#;

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all inventory levels with derived fields
    pub async fn list_levels(&self) -> AppResult<Vec<InventoryResponse>> {
        let rows = sqlx::query_as::<_, LevelRow>(&format!("{} ORDER BY il.created_at", SELECT_LEVEL))
            .fetch_all(&self.db)
            .await?;

        Ok(rows.into_iter().map(InventoryResponse::from).collect())
    }

    /// Create an inventory level for a product (one per product)
    pub async fn create_level(&self, input: CreateInventoryInput) -> AppResult<InventoryResponse> {
        for (field, value) in [
            ("quantity", input.quantity),
            ("capacity", input.capacity),
            ("reorder_level", input.reorder_level),
        ] {
            validate_non_negative(value).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
            })?;
        }

        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let already_tracked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_levels WHERE product_id = $1)",
        )
        .bind(input.product_id)
        .fetch_one(&self.db)
        .await?;

        if already_tracked {
            return Err(AppError::DuplicateEntry("inventory for product".to_string()));
        }

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventory_levels (product_id, quantity, capacity, reorder_level)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.capacity)
        .bind(input.reorder_level)
        .fetch_one(&self.db)
        .await?;

        self.get_level(id).await
    }

    /// Get a single inventory level
    pub async fn get_level(&self, id: Uuid) -> AppResult<InventoryResponse> {
        let row = sqlx::query_as::<_, LevelRow>(&format!("{} WHERE il.id = $1", SELECT_LEVEL))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory".to_string()))?;

        Ok(row.into())
    }

    /// Partially update an inventory level
    pub async fn update_level(
        &self,
        id: Uuid,
        input: UpdateInventoryInput,
    ) -> AppResult<InventoryResponse> {
        let existing = self.get_level(id).await?;

        let quantity = input.quantity.unwrap_or(existing.level.quantity);
        let capacity = input.capacity.unwrap_or(existing.level.capacity);
        let reorder_level = input.reorder_level.unwrap_or(existing.level.reorder_level);

        for (field, value) in [
            ("quantity", quantity),
            ("capacity", capacity),
            ("reorder_level", reorder_level),
        ] {
            validate_non_negative(value).map_err(|msg| AppError::Validation {
                field: field.to_string(),
                message: msg.to_string(),
            })?;
        }

        sqlx::query(
            r#"
            UPDATE inventory_levels
            SET quantity = $1, capacity = $2, reorder_level = $3
            WHERE id = $4
            "#,
        )
        .bind(quantity)
        .bind(capacity)
        .bind(reorder_level)
        .bind(id)
        .execute(&self.db)
        .await?;

        self.get_level(id).await
    }

    /// Delete an inventory level
    pub async fn delete_level(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM inventory_levels WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory".to_string()));
        }

        Ok(())
    }
}
