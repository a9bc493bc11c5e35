//! Order service: replenishment order lifecycle and order items
//!
//! The store keeps at most one open order. Opening a new one closes whatever
//! is still open, and the new order is seeded from the inventory snapshot
//! according to the configured replenishment policy.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::models::{
    order_cost, replenishment_candidates, vendor_grouped_summary, InventoryLevel, Order, OrderItem,
    OrderLine, OrderStatus,
};
use shared::types::ReplenishmentPolicy;
use shared::validation::validate_non_negative;

use crate::error::{AppError, AppResult};

/// Order service for the order lifecycle and item CRUD
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Order row as stored
#[derive(Debug, FromRow)]
struct OrderRow {
    id: Uuid,
    date: DateTime<Utc>,
    status: String,
}

/// Order item row joined with the product's unit price
#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    order_id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    unit_price: Decimal,
}

/// Inventory snapshot row read inside the create transaction
#[derive(Debug, FromRow)]
struct SnapshotRow {
    id: Uuid,
    product_id: Uuid,
    quantity: Decimal,
    capacity: Decimal,
    reorder_level: Decimal,
    created_at: DateTime<Utc>,
}

impl From<SnapshotRow> for InventoryLevel {
    fn from(row: SnapshotRow) -> Self {
        InventoryLevel {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            capacity: row.capacity,
            reorder_level: row.reorder_level,
            created_at: row.created_at,
        }
    }
}

/// Notification line rendered after a successful submit transition
#[derive(Debug, FromRow)]
struct NoticeLineRow {
    vendor_id: Uuid,
    vendor_name: String,
    product_name: String,
    unit_name: String,
    quantity: Decimal,
}

/// Order representation returned to clients; `cost` is derived on read.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    #[serde(flatten)]
    pub order: Order,
    pub cost: Decimal,
    pub items: Vec<OrderItem>,
}

/// Input for creating an order (the body may be omitted entirely)
#[derive(Debug, Default, Deserialize)]
pub struct CreateOrderInput {
    pub date: Option<DateTime<Utc>>,
}

/// Input for updating an order
#[derive(Debug, Deserialize)]
pub struct UpdateOrderInput {
    pub date: Option<DateTime<Utc>>,
    /// Parsed against the status enum by hand so an out-of-range value is a
    /// field-level validation error, not a body rejection.
    pub status: Option<String>,
}

/// Input for creating an order item
#[derive(Debug, Deserialize)]
pub struct CreateOrderItemInput {
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: Decimal,
}

/// Input for updating an order item
#[derive(Debug, Deserialize)]
pub struct UpdateOrderItemInput {
    pub order_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub quantity: Option<Decimal>,
}

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// List orders, optionally filtered by status.
    ///
    /// Without a filter only open orders (New/Submitted) are returned.
    pub async fn list_orders(&self, status: Option<OrderStatus>) -> AppResult<Vec<OrderResponse>> {
        let rows = match status {
            Some(status) => {
                sqlx::query_as::<_, OrderRow>(
                    "SELECT id, date, status FROM orders WHERE status = $1 ORDER BY date DESC",
                )
                .bind(status.as_str())
                .fetch_all(&self.db)
                .await?
            }
            None => {
                sqlx::query_as::<_, OrderRow>(
                    "SELECT id, date, status FROM orders WHERE status = $1 OR status = $2 ORDER BY date DESC",
                )
                .bind(OrderStatus::New.as_str())
                .bind(OrderStatus::Submitted.as_str())
                .fetch_all(&self.db)
                .await?
            }
        };

        self.assemble_responses(rows).await
    }

    /// Open a new order, closing any still-open ones first.
    ///
    /// Runs as a single transaction: the close-out UPDATE serializes
    /// concurrent creates on the open rows, so exactly one open order exists
    /// after commit. The new order is seeded with replenishment candidates
    /// computed from the inventory snapshot under the given policy.
    pub async fn create_order(
        &self,
        input: CreateOrderInput,
        policy: ReplenishmentPolicy,
    ) -> AppResult<OrderResponse> {
        let mut tx = self.db.begin().await?;

        let closed = sqlx::query(
            "UPDATE orders SET status = $1 WHERE status = $2 OR status = $3",
        )
        .bind(OrderStatus::Received.as_str())
        .bind(OrderStatus::New.as_str())
        .bind(OrderStatus::Submitted.as_str())
        .execute(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, OrderRow>(
            r#"
            INSERT INTO orders (date, status)
            VALUES (COALESCE($1, NOW()), $2)
            RETURNING id, date, status
            "#,
        )
        .bind(input.date)
        .bind(OrderStatus::New.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let snapshot = sqlx::query_as::<_, SnapshotRow>(
            "SELECT id, product_id, quantity, capacity, reorder_level, created_at FROM inventory_levels",
        )
        .fetch_all(&mut *tx)
        .await?;

        let levels: Vec<InventoryLevel> = snapshot.into_iter().map(InventoryLevel::from).collect();
        let candidates = replenishment_candidates(&levels, policy);

        for candidate in &candidates {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(order.id)
            .bind(candidate.product_id)
            .bind(candidate.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            order_id = %order.id,
            closed_orders = closed.rows_affected(),
            candidates = candidates.len(),
            policy = policy.as_str(),
            "order opened"
        );

        self.get_order(order.id).await
    }

    /// Get a single order with its items and derived cost
    pub async fn get_order(&self, id: Uuid) -> AppResult<OrderResponse> {
        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, date, status FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let mut responses = self.assemble_responses(vec![row]).await?;
        Ok(responses.remove(0))
    }

    /// Partially update an order (date and/or status).
    ///
    /// Status changes are validated against the lifecycle state machine.
    /// A Received transition credits each item's quantity back to its
    /// product's inventory level inside the same transaction. On a Submitted
    /// transition the rendered vendor-grouped notice body is returned so the
    /// caller can emit it; delivery happens after, and independently of, the
    /// committed transition.
    pub async fn update_order(
        &self,
        id: Uuid,
        input: UpdateOrderInput,
    ) -> AppResult<(OrderResponse, Option<String>)> {
        let next_status = input
            .status
            .as_deref()
            .map(parse_status_input)
            .transpose()?;

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(
            "SELECT id, date, status FROM orders WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Order".to_string()))?;

        let current = parse_stored_status(&row.status)?;
        let mut submitted = false;

        if let Some(next) = next_status {
            if next != current {
                if !current.can_transition_to(next) {
                    return Err(AppError::InvalidStateTransition(format!(
                        "order status cannot move from {} to {}",
                        current, next
                    )));
                }

                if next == OrderStatus::Received {
                    // Stock arrival: credit every item back to its level.
                    sqlx::query(
                        r#"
                        UPDATE inventory_levels il
                        SET quantity = il.quantity + oi.quantity
                        FROM order_items oi
                        WHERE oi.order_id = $1 AND il.product_id = oi.product_id
                        "#,
                    )
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                }

                submitted = next == OrderStatus::Submitted;
            }
        }

        let status = next_status.unwrap_or(current);
        let date = input.date.unwrap_or(row.date);

        sqlx::query("UPDATE orders SET status = $1, date = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(date)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let response = self.get_order(id).await?;
        let notice = if submitted {
            Some(self.render_submission_notice(id, response.cost).await?)
        } else {
            None
        };

        Ok((response, notice))
    }

    /// Delete an order and all of its items
    pub async fn delete_order(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM order_items WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Received orders that contained the given product
    pub async fn product_history(&self, product_id: Uuid) -> AppResult<Vec<OrderResponse>> {
        let product_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let rows = sqlx::query_as::<_, OrderRow>(
            r#"
            SELECT o.id, o.date, o.status
            FROM orders o
            WHERE o.status = $1
              AND EXISTS (
                  SELECT 1 FROM order_items oi
                  WHERE oi.order_id = o.id AND oi.product_id = $2
              )
            ORDER BY o.date DESC
            "#,
        )
        .bind(OrderStatus::Received.as_str())
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        self.assemble_responses(rows).await
    }

    // ========================================================================
    // Order items
    // ========================================================================

    /// List all order items
    pub async fn list_items(&self) -> AppResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, p.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            ORDER BY oi.id
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(item_from_row).collect())
    }

    /// Attach an item to an order
    pub async fn create_item(&self, input: CreateOrderItemInput) -> AppResult<OrderItem> {
        validate_non_negative(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_order_exists(input.order_id).await?;
        self.ensure_product_exists(input.product_id).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.order_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .fetch_one(&self.db)
        .await?;

        self.get_item(id).await
    }

    /// Get a single order item
    pub async fn get_item(&self, id: Uuid) -> AppResult<OrderItem> {
        let row = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, p.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Order item".to_string()))?;

        Ok(item_from_row(row))
    }

    /// Partially update an order item
    pub async fn update_item(&self, id: Uuid, input: UpdateOrderItemInput) -> AppResult<OrderItem> {
        let existing = self.get_item(id).await?;

        let order_id = input.order_id.unwrap_or(existing.order_id);
        let product_id = input.product_id.unwrap_or(existing.product_id);
        let quantity = input.quantity.unwrap_or(existing.quantity);

        validate_non_negative(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        self.ensure_order_exists(order_id).await?;
        self.ensure_product_exists(product_id).await?;

        sqlx::query(
            "UPDATE order_items SET order_id = $1, product_id = $2, quantity = $3 WHERE id = $4",
        )
        .bind(order_id)
        .bind(product_id)
        .bind(quantity)
        .bind(id)
        .execute(&self.db)
        .await?;

        self.get_item(id).await
    }

    /// Delete an order item
    pub async fn delete_item(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM order_items WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Order item".to_string()));
        }

        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Fetch items for the given orders and build full responses.
    async fn assemble_responses(&self, rows: Vec<OrderRow>) -> AppResult<Vec<OrderResponse>> {
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let item_rows = sqlx::query_as::<_, ItemRow>(
            r#"
            SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, p.unit_price
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            WHERE oi.order_id = ANY($1)
            ORDER BY oi.id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.db)
        .await?;

        let mut by_order: HashMap<Uuid, Vec<ItemRow>> = HashMap::new();
        for item in item_rows {
            by_order.entry(item.order_id).or_default().push(item);
        }

        rows.into_iter()
            .map(|row| {
                let status = parse_stored_status(&row.status)?;
                let items = by_order.remove(&row.id).unwrap_or_default();
                let cost = order_cost(items.iter().map(|i| (i.quantity, i.unit_price)));
                Ok(OrderResponse {
                    order: Order {
                        id: row.id,
                        date: row.date,
                        status,
                    },
                    cost,
                    items: items.into_iter().map(item_from_row).collect(),
                })
            })
            .collect()
    }

    /// Render the vendor-grouped notice body for a submitted order.
    async fn render_submission_notice(&self, order_id: Uuid, total: Decimal) -> AppResult<String> {
        let rows = sqlx::query_as::<_, NoticeLineRow>(
            r#"
            SELECT v.id AS vendor_id, v.name AS vendor_name,
                   p.name AS product_name, u.name AS unit_name, oi.quantity
            FROM order_items oi
            JOIN products p ON p.id = oi.product_id
            JOIN vendors v ON v.id = p.vendor_id
            JOIN units u ON u.id = p.unit_id
            WHERE oi.order_id = $1
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.db)
        .await?;

        let lines: Vec<OrderLine> = rows
            .into_iter()
            .map(|r| OrderLine {
                vendor_id: r.vendor_id,
                vendor_name: r.vendor_name,
                product_name: r.product_name,
                unit_name: r.unit_name,
                quantity: r.quantity,
            })
            .collect();

        Ok(vendor_grouped_summary(&lines, total))
    }

    async fn ensure_order_exists(&self, id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM orders WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Order".to_string()));
        }

        Ok(())
    }

    async fn ensure_product_exists(&self, id: Uuid) -> AppResult<()> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.db)
                .await?;

        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }
}

fn item_from_row(row: ItemRow) -> OrderItem {
    OrderItem {
        id: row.id,
        order_id: row.order_id,
        product_id: row.product_id,
        quantity: row.quantity,
    }
}

/// Parse a status supplied by a client; unknown values are a field error.
pub fn parse_status_input(value: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(value).map_err(|_| AppError::Validation {
        field: "status".to_string(),
        message: "must be one of New, Submitted, Received, Cancelled".to_string(),
    })
}

fn parse_stored_status(value: &str) -> AppResult<OrderStatus> {
    OrderStatus::from_str(value)
        .map_err(|_| AppError::Internal(format!("unexpected order status in database: {}", value)))
}
