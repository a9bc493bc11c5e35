//! HTTP handlers for order and order item endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::OrderItem;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::notification::Notification;
use crate::services::order::{
    parse_status_input, CreateOrderInput, CreateOrderItemInput, OrderResponse, OrderService,
    UpdateOrderInput, UpdateOrderItemInput,
};
use crate::AppState;

/// Query parameters for listing orders
#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

/// List orders; defaults to open orders when no status filter is given
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let status = query.status.as_deref().map(parse_status_input).transpose()?;
    let service = OrderService::new(state.db);
    Ok(Json(service.list_orders(status).await?))
}

/// Open a new order, closing any currently open ones
pub async fn create_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    body: Option<Json<CreateOrderInput>>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    let service = OrderService::new(state.db.clone());
    let order = service
        .create_order(input, state.config.replenishment.policy)
        .await?;

    tracing::info!(user_id = %current_user.0.user_id, order_id = %order.order.id, "order created");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "order created", "order": order })),
    ))
}

/// Get a single order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db);
    let order = service.get_order(order_id).await?;
    Ok(Json(json!({ "order": order })))
}

/// Partially update an order; a Submitted transition emits the vendor notice
pub async fn update_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateOrderInput>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db.clone());
    let (order, notice) = service.update_order(order_id, input).await?;

    if let Some(body) = notice {
        tracing::info!(user_id = %current_user.0.user_id, order_id = %order.order.id, "order submitted");
        match state.config.notification.to_address.clone() {
            Some(recipient) => state.notify(Notification {
                recipient,
                subject: format!("Order {} submitted", order.order.id),
                body,
            }),
            None => {
                tracing::warn!(order_id = %order.order.id, "no notification recipient configured; order notice dropped");
            }
        }
    }

    Ok(Json(json!({ "msg": "order updated", "order": order })))
}

/// Delete an order and its items
pub async fn delete_order(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db);
    service.delete_order(order_id).await?;
    tracing::info!(user_id = %current_user.0.user_id, %order_id, "order deleted");
    Ok(Json(json!({ "msg": "order deleted" })))
}

// ============================================================================
// Order items
// ============================================================================

/// List all order items
pub async fn list_order_items(State(state): State<AppState>) -> AppResult<Json<Vec<OrderItem>>> {
    let service = OrderService::new(state.db);
    Ok(Json(service.list_items().await?))
}

/// Attach an item to an order
pub async fn create_order_item(
    State(state): State<AppState>,
    Json(input): Json<CreateOrderItemInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = OrderService::new(state.db);
    let order_item = service.create_item(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "order_item created", "order_item": order_item })),
    ))
}

/// Get a single order item
pub async fn get_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db);
    let order_item = service.get_item(order_item_id).await?;
    Ok(Json(json!({ "order_item": order_item })))
}

/// Partially update an order item
pub async fn update_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<Uuid>,
    Json(input): Json<UpdateOrderItemInput>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db);
    let order_item = service.update_item(order_item_id, input).await?;
    Ok(Json(json!({ "msg": "order_item updated", "order_item": order_item })))
}

/// Delete an order item
pub async fn delete_order_item(
    State(state): State<AppState>,
    Path(order_item_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = OrderService::new(state.db);
    service.delete_item(order_item_id).await?;
    Ok(Json(json!({ "msg": "order_item deleted" })))
}
