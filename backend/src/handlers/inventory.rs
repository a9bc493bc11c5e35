//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::inventory::{
    CreateInventoryInput, InventoryResponse, InventoryService, UpdateInventoryInput,
};
use crate::AppState;

/// List all inventory levels with derived fields
pub async fn list_inventory(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InventoryResponse>>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.list_levels().await?))
}

/// Create an inventory level for a product
pub async fn create_inventory(
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = InventoryService::new(state.db);
    let inventory = service.create_level(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "inventory created", "inventory": inventory })),
    ))
}

/// Get a single inventory level
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InventoryService::new(state.db);
    let inventory = service.get_level(inventory_id).await?;
    Ok(Json(json!({ "inventory": inventory })))
}

/// Partially update an inventory level
pub async fn update_inventory(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
    Json(input): Json<UpdateInventoryInput>,
) -> AppResult<Json<Value>> {
    let service = InventoryService::new(state.db);
    let inventory = service.update_level(inventory_id, input).await?;
    Ok(Json(json!({ "msg": "inventory updated", "inventory": inventory })))
}

/// Delete an inventory level
pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InventoryService::new(state.db);
    service.delete_level(inventory_id).await?;
    Ok(Json(json!({ "msg": "inventory deleted" })))
}
