//! HTTP handlers for catalog endpoints (units, categories, vendors, products)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::{Category, Product, Unit, Vendor};

use crate::error::AppResult;
use crate::services::catalog::{
    CatalogService, CreateNamedInput, CreateProductInput, UpdateNamedInput, UpdateProductInput,
};
use crate::services::order::{OrderResponse, OrderService};
use crate::AppState;

// ============================================================================
// Units
// ============================================================================

pub async fn list_units(State(state): State<AppState>) -> AppResult<Json<Vec<Unit>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_units().await?))
}

pub async fn create_unit(
    State(state): State<AppState>,
    Json(input): Json<CreateNamedInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = CatalogService::new(state.db);
    let unit = service.create_unit(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "msg": "unit created", "unit": unit }))))
}

pub async fn get_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let unit = service.get_unit(unit_id).await?;
    Ok(Json(json!({ "unit": unit })))
}

pub async fn update_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
    Json(input): Json<UpdateNamedInput>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let unit = service.update_unit(unit_id, input).await?;
    Ok(Json(json!({ "msg": "unit updated", "unit": unit })))
}

pub async fn delete_unit(
    State(state): State<AppState>,
    Path(unit_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_unit(unit_id).await?;
    Ok(Json(json!({ "msg": "unit deleted" })))
}

// ============================================================================
// Categories
// ============================================================================

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateNamedInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = CatalogService::new(state.db);
    let category = service.create_category(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "category created", "category": category })),
    ))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let category = service.get_category(category_id).await?;
    Ok(Json(json!({ "category": category })))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(input): Json<UpdateNamedInput>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let category = service.update_category(category_id, input).await?;
    Ok(Json(json!({ "msg": "category updated", "category": category })))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_category(category_id).await?;
    Ok(Json(json!({ "msg": "category deleted" })))
}

// ============================================================================
// Vendors
// ============================================================================

pub async fn list_vendors(State(state): State<AppState>) -> AppResult<Json<Vec<Vendor>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_vendors().await?))
}

pub async fn create_vendor(
    State(state): State<AppState>,
    Json(input): Json<CreateNamedInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = CatalogService::new(state.db);
    let vendor = service.create_vendor(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "vendor created", "vendor": vendor })),
    ))
}

pub async fn get_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let vendor = service.get_vendor(vendor_id).await?;
    Ok(Json(json!({ "vendor": vendor })))
}

pub async fn update_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
    Json(input): Json<UpdateNamedInput>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let vendor = service.update_vendor(vendor_id, input).await?;
    Ok(Json(json!({ "msg": "vendor updated", "vendor": vendor })))
}

pub async fn delete_vendor(
    State(state): State<AppState>,
    Path(vendor_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_vendor(vendor_id).await?;
    Ok(Json(json!({ "msg": "vendor deleted" })))
}

// ============================================================================
// Products
// ============================================================================

pub async fn list_products(State(state): State<AppState>) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.db);
    Ok(Json(service.list_products().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = CatalogService::new(state.db);
    let product = service.create_product(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "product created", "product": product })),
    ))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(json!({ "product": product })))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(json!({ "msg": "product updated", "product": product })))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = CatalogService::new(state.db);
    service.delete_product(product_id).await?;
    Ok(Json(json!({ "msg": "product deleted" })))
}

/// Received orders that contained the given product
pub async fn get_product_history(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<OrderResponse>>> {
    let service = OrderService::new(state.db);
    Ok(Json(service.product_history(product_id).await?))
}
