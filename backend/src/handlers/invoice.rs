//! HTTP handlers for customer, invoice, and invoice item endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared::models::Customer;

use crate::error::AppResult;
use crate::services::invoice::{
    CreateCustomerInput, CreateInvoiceInput, CreateInvoiceItemInput, InvoiceItemResponse,
    InvoiceResponse, InvoicingService, UpdateCustomerInput, UpdateInvoiceInput,
    UpdateInvoiceItemInput,
};
use crate::AppState;

// ============================================================================
// Customers
// ============================================================================

pub async fn list_customers(State(state): State<AppState>) -> AppResult<Json<Vec<Customer>>> {
    let service = InvoicingService::new(state.db);
    Ok(Json(service.list_customers().await?))
}

pub async fn create_customer(
    State(state): State<AppState>,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = InvoicingService::new(state.db);
    let customer = service.create_customer(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "customer created", "customer": customer })),
    ))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let customer = service.get_customer(customer_id).await?;
    Ok(Json(json!({ "customer": customer })))
}

pub async fn update_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
    Json(input): Json<UpdateCustomerInput>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let customer = service.update_customer(customer_id, input).await?;
    Ok(Json(json!({ "msg": "customer updated", "customer": customer })))
}

pub async fn delete_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    service.delete_customer(customer_id).await?;
    Ok(Json(json!({ "msg": "customer deleted" })))
}

// ============================================================================
// Invoices
// ============================================================================

pub async fn list_invoices(State(state): State<AppState>) -> AppResult<Json<Vec<InvoiceResponse>>> {
    let service = InvoicingService::new(state.db);
    Ok(Json(service.list_invoices().await?))
}

pub async fn create_invoice(
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = InvoicingService::new(state.db);
    let invoice = service.create_invoice(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "invoice created", "invoice": invoice })),
    ))
}

pub async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let invoice = service.get_invoice(invoice_id).await?;
    Ok(Json(json!({ "invoice": invoice })))
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(input): Json<UpdateInvoiceInput>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let invoice = service.update_invoice(invoice_id, input).await?;
    Ok(Json(json!({ "msg": "invoice updated", "invoice": invoice })))
}

pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    service.delete_invoice(invoice_id).await?;
    Ok(Json(json!({ "msg": "invoice deleted" })))
}

// ============================================================================
// Invoice items
// ============================================================================

pub async fn list_invoice_items(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<InvoiceItemResponse>>> {
    let service = InvoicingService::new(state.db);
    Ok(Json(service.list_items().await?))
}

pub async fn create_invoice_item(
    State(state): State<AppState>,
    Json(input): Json<CreateInvoiceItemInput>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = InvoicingService::new(state.db);
    let invoice_item = service.create_item(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "invoice_item created", "invoice_item": invoice_item })),
    ))
}

pub async fn get_invoice_item(
    State(state): State<AppState>,
    Path(invoice_item_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let invoice_item = service.get_item(invoice_item_id).await?;
    Ok(Json(json!({ "invoice_item": invoice_item })))
}

pub async fn update_invoice_item(
    State(state): State<AppState>,
    Path(invoice_item_id): Path<Uuid>,
    Json(input): Json<UpdateInvoiceItemInput>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    let invoice_item = service.update_item(invoice_item_id, input).await?;
    Ok(Json(json!({ "msg": "invoice_item updated", "invoice_item": invoice_item })))
}

pub async fn delete_invoice_item(
    State(state): State<AppState>,
    Path(invoice_item_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let service = InvoicingService::new(state.db);
    service.delete_item(invoice_item_id).await?;
    Ok(Json(json!({ "msg": "invoice_item deleted" })))
}
