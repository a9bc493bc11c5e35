//! Route definitions for the Stockroom API

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
///
/// Takes the application state so each protected group can run the auth
/// middleware with access to the pool (token blocklist lookups).
pub fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public; the token-bearing ones validate inline)
        .nest("/auth", auth_routes())
        // Protected entity routes
        .nest("/users", user_routes(state.clone()))
        .nest("/unit", unit_routes(state.clone()))
        .nest("/category", category_routes(state.clone()))
        .nest("/vendor", vendor_routes(state.clone()))
        .nest("/product", product_routes(state.clone()))
        .nest("/inventory", inventory_routes(state.clone()))
        .nest("/order", order_routes(state.clone()))
        .nest("/orderitem", order_item_routes(state.clone()))
        .nest("/customer", customer_routes(state.clone()))
        .nest("/invoice", invoice_routes(state.clone()))
        .nest("/invoiceitem", invoice_item_routes(state))
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
        .route("/revoke_access", delete(handlers::revoke_access_token))
        .route("/revoke_refresh", delete(handlers::revoke_refresh_token))
}

/// User management routes (protected)
fn user_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_users).post(handlers::create_user))
        .route(
            "/:user_id",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Unit routes (protected)
fn unit_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_units).post(handlers::create_unit))
        .route(
            "/:unit_id",
            get(handlers::get_unit)
                .put(handlers::update_unit)
                .delete(handlers::delete_unit),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Category routes (protected)
fn category_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories).post(handlers::create_category))
        .route(
            "/:category_id",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Vendor routes (protected)
fn vendor_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_vendors).post(handlers::create_vendor))
        .route(
            "/:vendor_id",
            get(handlers::get_vendor)
                .put(handlers::update_vendor)
                .delete(handlers::delete_vendor),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Product routes (protected)
fn product_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products).post(handlers::create_product))
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/history", get(handlers::get_product_history))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Inventory routes (protected)
fn inventory_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_inventory).post(handlers::create_inventory))
        .route(
            "/:inventory_id",
            get(handlers::get_inventory)
                .put(handlers::update_inventory)
                .delete(handlers::delete_inventory),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Order routes (protected)
fn order_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Order item routes (protected)
fn order_item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_order_items).post(handlers::create_order_item))
        .route(
            "/:order_item_id",
            get(handlers::get_order_item)
                .put(handlers::update_order_item)
                .delete(handlers::delete_order_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Customer routes (protected)
fn customer_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_customers).post(handlers::create_customer))
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice routes (protected)
fn invoice_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoices).post(handlers::create_invoice))
        .route(
            "/:invoice_id",
            get(handlers::get_invoice)
                .put(handlers::update_invoice)
                .delete(handlers::delete_invoice),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Invoice item routes (protected)
fn invoice_item_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_invoice_items).post(handlers::create_invoice_item))
        .route(
            "/:invoice_item_id",
            get(handlers::get_invoice_item)
                .put(handlers::update_invoice_item)
                .delete(handlers::delete_invoice_item),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
