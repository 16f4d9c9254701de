//! Route definitions for the Smart Gear Manufacturing supply chain API

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Protected routes - inventory ledger
        .nest("/inventory", inventory_routes())
        // Protected routes - material request workflow
        .nest("/material_requests", material_request_routes())
        // Protected routes - purchase request routing
        .nest("/purchase_requests", purchase_request_routes())
        // Protected routes - purchase orders and receiving
        .nest("/purchase_orders", purchase_order_routes())
        // Protected routes - scrap reporting
        .nest("/scrap_records", scrap_routes())
        // Protected routes - in-app notifications
        .nest("/notifications", notification_routes())
}

/// Inventory ledger routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::list_inventory_items).post(handlers::upsert_inventory_item),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Material request routes (protected)
fn material_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_material_requests).post(handlers::create_material_request),
        )
        .route(
            "/:request_id/process",
            post(handlers::process_material_request),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase request routes (protected)
fn purchase_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_requests).post(handlers::create_purchase_request),
        )
        .route("/assigned", get(handlers::list_assigned_purchase_requests))
        .route("/all", delete(handlers::delete_all_purchase_requests))
        .route(
            "/:pr_id/status",
            patch(handlers::update_purchase_request_status),
        )
        .route("/:pr_id", delete(handlers::delete_purchase_request))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Purchase order routes (protected)
fn purchase_order_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_purchase_orders).post(handlers::create_purchase_order),
        )
        .route("/:po_id/receive", post(handlers::receive_purchase_order))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Scrap record routes (protected)
fn scrap_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_scrap_records).post(handlers::create_scrap_record),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Notification routes (protected)
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notifications))
        .route("/:notification_id/read", post(handlers::mark_notification_read))
        .route_layer(middleware::from_fn(auth_middleware))
}
