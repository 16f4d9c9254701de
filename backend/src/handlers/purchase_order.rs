//! Purchase order handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase_order::{
    CreatePurchaseOrderInput, PurchaseOrder, PurchaseOrderService,
};
use crate::AppState;

/// List all purchase orders
pub async fn list_purchase_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<PurchaseOrder>>> {
    let service = PurchaseOrderService::new(state.db);
    let orders = service.list(&user).await?;
    Ok(Json(orders))
}

/// Register a purchase order
pub async fn create_purchase_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreatePurchaseOrderInput>,
) -> AppResult<(StatusCode, Json<PurchaseOrder>)> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// Receive a purchase order, crediting stock and closing the loop
pub async fn receive_purchase_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(po_id): Path<Uuid>,
) -> AppResult<Json<PurchaseOrder>> {
    let service = PurchaseOrderService::new(state.db);
    let order = service.receive(&user, po_id).await?;
    Ok(Json(order))
}
