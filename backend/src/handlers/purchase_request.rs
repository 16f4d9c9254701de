//! Purchase request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::purchase_request::{
    CreatePurchaseRequestInput, PurchaseRequest, PurchaseRequestService,
    UpdatePurchaseRequestInput,
};
use crate::AppState;

/// List all purchase requests
pub async fn list_purchase_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<PurchaseRequest>>> {
    let service = PurchaseRequestService::new(state.db);
    let requests = service.list(&user).await?;
    Ok(Json(requests))
}

/// List purchase requests assigned to the calling purchaser
pub async fn list_assigned_purchase_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<PurchaseRequest>>> {
    let service = PurchaseRequestService::new(state.db);
    let requests = service.list_assigned(&user).await?;
    Ok(Json(requests))
}

/// Create a purchase request
pub async fn create_purchase_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreatePurchaseRequestInput>,
) -> AppResult<(StatusCode, Json<PurchaseRequest>)> {
    let service = PurchaseRequestService::new(state.db);
    let request = service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// Update a purchase request's status or purchaser assignment
pub async fn update_purchase_request_status(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(pr_id): Path<Uuid>,
    Json(input): Json<UpdatePurchaseRequestInput>,
) -> AppResult<Json<PurchaseRequest>> {
    let service = PurchaseRequestService::new(state.db);
    let request = service.update_status(&user, pr_id, input).await?;
    Ok(Json(request))
}

/// Delete a purchase request
pub async fn delete_purchase_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(pr_id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let service = PurchaseRequestService::new(state.db);
    service.delete(&user, pr_id).await?;
    Ok(Json(json!({ "deleted": 1 })))
}

/// Delete all purchase requests
pub async fn delete_all_purchase_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<serde_json::Value>> {
    let service = PurchaseRequestService::new(state.db);
    let deleted = service.delete_all(&user).await?;
    Ok(Json(json!({ "deleted": deleted })))
}
