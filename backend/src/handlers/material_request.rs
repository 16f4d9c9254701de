//! Material request handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use shared::models::AllocationResult;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::material_request::{
    CreateMaterialRequestInput, MaterialRequest, MaterialRequestService,
};
use crate::AppState;

/// Material request with its allocation breakdown
#[derive(Serialize)]
pub struct MaterialRequestResponse {
    pub request: MaterialRequest,
    pub allocation: AllocationResult,
}

/// List material requests
pub async fn list_material_requests(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<MaterialRequest>>> {
    let service = MaterialRequestService::new(state.db);
    let requests = service.list_requests(&user).await?;
    Ok(Json(requests))
}

/// Create a material request
pub async fn create_material_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateMaterialRequestInput>,
) -> AppResult<(StatusCode, Json<MaterialRequestResponse>)> {
    let service = MaterialRequestService::new(state.db);
    let (request, allocation) = service.create_request(&user, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MaterialRequestResponse {
            request,
            allocation,
        }),
    ))
}

/// Approve a material request, deducting allocated stock
pub async fn process_material_request(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<MaterialRequestResponse>> {
    let service = MaterialRequestService::new(state.db);
    let (request, allocation) = service.process_request(&user, request_id).await?;
    Ok(Json(MaterialRequestResponse {
        request,
        allocation,
    }))
}
