//! Scrap record handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::scrap::{CreateScrapInput, ScrapRecord, ScrapService};
use crate::AppState;

/// List scrap records
pub async fn list_scrap_records(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Vec<ScrapRecord>>> {
    let service = ScrapService::new(state.db);
    let records = service.list(&user).await?;
    Ok(Json(records))
}

/// Report scrapped material
pub async fn create_scrap_record(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<CreateScrapInput>,
) -> AppResult<(StatusCode, Json<ScrapRecord>)> {
    let service = ScrapService::new(state.db);
    let record = service.create(&user, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
