//! Inventory handlers

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{InventoryItem, InventoryService, UpsertItemInput};
use crate::AppState;

/// List all inventory items
pub async fn list_inventory_items(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
) -> AppResult<Json<Vec<InventoryItem>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items().await?;
    Ok(Json(items))
}

/// Create or update an inventory item
pub async fn upsert_inventory_item(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(input): Json<UpsertItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let service = InventoryService::new(state.db);
    let (item, created) = service.upsert_item(&user, input).await?;
    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(item)))
}
