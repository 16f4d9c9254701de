//! Material request engine
//!
//! Production raises a request for materials; the engine plans an
//! allocation against current stock at creation time, routes any
//! shortfall to procurement as a purchase request, and deducts stock
//! when an inventory or SCM head approves. Planning never reserves
//! stock, so the approval pass re-reads quantities under row locks and
//! caps each deduction at what is actually on hand.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::access;
use shared::models::{reserve_plan, AllocationResult, LineStatus, MaterialRequestStatus};
use shared::types::{RelatedType, Role};
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::inventory::InventoryService;
use crate::services::notification::NotificationService;
use crate::services::purchase_request::PurchaseRequestService;

/// Material request service for the allocation workflow
#[derive(Clone)]
pub struct MaterialRequestService {
    db: PgPool,
}

/// Material request header with its line items
#[derive(Debug, Clone, Serialize)]
pub struct MaterialRequest {
    pub id: Uuid,
    pub department: String,
    pub requested_by: Uuid,
    pub status: String,
    pub processed_by: Option<Uuid>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub items: Vec<MaterialRequestItem>,
}

/// One line of a material request
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct MaterialRequestItem {
    pub id: Uuid,
    pub request_id: Uuid,
    pub line_no: i32,
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: Decimal,
    pub quantity_allocated: Decimal,
    pub quantity_to_order: Decimal,
    pub status: String,
}

#[derive(Debug, Clone, FromRow)]
struct MaterialRequestRow {
    id: Uuid,
    department: String,
    requested_by: Uuid,
    status: String,
    processed_by: Option<Uuid>,
    processed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl MaterialRequestRow {
    fn into_request(self, items: Vec<MaterialRequestItem>) -> MaterialRequest {
        MaterialRequest {
            id: self.id,
            department: self.department,
            requested_by: self.requested_by,
            status: self.status,
            processed_by: self.processed_by,
            processed_at: self.processed_at,
            created_at: self.created_at,
            items,
        }
    }
}

/// Input for creating a material request
#[derive(Debug, Deserialize)]
pub struct CreateMaterialRequestInput {
    pub department: String,
    pub items: Vec<RequestLineInput>,
}

/// One requested line; callers may reference a catalogue item by id or
/// ask for a material by name only
#[derive(Debug, Deserialize)]
pub struct RequestLineInput {
    pub item_id: Option<Uuid>,
    pub item_name: Option<String>,
    pub quantity: Decimal,
}

impl MaterialRequestService {
    /// Create a new MaterialRequestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a material request, plan its allocation against current
    /// stock, and spawn a purchase request for any shortfall. Stock is
    /// not deducted here; that happens at approval.
    pub async fn create_request(
        &self,
        actor: &AuthUser,
        input: CreateMaterialRequestInput,
    ) -> AppResult<(MaterialRequest, AllocationResult)> {
        if !access::can_create_material_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        validation::validate_department(&input.department).map_err(|msg| AppError::Validation {
            field: "department".to_string(),
            message: msg.to_string(),
        })?;

        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one line item is required".to_string(),
            });
        }
        // Reject the whole request before touching the database
        for line in &input.items {
            validation::validate_positive_quantity(line.quantity).map_err(|msg| {
                AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                }
            })?;
        }

        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, MaterialRequestRow>(
            r#"
            INSERT INTO material_requests (department, requested_by, status)
            VALUES ($1, $2, $3)
            RETURNING id, department, requested_by, status, processed_by, processed_at, created_at
            "#,
        )
        .bind(&input.department)
        .bind(actor.user_id)
        .bind(MaterialRequestStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let inventory = InventoryService::new(self.db.clone());
        let mut result = AllocationResult::default();
        let mut items = Vec::with_capacity(input.items.len());

        for (idx, line) in input.items.iter().enumerate() {
            // Resolve the catalogue item by id, then by name
            let resolved: Option<(Uuid, String)> = if let Some(item_id) = line.item_id {
                sqlx::query_as("SELECT id, name FROM inventory_items WHERE id = $1")
                    .bind(item_id)
                    .fetch_optional(&mut *tx)
                    .await?
            } else if let Some(name) = &line.item_name {
                sqlx::query_as("SELECT id, name FROM inventory_items WHERE name = $1")
                    .bind(name)
                    .fetch_optional(&mut *tx)
                    .await?
            } else {
                None
            };

            let (item_id, item_name, on_hand) = match resolved {
                Some((id, name)) => {
                    let on_hand = inventory.get_quantity(id).await?;
                    (Some(id), name, on_hand)
                }
                None => {
                    // Unknown material: the full quantity goes on order
                    let name = line.item_name.clone().ok_or_else(|| AppError::Validation {
                        field: "item_name".to_string(),
                        message: "Item name is required when item_id does not match".to_string(),
                    })?;
                    (None, name, Decimal::ZERO)
                }
            };

            let split = reserve_plan(on_hand, line.quantity);
            result.push_available(item_id, &item_name, split.allocated);
            result.push_to_order(item_id, &item_name, split.to_order);

            let item = sqlx::query_as::<_, MaterialRequestItem>(
                r#"
                INSERT INTO material_request_items
                    (request_id, line_no, item_id, item_name, quantity,
                     quantity_allocated, quantity_to_order, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id, request_id, line_no, item_id, item_name, quantity,
                          quantity_allocated, quantity_to_order, status
                "#,
            )
            .bind(header.id)
            .bind(idx as i32 + 1)
            .bind(item_id)
            .bind(&item_name)
            .bind(line.quantity)
            .bind(split.allocated)
            .bind(split.to_order)
            .bind(LineStatus::Pending.as_str())
            .fetch_one(&mut *tx)
            .await?;

            items.push(item);
        }

        if result.has_shortfall() {
            PurchaseRequestService::spawn_for_material_request(
                &mut tx,
                header.id,
                actor.user_id,
                &result.to_order,
            )
            .await?;
        }

        let shortfall = result.has_shortfall();
        let request_id = header.id;
        tx.commit().await?;

        // Best-effort dispatch; the request is already committed
        let notifier = NotificationService::new(self.db.clone());
        if let Err(e) = notifier
            .notify_role(
                Role::InventoryHead,
                &format!("New material request {} needs review", request_id),
                RelatedType::MaterialRequest,
                Some(request_id),
            )
            .await
        {
            tracing::warn!(request_id = %request_id, error = %e, "failed to notify inventory heads");
        }
        if shortfall {
            if let Err(e) = notifier
                .notify_role(
                    Role::ScmPlanner,
                    &format!("Purchase request created for material request {}", request_id),
                    RelatedType::PurchaseRequest,
                    Some(request_id),
                )
                .await
            {
                tracing::warn!(request_id = %request_id, error = %e, "failed to notify SCM planners");
            }
        }

        Ok((header.into_request(items), result))
    }

    /// Approve a pending request: deduct the planned allocations (capped
    /// at what is still on hand) and mark the rest to order. Re-approval
    /// of an already-processed request is a no-op that reports the
    /// recorded allocation.
    pub async fn process_request(
        &self,
        actor: &AuthUser,
        request_id: Uuid,
    ) -> AppResult<(MaterialRequest, AllocationResult)> {
        if !access::can_process_material_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let mut tx = self.db.begin().await?;

        let header = sqlx::query_as::<_, MaterialRequestRow>(
            r#"
            SELECT id, department, requested_by, status, processed_by, processed_at, created_at
            FROM material_requests
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Material request".to_string()))?;

        let mut items = sqlx::query_as::<_, MaterialRequestItem>(
            r#"
            SELECT id, request_id, line_no, item_id, item_name, quantity,
                   quantity_allocated, quantity_to_order, status
            FROM material_request_items
            WHERE request_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(request_id)
        .fetch_all(&mut *tx)
        .await?;

        if header.status != MaterialRequestStatus::Pending.as_str() {
            // Already processed; report what was recorded without
            // moving stock again
            tx.rollback().await?;
            let mut result = AllocationResult::default();
            for item in &items {
                result.push_available(item.item_id, &item.item_name, item.quantity_allocated);
                result.push_to_order(item.item_id, &item.item_name, item.quantity_to_order);
            }
            return Ok((header.into_request(items), result));
        }

        let inventory = InventoryService::new(self.db.clone());
        let mut result = AllocationResult::default();

        for item in &mut items {
            let mut line_status = LineStatus::Pending;

            if item.quantity_allocated > Decimal::ZERO {
                if let Some(item_id) = item.item_id {
                    let taken = inventory
                        .deduct_up_to(&mut tx, item_id, item.quantity_allocated)
                        .await?;
                    result.push_available(Some(item_id), &item.item_name, taken);
                    item.quantity_allocated = taken;
                    line_status = LineStatus::Allocated;
                } else {
                    item.quantity_allocated = Decimal::ZERO;
                }
            }
            if item.quantity_to_order > Decimal::ZERO {
                result.push_to_order(item.item_id, &item.item_name, item.quantity_to_order);
                line_status = LineStatus::ToOrder;
            }

            item.status = line_status.as_str().to_string();
            sqlx::query(
                "UPDATE material_request_items SET quantity_allocated = $2, status = $3 WHERE id = $1",
            )
            .bind(item.id)
            .bind(item.quantity_allocated)
            .bind(&item.status)
            .execute(&mut *tx)
            .await?;
        }

        let header = sqlx::query_as::<_, MaterialRequestRow>(
            r#"
            UPDATE material_requests
            SET status = $2, processed_by = $3, processed_at = NOW()
            WHERE id = $1
            RETURNING id, department, requested_by, status, processed_by, processed_at, created_at
            "#,
        )
        .bind(request_id)
        .bind(MaterialRequestStatus::InventoryApproved.as_str())
        .bind(actor.user_id)
        .fetch_one(&mut *tx)
        .await?;

        // An SCM head approving directly may be looking at a request
        // whose auto-spawned purchase request was never created (e.g.
        // the shortfall appeared only now because stock moved). Create
        // one if none exists yet.
        if actor.role == Role::ScmHead && result.has_shortfall() {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM purchase_requests WHERE material_request_id = $1)",
            )
            .bind(request_id)
            .fetch_one(&mut *tx)
            .await?;

            if !exists {
                PurchaseRequestService::spawn_for_material_request(
                    &mut tx,
                    request_id,
                    actor.user_id,
                    &result.to_order,
                )
                .await?;
            }
        }

        tx.commit().await?;

        let notifier = NotificationService::new(self.db.clone());
        let message = format!(
            "Material request {} approved: {} item(s) ready to dispatch, {} item(s) on order",
            request_id,
            result.available.len(),
            result.to_order.len(),
        );
        if let Err(e) = notifier
            .notify(
                header.requested_by,
                &message,
                RelatedType::MaterialRequest,
                Some(request_id),
            )
            .await
        {
            tracing::warn!(request_id = %request_id, error = %e, "failed to notify requester");
        }

        Ok((header.into_request(items), result))
    }

    /// List all material requests with their lines, newest first
    pub async fn list_requests(&self, actor: &AuthUser) -> AppResult<Vec<MaterialRequest>> {
        if !access::can_view_material_requests(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let headers = sqlx::query_as::<_, MaterialRequestRow>(
            r#"
            SELECT id, department, requested_by, status, processed_by, processed_at, created_at
            FROM material_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, MaterialRequestItem>(
            r#"
            SELECT id, request_id, line_no, item_id, item_name, quantity,
                   quantity_allocated, quantity_to_order, status
            FROM material_request_items
            ORDER BY request_id, line_no
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_request: HashMap<Uuid, Vec<MaterialRequestItem>> = HashMap::new();
        for item in items {
            by_request.entry(item.request_id).or_default().push(item);
        }

        Ok(headers
            .into_iter()
            .map(|h| {
                let items = by_request.remove(&h.id).unwrap_or_default();
                h.into_request(items)
            })
            .collect())
    }
}
