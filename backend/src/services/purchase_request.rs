//! Purchase request router
//!
//! Purchase requests carry allocation shortfalls (and ad-hoc buys) from
//! planning to a purchaser. Planners and the SCM head assign a
//! purchaser and advance the status; the assigned purchaser's only move
//! is marking the purchase order uploaded. Assignment closes once a PO
//! is uploaded or the request is approved.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::access;
use shared::models::{AllocationLine, PurchaseRequestStatus};
use shared::types::Role;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;

/// Purchase request service
#[derive(Clone)]
pub struct PurchaseRequestService {
    db: PgPool,
}

/// Purchase request with its line items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseRequest {
    pub id: Uuid,
    pub material_request_id: Option<Uuid>,
    pub created_by: Uuid,
    pub purchaser_email: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub items: Vec<PurchaseRequestItem>,
}

/// One line of a purchase request
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseRequestItem {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub line_no: i32,
    pub item_name: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, FromRow)]
struct PurchaseRequestRow {
    id: Uuid,
    material_request_id: Option<Uuid>,
    created_by: Uuid,
    purchaser_email: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl PurchaseRequestRow {
    fn into_request(self, items: Vec<PurchaseRequestItem>) -> PurchaseRequest {
        PurchaseRequest {
            id: self.id,
            material_request_id: self.material_request_id,
            created_by: self.created_by,
            purchaser_email: self.purchaser_email,
            status: self.status,
            created_at: self.created_at,
            items,
        }
    }
}

/// Input for creating a purchase request by hand
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseRequestInput {
    pub material_request_id: Option<Uuid>,
    pub items: Vec<PurchaseLineInput>,
    pub status: Option<String>,
    pub purchaser_email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseLineInput {
    pub item_name: String,
    pub quantity: Decimal,
}

/// Input for the status/assignment update
#[derive(Debug, Deserialize)]
pub struct UpdatePurchaseRequestInput {
    pub status: Option<String>,
    pub purchaser_email: Option<String>,
}

impl PurchaseRequestService {
    /// Create a new PurchaseRequestService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Spawn a purchase request for a material request's shortfall,
    /// inside the caller's transaction so the request and its routing
    /// commit or roll back together. Auto-spawned requests start at
    /// `pending` so planners pick them up without a manual submit.
    pub async fn spawn_for_material_request(
        tx: &mut Transaction<'_, Postgres>,
        material_request_id: Uuid,
        created_by: Uuid,
        shortfall: &[AllocationLine],
    ) -> AppResult<Uuid> {
        let pr_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchase_requests (material_request_id, created_by, status)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(material_request_id)
        .bind(created_by)
        .bind(PurchaseRequestStatus::Pending.as_str())
        .fetch_one(&mut **tx)
        .await?;

        for (idx, line) in shortfall.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO purchase_request_items (purchase_request_id, line_no, item_name, quantity)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(pr_id)
            .bind(idx as i32 + 1)
            .bind(&line.item_name)
            .bind(line.quantity)
            .execute(&mut **tx)
            .await?;
        }

        Ok(pr_id)
    }

    /// List all purchase requests, newest first
    pub async fn list(&self, actor: &AuthUser) -> AppResult<Vec<PurchaseRequest>> {
        if !access::can_view_purchase_requests(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let rows = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            SELECT id, material_request_id, created_by, purchaser_email, status, created_at
            FROM purchase_requests
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        self.attach_items(rows).await
    }

    /// List the purchase requests assigned to the calling purchaser
    pub async fn list_assigned(&self, actor: &AuthUser) -> AppResult<Vec<PurchaseRequest>> {
        if !access::can_view_assigned_purchase_requests(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let rows = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            SELECT id, material_request_id, created_by, purchaser_email, status, created_at
            FROM purchase_requests
            WHERE purchaser_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(&actor.email)
        .fetch_all(&self.db)
        .await?;

        self.attach_items(rows).await
    }

    /// Create a purchase request by hand (ad-hoc procurement). Manual
    /// requests start as drafts; a planner may pre-set the status and
    /// purchaser in one call.
    pub async fn create(
        &self,
        actor: &AuthUser,
        input: CreatePurchaseRequestInput,
    ) -> AppResult<PurchaseRequest> {
        if !access::can_create_purchase_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        if input.items.is_empty() {
            return Err(AppError::Validation {
                field: "items".to_string(),
                message: "At least one line item is required".to_string(),
            });
        }
        for line in &input.items {
            validation::validate_item_name(&line.item_name).map_err(|msg| {
                AppError::Validation {
                    field: "item_name".to_string(),
                    message: msg.to_string(),
                }
            })?;
            validation::validate_positive_quantity(line.quantity).map_err(|msg| {
                AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                }
            })?;
        }

        // Only planners may pre-set the status on creation
        let status = match (&input.status, actor.role) {
            (Some(s), Role::ScmPlanner) => {
                s.parse::<PurchaseRequestStatus>()
                    .map_err(|e| AppError::Validation {
                        field: "status".to_string(),
                        message: e.to_string(),
                    })?
            }
            _ => PurchaseRequestStatus::Draft,
        };

        if let Some(email) = &input.purchaser_email {
            validation::validate_email(email).map_err(|msg| AppError::Validation {
                field: "purchaser_email".to_string(),
                message: msg.to_string(),
            })?;
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            INSERT INTO purchase_requests (material_request_id, created_by, purchaser_email, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, material_request_id, created_by, purchaser_email, status, created_at
            "#,
        )
        .bind(input.material_request_id)
        .bind(actor.user_id)
        .bind(&input.purchaser_email)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for (idx, line) in input.items.iter().enumerate() {
            let item = sqlx::query_as::<_, PurchaseRequestItem>(
                r#"
                INSERT INTO purchase_request_items (purchase_request_id, line_no, item_name, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING id, purchase_request_id, line_no, item_name, quantity
                "#,
            )
            .bind(row.id)
            .bind(idx as i32 + 1)
            .bind(&line.item_name)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        tx.commit().await?;

        Ok(row.into_request(items))
    }

    /// Update a purchase request's status or purchaser assignment.
    ///
    /// Planners and the SCM head assign and advance; the assigned
    /// purchaser may only mark the PO uploaded. Assignment is refused
    /// once the request has left the assignable window.
    pub async fn update_status(
        &self,
        actor: &AuthUser,
        pr_id: Uuid,
        input: UpdatePurchaseRequestInput,
    ) -> AppResult<PurchaseRequest> {
        if !access::can_update_purchase_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let row = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            SELECT id, material_request_id, created_by, purchaser_email, status, created_at
            FROM purchase_requests
            WHERE id = $1
            "#,
        )
        .bind(pr_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase request".to_string()))?;

        let current: PurchaseRequestStatus =
            row.status
                .parse()
                .map_err(|_| AppError::Internal(format!(
                    "purchase request {} has unrecognized status {}",
                    row.id, row.status
                )))?;

        let new_status = input
            .status
            .as_deref()
            .map(|s| {
                s.parse::<PurchaseRequestStatus>()
                    .map_err(|e| AppError::Validation {
                        field: "status".to_string(),
                        message: e.to_string(),
                    })
            })
            .transpose()?;

        if actor.role == Role::ScmPurchaser {
            // Purchasers report PO upload on their own assignments,
            // nothing else
            if row.purchaser_email.as_deref() != Some(actor.email.as_str()) {
                return Err(AppError::InsufficientPermissions);
            }
            if input.purchaser_email.is_some()
                || new_status != Some(PurchaseRequestStatus::PoUploaded)
            {
                return Err(AppError::InsufficientPermissions);
            }
            if current == PurchaseRequestStatus::Approved {
                return Err(AppError::InvalidStateTransition(
                    "Purchase request is already approved".to_string(),
                ));
            }
        } else {
            if !current.can_assign() {
                return Err(AppError::InvalidStateTransition(format!(
                    "Purchase request in status {} can no longer be assigned",
                    current.as_str()
                )));
            }
            if let Some(email) = &input.purchaser_email {
                validation::validate_email(email).map_err(|msg| AppError::Validation {
                    field: "purchaser_email".to_string(),
                    message: msg.to_string(),
                })?;
            }
        }

        let status = new_status.unwrap_or(current);
        let purchaser_email = input.purchaser_email.or(row.purchaser_email);

        let updated = sqlx::query_as::<_, PurchaseRequestRow>(
            r#"
            UPDATE purchase_requests
            SET status = $2, purchaser_email = $3
            WHERE id = $1
            RETURNING id, material_request_id, created_by, purchaser_email, status, created_at
            "#,
        )
        .bind(pr_id)
        .bind(status.as_str())
        .bind(&purchaser_email)
        .fetch_one(&self.db)
        .await?;

        let items = self.items_for(pr_id).await?;
        Ok(updated.into_request(items))
    }

    /// Delete one purchase request (line items cascade)
    pub async fn delete(&self, actor: &AuthUser, pr_id: Uuid) -> AppResult<()> {
        if !access::can_delete_purchase_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let result = sqlx::query("DELETE FROM purchase_requests WHERE id = $1")
            .bind(pr_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Purchase request".to_string()));
        }
        Ok(())
    }

    /// Delete every purchase request. Returns the number removed.
    pub async fn delete_all(&self, actor: &AuthUser) -> AppResult<u64> {
        if !access::can_delete_purchase_request(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let result = sqlx::query("DELETE FROM purchase_requests")
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected())
    }

    async fn items_for(&self, pr_id: Uuid) -> AppResult<Vec<PurchaseRequestItem>> {
        let items = sqlx::query_as::<_, PurchaseRequestItem>(
            r#"
            SELECT id, purchase_request_id, line_no, item_name, quantity
            FROM purchase_request_items
            WHERE purchase_request_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(pr_id)
        .fetch_all(&self.db)
        .await?;
        Ok(items)
    }

    async fn attach_items(
        &self,
        rows: Vec<PurchaseRequestRow>,
    ) -> AppResult<Vec<PurchaseRequest>> {
        let items = sqlx::query_as::<_, PurchaseRequestItem>(
            r#"
            SELECT id, purchase_request_id, line_no, item_name, quantity
            FROM purchase_request_items
            ORDER BY purchase_request_id, line_no
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_request: std::collections::HashMap<Uuid, Vec<PurchaseRequestItem>> =
            std::collections::HashMap::new();
        for item in items {
            by_request
                .entry(item.purchase_request_id)
                .or_default()
                .push(item);
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let items = by_request.remove(&r.id).unwrap_or_default();
                r.into_request(items)
            })
            .collect())
    }
}
