//! Purchase order and receiving service
//!
//! A purchase order records what was actually bought against a purchase
//! request. Receiving is the closing move of the procurement loop: it
//! credits stock by item name, marks the order received, and cascades
//! the linked purchase request to approved and its material request to
//! fulfilled, all in one transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::access;
use shared::models::{MaterialRequestStatus, PurchaseOrderStatus, PurchaseRequestStatus};
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::services::inventory::InventoryService;

/// Purchase order service
#[derive(Clone)]
pub struct PurchaseOrderService {
    db: PgPool,
}

/// Purchase order with its line items
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseOrder {
    pub id: Uuid,
    pub purchase_request_id: Uuid,
    pub created_by: Uuid,
    pub vendor: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub received_at: Option<DateTime<Utc>>,
    pub items: Vec<PurchaseOrderItem>,
}

/// One line of a purchase order
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PurchaseOrderItem {
    pub id: Uuid,
    pub purchase_order_id: Uuid,
    pub line_no: i32,
    pub item_name: String,
    pub quantity: Decimal,
}

#[derive(Debug, Clone, FromRow)]
struct PurchaseOrderRow {
    id: Uuid,
    purchase_request_id: Uuid,
    created_by: Uuid,
    vendor: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    received_at: Option<DateTime<Utc>>,
}

impl PurchaseOrderRow {
    fn into_order(self, items: Vec<PurchaseOrderItem>) -> PurchaseOrder {
        PurchaseOrder {
            id: self.id,
            purchase_request_id: self.purchase_request_id,
            created_by: self.created_by,
            vendor: self.vendor,
            status: self.status,
            created_at: self.created_at,
            received_at: self.received_at,
            items,
        }
    }
}

/// Input for registering a purchase order
#[derive(Debug, Deserialize)]
pub struct CreatePurchaseOrderInput {
    pub purchase_request_id: Uuid,
    pub vendor: Option<String>,
    pub items: Vec<OrderLineInput>,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineInput {
    pub item_name: String,
    pub quantity: Decimal,
}

impl PurchaseOrderService {
    /// Create a new PurchaseOrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all purchase orders, newest first
    pub async fn list(&self, actor: &AuthUser) -> AppResult<Vec<PurchaseOrder>> {
        if !access::can_view_purchase_orders(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let rows = sqlx::query_as::<_, PurchaseOrderRow>(
            r#"
            SELECT id, purchase_request_id, created_by, vendor, status, created_at, received_at
            FROM purchase_orders
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let items = sqlx::query_as::<_, PurchaseOrderItem>(
            r#"
            SELECT id, purchase_order_id, line_no, item_name, quantity
            FROM purchase_order_items
            ORDER BY purchase_order_id, line_no
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut by_order: std::collections::HashMap<Uuid, Vec<PurchaseOrderItem>> =
            std::collections::HashMap::new();
        for item in items {
            by_order.entry(item.purchase_order_id).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|r| {
                let items = by_order.remove(&r.id).unwrap_or_default();
                r.into_order(items)
            })
            .collect())
    }

    /// Register a purchase order against an existing purchase request
    pub async fn create(
        &self,
        actor: &AuthUser,
        input: CreatePurchaseOrderInput,
    ) -> AppResult<PurchaseOrder> {
        if !access::can_create_purchase_order(actor.role) {
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

        let pr_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM purchase_requests WHERE id = $1)",
        )
        .bind(input.purchase_request_id)
        .fetch_one(&self.db)
        .await?;
        if !pr_exists {
            return Err(AppError::NotFound("Purchase request".to_string()));
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, PurchaseOrderRow>(
            r#"
            INSERT INTO purchase_orders (purchase_request_id, created_by, vendor, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, purchase_request_id, created_by, vendor, status, created_at, received_at
            "#,
        )
        .bind(input.purchase_request_id)
        .bind(actor.user_id)
        .bind(&input.vendor)
        .bind(PurchaseOrderStatus::Open.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(input.items.len());
        for (idx, line) in input.items.iter().enumerate() {
            let item = sqlx::query_as::<_, PurchaseOrderItem>(
                r#"
                INSERT INTO purchase_order_items (purchase_order_id, line_no, item_name, quantity)
                VALUES ($1, $2, $3, $4)
                RETURNING id, purchase_order_id, line_no, item_name, quantity
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

        Ok(row.into_order(items))
    }

    /// Receive a purchase order: credit every line into inventory and
    /// close the procurement loop. The order row is locked first so a
    /// duplicate receive observes the status flip and is rejected
    /// instead of double-crediting stock.
    pub async fn receive(&self, actor: &AuthUser, po_id: Uuid) -> AppResult<PurchaseOrder> {
        if !access::can_receive_purchase_order(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let mut tx = self.db.begin().await?;

        let row = sqlx::query_as::<_, PurchaseOrderRow>(
            r#"
            SELECT id, purchase_request_id, created_by, vendor, status, created_at, received_at
            FROM purchase_orders
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(po_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase order".to_string()))?;

        if row.status != PurchaseOrderStatus::Open.as_str() {
            return Err(AppError::AlreadyProcessed(
                "Purchase order has already been received".to_string(),
            ));
        }

        let items = sqlx::query_as::<_, PurchaseOrderItem>(
            r#"
            SELECT id, purchase_order_id, line_no, item_name, quantity
            FROM purchase_order_items
            WHERE purchase_order_id = $1
            ORDER BY line_no
            "#,
        )
        .bind(po_id)
        .fetch_all(&mut *tx)
        .await?;

        let inventory = InventoryService::new(self.db.clone());
        for item in &items {
            inventory
                .credit_by_name(&mut tx, &item.item_name, item.quantity)
                .await?;
        }

        let row = sqlx::query_as::<_, PurchaseOrderRow>(
            r#"
            UPDATE purchase_orders
            SET status = $2, received_at = NOW()
            WHERE id = $1
            RETURNING id, purchase_request_id, created_by, vendor, status, created_at, received_at
            "#,
        )
        .bind(po_id)
        .bind(PurchaseOrderStatus::Received.as_str())
        .fetch_one(&mut *tx)
        .await?;

        // Cascade: the purchase request is done, and if it was spawned
        // from a material request, that request's shortfall has arrived
        let material_request_id = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            UPDATE purchase_requests
            SET status = $2
            WHERE id = $1
            RETURNING material_request_id
            "#,
        )
        .bind(row.purchase_request_id)
        .bind(PurchaseRequestStatus::Approved.as_str())
        .fetch_one(&mut *tx)
        .await?;

        if let Some(mr_id) = material_request_id {
            sqlx::query("UPDATE material_requests SET status = $2 WHERE id = $1")
                .bind(mr_id)
                .bind(MaterialRequestStatus::Fulfilled.as_str())
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(row.into_order(items))
    }
}
