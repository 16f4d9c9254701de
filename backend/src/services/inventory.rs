//! Inventory ledger service
//!
//! Owns item quantities. Allocation planning is a pure computation
//! (`shared::models::reserve_plan`); stock only moves here, through
//! `deduct`/`deduct_up_to` (request approval) and `credit_by_name`
//! (purchase order receipt). Every mutation serializes on the item row
//! so concurrent approvals and receipts cannot drive a quantity negative
//! or lose an update.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use uuid::Uuid;

use shared::access;
use shared::models::auto_item_code;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;

/// Inventory service for managing stock levels
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Inventory item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItem {
    pub id: Uuid,
    pub item_code: String,
    pub name: String,
    pub category: Option<String>,
    pub quantity: Decimal,
    pub reorder_threshold: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating an inventory item
#[derive(Debug, Deserialize)]
pub struct UpsertItemInput {
    pub item_code: Option<String>,
    pub name: String,
    pub quantity: Option<Decimal>,
    pub category: Option<String>,
    pub reorder_threshold: Option<Decimal>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all inventory items, ordered by code for stable display
    pub async fn list_items(&self) -> AppResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT id, item_code, name, category, quantity, reorder_threshold,
                   created_at, updated_at
            FROM inventory_items
            ORDER BY item_code
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Create or update an item by code, falling back to a name lookup
    /// for legacy records created without one. Returns the item and
    /// whether it was newly created.
    pub async fn upsert_item(
        &self,
        actor: &AuthUser,
        input: UpsertItemInput,
    ) -> AppResult<(InventoryItem, bool)> {
        if !access::can_manage_inventory(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        validation::validate_item_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;

        let quantity = input.quantity.unwrap_or(Decimal::ZERO);
        validation::validate_non_negative_quantity(quantity).map_err(|msg| {
            AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            }
        })?;

        // Find by code first, then by name (legacy records)
        let mut existing: Option<InventoryItem> = None;
        if let Some(code) = &input.item_code {
            existing = sqlx::query_as::<_, InventoryItem>(
                "SELECT id, item_code, name, category, quantity, reorder_threshold, created_at, updated_at FROM inventory_items WHERE item_code = $1",
            )
            .bind(code)
            .fetch_optional(&self.db)
            .await?;
        }
        if existing.is_none() {
            existing = sqlx::query_as::<_, InventoryItem>(
                "SELECT id, item_code, name, category, quantity, reorder_threshold, created_at, updated_at FROM inventory_items WHERE name = $1",
            )
            .bind(&input.name)
            .fetch_optional(&self.db)
            .await?;
        }

        if let Some(item) = existing {
            let item_code = input.item_code.unwrap_or(item.item_code);
            let category = input.category.or(item.category);
            let reorder_threshold = input.reorder_threshold.unwrap_or(item.reorder_threshold);

            let updated = sqlx::query_as::<_, InventoryItem>(
                r#"
                UPDATE inventory_items
                SET item_code = $2, name = $3, quantity = $4, category = $5,
                    reorder_threshold = $6, updated_at = NOW()
                WHERE id = $1
                RETURNING id, item_code, name, category, quantity, reorder_threshold,
                          created_at, updated_at
                "#,
            )
            .bind(item.id)
            .bind(&item_code)
            .bind(&input.name)
            .bind(quantity)
            .bind(&category)
            .bind(reorder_threshold)
            .fetch_one(&self.db)
            .await?;

            return Ok((updated, false));
        }

        // Creating a new item requires an explicit code
        let item_code = input.item_code.ok_or_else(|| AppError::Validation {
            field: "item_code".to_string(),
            message: "Item code is required for a new item".to_string(),
        })?;
        validation::validate_item_code(&item_code).map_err(|msg| AppError::Validation {
            field: "item_code".to_string(),
            message: msg.to_string(),
        })?;

        let created = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (item_code, name, category, quantity, reorder_threshold)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, item_code, name, category, quantity, reorder_threshold,
                      created_at, updated_at
            "#,
        )
        .bind(&item_code)
        .bind(&input.name)
        .bind(&input.category)
        .bind(quantity)
        .bind(input.reorder_threshold.unwrap_or(Decimal::ZERO))
        .fetch_one(&self.db)
        .await?;

        Ok((created, true))
    }

    /// Current on-hand quantity for an item. Planning reads are
    /// advisory; they deliberately take no lock (see `deduct_up_to`
    /// for the re-validation at approval time).
    pub async fn get_quantity(&self, item_id: Uuid) -> AppResult<Decimal> {
        let quantity =
            sqlx::query_scalar::<_, Decimal>("SELECT quantity FROM inventory_items WHERE id = $1")
                .bind(item_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Ok(quantity)
    }

    /// Atomically deduct a quantity inside an existing transaction,
    /// failing with `InsufficientStock` if it would drive the item
    /// negative. The conditional update never matches when stock is
    /// short, so the balance cannot go below zero even under
    /// concurrent deductions.
    pub async fn deduct(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        qty: Decimal,
    ) -> AppResult<InventoryItem> {
        validation::validate_positive_quantity(qty).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let updated = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET quantity = quantity - $2, updated_at = NOW()
            WHERE id = $1 AND quantity >= $2
            RETURNING id, item_code, name, category, quantity, reorder_threshold,
                      created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(qty)
        .fetch_optional(&mut **tx)
        .await?;

        match updated {
            Some(item) => Ok(item),
            None => {
                let current = sqlx::query_as::<_, InventoryItem>(
                    "SELECT id, item_code, name, category, quantity, reorder_threshold, created_at, updated_at FROM inventory_items WHERE id = $1",
                )
                .bind(item_id)
                .fetch_optional(&mut **tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

                Err(AppError::InsufficientStock {
                    item: current.name,
                    requested: qty,
                    on_hand: current.quantity,
                })
            }
        }
    }

    /// Deduct up to `qty`, capped at the current on-hand amount read
    /// under a row lock. Returns the amount actually taken; an unknown
    /// item yields zero. Used at approval time where planned
    /// allocations may exceed stock that moved since planning.
    pub async fn deduct_up_to(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item_id: Uuid,
        qty: Decimal,
    ) -> AppResult<Decimal> {
        let on_hand = sqlx::query_scalar::<_, Decimal>(
            "SELECT quantity FROM inventory_items WHERE id = $1 FOR UPDATE",
        )
        .bind(item_id)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(on_hand) = on_hand else {
            return Ok(Decimal::ZERO);
        };

        let take = on_hand.min(qty).max(Decimal::ZERO);
        if take > Decimal::ZERO {
            // The row is locked and take <= on_hand, so the strict
            // deduction cannot fail here
            self.deduct(tx, item_id, take).await?;
        }

        Ok(take)
    }

    /// Credit stock by item name inside an existing transaction,
    /// auto-creating the inventory record for unseen names with a
    /// generated code. This is the only path that increases inventory
    /// from the procurement side.
    pub async fn credit_by_name(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
        qty: Decimal,
    ) -> AppResult<InventoryItem> {
        validation::validate_positive_quantity(qty).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
        })?;

        let existing = sqlx::query_as::<_, InventoryItem>(
            "SELECT id, item_code, name, category, quantity, reorder_threshold, created_at, updated_at FROM inventory_items WHERE name = $1 FOR UPDATE",
        )
        .bind(name)
        .fetch_optional(&mut **tx)
        .await?;

        let item = match existing {
            Some(item) => {
                sqlx::query_as::<_, InventoryItem>(
                    r#"
                    UPDATE inventory_items
                    SET quantity = quantity + $2, updated_at = NOW()
                    WHERE id = $1
                    RETURNING id, item_code, name, category, quantity, reorder_threshold,
                              created_at, updated_at
                    "#,
                )
                .bind(item.id)
                .bind(qty)
                .fetch_one(&mut **tx)
                .await?
            }
            None => {
                let id = Uuid::new_v4();
                let code = auto_item_code(name, id);
                sqlx::query_as::<_, InventoryItem>(
                    r#"
                    INSERT INTO inventory_items (id, item_code, name, quantity)
                    VALUES ($1, $2, $3, $4)
                    RETURNING id, item_code, name, category, quantity, reorder_threshold,
                              created_at, updated_at
                    "#,
                )
                .bind(id)
                .bind(&code)
                .bind(name)
                .bind(qty)
                .fetch_one(&mut **tx)
                .await?
            }
        };

        Ok(item)
    }
}
