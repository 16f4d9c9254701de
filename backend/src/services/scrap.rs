//! Scrap record service
//!
//! Departments report scrapped material for review. Scrap records do
//! not move inventory; they are an audit trail the SCM side reviews
//! alongside stock levels.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::access;
use shared::models::ScrapStatus;
use shared::validation;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;

/// Scrap record service
#[derive(Clone)]
pub struct ScrapService {
    db: PgPool,
}

/// Scrap record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ScrapRecord {
    pub id: Uuid,
    pub department: String,
    pub description: String,
    pub quantity: Decimal,
    pub created_by: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for reporting scrap
#[derive(Debug, Deserialize)]
pub struct CreateScrapInput {
    pub department: String,
    pub description: String,
    pub quantity: Decimal,
}

impl ScrapService {
    /// Create a new ScrapService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all scrap records, newest first
    pub async fn list(&self, actor: &AuthUser) -> AppResult<Vec<ScrapRecord>> {
        if !access::can_manage_scrap_records(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        let records = sqlx::query_as::<_, ScrapRecord>(
            r#"
            SELECT id, department, description, quantity, created_by, status, created_at
            FROM scrap_records
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }

    /// Report scrapped material
    pub async fn create(&self, actor: &AuthUser, input: CreateScrapInput) -> AppResult<ScrapRecord> {
        if !access::can_manage_scrap_records(actor.role) {
            return Err(AppError::InsufficientPermissions);
        }

        validation::validate_department(&input.department).map_err(|msg| AppError::Validation {
            field: "department".to_string(),
            message: msg.to_string(),
        })?;
        if input.description.trim().is_empty() {
            return Err(AppError::Validation {
                field: "description".to_string(),
                message: "Description is required".to_string(),
            });
        }
        validation::validate_positive_quantity(input.quantity).map_err(|msg| {
            AppError::Validation {
                field: "quantity".to_string(),
                message: msg.to_string(),
            }
        })?;

        let record = sqlx::query_as::<_, ScrapRecord>(
            r#"
            INSERT INTO scrap_records (department, description, quantity, created_by, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, department, description, quantity, created_by, status, created_at
            "#,
        )
        .bind(&input.department)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(actor.user_id)
        .bind(ScrapStatus::Reported.as_str())
        .fetch_one(&self.db)
        .await?;

        Ok(record)
    }
}
