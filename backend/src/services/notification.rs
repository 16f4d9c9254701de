//! Notification dispatcher
//!
//! In-app notifications keyed to the workflow record that triggered
//! them. Dispatch happens after the originating transaction commits;
//! callers log and swallow failures so a notification hiccup never
//! rolls back a stock movement.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use shared::types::{RelatedType, Role};

use crate::error::{AppError, AppResult};

/// Notification service for workflow events
#[derive(Clone)]
pub struct NotificationService {
    db: PgPool,
}

/// Notification record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub related_type: String,
    pub related_id: Option<Uuid>,
    pub seen: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a notification for a single user
    pub async fn notify(
        &self,
        user_id: Uuid,
        message: &str,
        related_type: RelatedType,
        related_id: Option<Uuid>,
    ) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications (user_id, message, related_type, related_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, message, related_type, related_id, seen, created_at
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(related_type.as_str())
        .bind(related_id)
        .fetch_one(&self.db)
        .await?;

        Ok(notification)
    }

    /// Fan a notification out to every user holding a role. Returns the
    /// number of notifications created; an empty role is not an error.
    pub async fn notify_role(
        &self,
        role: Role,
        message: &str,
        related_type: RelatedType,
        related_id: Option<Uuid>,
    ) -> AppResult<usize> {
        let user_ids =
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE role = $1")
                .bind(role.as_str())
                .fetch_all(&self.db)
                .await?;

        let mut count = 0;
        for user_id in user_ids {
            self.notify(user_id, message, related_type, related_id)
                .await?;
            count += 1;
        }

        Ok(count)
    }

    /// List the caller's notifications, newest first
    pub async fn list_for_user(&self, user_id: Uuid) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, user_id, message, related_type, related_id, seen, created_at
            FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(notifications)
    }

    /// Mark one of the caller's notifications as seen. The user filter
    /// makes cross-user marking indistinguishable from a missing record.
    pub async fn mark_read(&self, user_id: Uuid, notification_id: Uuid) -> AppResult<Notification> {
        let notification = sqlx::query_as::<_, Notification>(
            r#"
            UPDATE notifications
            SET seen = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, message, related_type, related_id, seen, created_at
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification".to_string()))?;

        Ok(notification)
    }
}
