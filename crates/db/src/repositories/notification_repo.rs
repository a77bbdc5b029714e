//! Repository for the `notifications` table.

use sqlx::PgPool;
use taskpoints_core::types::DbId;

use crate::models::notification::{CreateNotification, Notification};

const COLUMNS: &str = "id, user_id, title, message, kind, related_task_id, \
                       related_submission_id, is_read, created_at";

/// Provides notification CRUD and read-state updates.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification, skipping the write if one of the same kind
    /// already exists for this (user, submission). Returns the row when a
    /// new notification was created.
    pub async fn create_deduplicated(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Option<Notification>, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications
                (user_id, title, message, kind, related_task_id, related_submission_id)
             SELECT $1, $2, $3, $4, $5, $6
             WHERE NOT EXISTS (
                SELECT 1 FROM notifications
                WHERE user_id = $1 AND kind = $4 AND related_submission_id = $6
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.message)
            .bind(&input.kind)
            .bind(input.related_task_id)
            .bind(input.related_submission_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications
             WHERE user_id = $1 AND (NOT $2 OR is_read = FALSE)
             ORDER BY created_at DESC
             LIMIT $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(unread_only)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Count a user's unread notifications.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Mark one notification as read, scoped to its owner.
    ///
    /// Returns `false` if the notification does not exist or belongs to
    /// someone else.
    pub async fn mark_read(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all of a user's notifications as read. Returns how many changed.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
