//! Notification entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use taskpoints_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    /// One of the `NOTIFICATION_KIND_*` constants.
    pub kind: String,
    pub related_task_id: Option<DbId>,
    pub related_submission_id: Option<DbId>,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a notification.
#[derive(Debug)]
pub struct CreateNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub related_task_id: Option<DbId>,
    pub related_submission_id: Option<DbId>,
}
