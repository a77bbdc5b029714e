//! Task entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskpoints_core::types::{Date, DbId, Timestamp};

/// A row from the `tasks` table, joined with creator/assignee usernames.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    /// Display name of whoever commissioned the work (free text, not a FK).
    pub publisher_name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_points: i64,
    pub status: String,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub creator_name: Option<String>,
    pub assignee_name: Option<String>,
}

/// DTO for creating a task.
#[derive(Debug)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub publisher_name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_points: i64,
    pub created_by: DbId,
}

/// DTO for updating a task. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub publisher_name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub max_points: Option<i64>,
    pub status: Option<String>,
}

/// Filters for task listing.
#[derive(Debug, Default)]
pub struct TaskFilter {
    /// Restrict to one status value.
    pub status: Option<String>,
    /// Restrict to tasks assigned to this user.
    pub assigned_to: Option<DbId>,
}
