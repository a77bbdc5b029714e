//! Point ledger entity model and aggregates.

use serde::Serialize;
use sqlx::FromRow;
use taskpoints_core::types::{DbId, Timestamp};

/// A row from the `point_records` ledger, joined with the task title.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PointRecord {
    pub id: DbId,
    pub user_id: DbId,
    pub task_id: Option<DbId>,
    pub points: i64,
    /// One of the `POINT_KIND_*` constants.
    pub kind: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub task_title: Option<String>,
}

/// DTO for appending to the ledger.
#[derive(Debug)]
pub struct CreatePointRecord {
    pub user_id: DbId,
    pub task_id: Option<DbId>,
    pub points: i64,
    pub kind: String,
    pub description: Option<String>,
}

/// Per-user earned-points total for one month.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserMonthlyPoints {
    pub user_id: DbId,
    pub username: String,
    pub email: String,
    pub monthly_points: i64,
}
