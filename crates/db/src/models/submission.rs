//! Task submission entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskpoints_core::types::{DbId, Timestamp};

/// A row from the `task_submissions` table, joined with the task title and
/// submitter username for display.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Submission {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub description: String,
    /// JSON array of previously uploaded file paths (evidence).
    pub file_paths: serde_json::Value,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub awarded_points: i64,
    pub review_status: String,
    pub review_comments: Option<String>,
    pub task_title: Option<String>,
    pub user_name: Option<String>,
}

/// DTO for creating or refreshing a submission (one per task+user; a
/// resubmission overwrites and re-enters review).
#[derive(Debug)]
pub struct UpsertSubmission {
    pub task_id: DbId,
    pub user_id: DbId,
    pub description: String,
    pub file_paths: serde_json::Value,
}

/// DTO for recording a review decision.
#[derive(Debug, Deserialize)]
pub struct ReviewDecision {
    pub review_status: String,
    pub awarded_points: i64,
    pub review_comments: Option<String>,
}
