//! Wire types for the API surface the client consumes.
//!
//! These mirror the server's JSON shapes. Only fields the client actually
//! reads are modeled; unknown fields are ignored on deserialization.

use serde::{Deserialize, Serialize};
use taskpoints_core::types::{Date, DbId, Timestamp};

/// The authenticated user's profile, as returned by login and `/auth/profile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub role: String,
    pub total_points: i64,
}

/// Response body of `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// A task as rendered by the task screens.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub publisher_name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub max_points: i64,
    pub status: String,
    pub assigned_to: Option<DbId>,
    pub creator_name: Option<String>,
    pub assignee_name: Option<String>,
}

/// A submission as rendered by the review screens.
#[derive(Debug, Clone, Deserialize)]
pub struct Submission {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub description: String,
    pub file_paths: Vec<String>,
    pub submitted_at: Timestamp,
    pub reviewed_at: Option<Timestamp>,
    pub awarded_points: i64,
    pub review_status: String,
    pub review_comments: Option<String>,
    pub task_title: Option<String>,
    pub user_name: Option<String>,
}

/// Body for `POST /tasks/{id}/submit`.
#[derive(Debug, Serialize)]
pub struct SubmitTaskRequest {
    pub description: String,
    pub file_paths: Vec<String>,
}

/// Body for `POST /submissions/{id}/review`.
#[derive(Debug, Serialize)]
pub struct ReviewRequest {
    pub review_status: String,
    pub awarded_points: i64,
    pub review_comments: Option<String>,
}

/// A persisted monthly setting (`GET /monthly/settings`).
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlySetting {
    pub year: i32,
    pub month: i32,
    pub total_profit: f64,
    pub profit_percentage: f64,
    /// Server-computed point value; present once a salary calculation ran.
    pub points_value: Option<f64>,
    pub is_finalized: bool,
}

/// Body for `POST /monthly/settings`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveMonthlySettings {
    pub year: i32,
    pub month: i32,
    pub total_profit: f64,
    pub profit_percentage: f64,
}

/// A notification row for the badge dropdown.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub id: DbId,
    pub title: String,
    pub message: String,
    pub kind: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Envelope types (the server wraps collections in named fields)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct TasksEnvelope {
    pub tasks: Vec<Task>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskEnvelope {
    pub task: Task,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionsEnvelope {
    pub submissions: Vec<Submission>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmissionEnvelope {
    pub submission: Submission,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    pub user: UserProfile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthlySettingEnvelope {
    pub monthly_setting: Option<MonthlySetting>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MonthlyPointsEnvelope {
    pub total_points: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotificationsEnvelope {
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UnreadCountEnvelope {
    pub unread_count: i64,
}
