//! Handlers for the `/submissions` resource: listing and review.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use taskpoints_core::error::CoreError;
use taskpoints_core::status::{
    POINT_KIND_EARNED, REVIEW_STATUS_APPROVED, REVIEW_STATUS_REJECTED, TASK_STATUS_COMPLETED,
    TASK_STATUS_OPEN,
};
use taskpoints_core::types::DbId;
use taskpoints_db::models::point_record::CreatePointRecord;
use taskpoints_db::models::submission::ReviewDecision;
use taskpoints_db::repositories::{PointRepo, SubmissionRepo, TaskRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Query parameters for `GET /submissions`.
#[derive(Debug, Deserialize)]
pub struct SubmissionListQuery {
    /// Restrict to one review status (`pending`, `approved`, `rejected`).
    pub status: Option<String>,
}

/// GET /api/submissions
///
/// List all submissions (admin only), optionally filtered by review status.
pub async fn list_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<SubmissionListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let submissions = SubmissionRepo::list(&state.pool, params.status.as_deref()).await?;
    Ok(Json(serde_json::json!({ "submissions": submissions })))
}

/// GET /api/submissions/my
///
/// List the authenticated user's own submissions.
pub async fn list_my_submissions(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let submissions = SubmissionRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(serde_json::json!({ "submissions": submissions })))
}

/// GET /api/submissions/{id}
///
/// Admins or the submitting employee may view a submission.
pub async fn get_submission(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let submission = SubmissionRepo::find_by_id(&state.pool, submission_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id: submission_id,
        }))?;

    if !auth.is_admin() && submission.user_id != auth.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to view this submission".into(),
        )));
    }

    Ok(Json(serde_json::json!({ "submission": submission })))
}

/// POST /api/submissions/{id}/review
///
/// Record an approve/reject decision (admin only). Approval completes the
/// task, credits the awarded points to the user, and writes an `earned`
/// ledger entry -- all inside one transaction. Rejection reopens the task
/// and clears its assignee.
pub async fn review_submission(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(submission_id): Path<DbId>,
    Json(input): Json<ReviewDecision>,
) -> AppResult<Json<serde_json::Value>> {
    if input.review_status != REVIEW_STATUS_APPROVED
        && input.review_status != REVIEW_STATUS_REJECTED
    {
        return Err(AppError::Core(CoreError::Validation(
            "Review status must be 'approved' or 'rejected'".into(),
        )));
    }

    let submission = SubmissionRepo::find_by_id(&state.pool, submission_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id: submission_id,
        }))?;

    let task = TaskRepo::find_by_id(&state.pool, submission.task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: submission.task_id,
        }))?;

    if input.awarded_points < 0 || input.awarded_points > task.max_points {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Awarded points must be between 0 and {}",
            task.max_points
        ))));
    }

    let mut tx = state.pool.begin().await?;

    SubmissionRepo::record_review(
        &mut tx,
        submission_id,
        &input.review_status,
        input.awarded_points,
        input.review_comments.as_deref(),
    )
    .await?;

    if input.review_status == REVIEW_STATUS_APPROVED {
        TaskRepo::set_status(&mut tx, task.id, TASK_STATUS_COMPLETED, task.assigned_to).await?;

        if input.awarded_points > 0 {
            UserRepo::add_points(&mut tx, submission.user_id, input.awarded_points).await?;
            PointRepo::create(
                &mut tx,
                &CreatePointRecord {
                    user_id: submission.user_id,
                    task_id: Some(task.id),
                    points: input.awarded_points,
                    kind: POINT_KIND_EARNED.to_string(),
                    description: Some(format!("Completed task: {}", task.title)),
                },
            )
            .await?;
        }
    } else {
        // Rejected work goes back into the open pool.
        TaskRepo::set_status(&mut tx, task.id, TASK_STATUS_OPEN, None).await?;
    }

    tx.commit().await?;

    let submission = SubmissionRepo::find_by_id(&state.pool, submission_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Submission",
            id: submission_id,
        }))?;

    tracing::info!(
        submission_id,
        reviewer = admin.user_id,
        status = %input.review_status,
        points = input.awarded_points,
        "Submission reviewed"
    );

    Ok(Json(serde_json::json!({ "submission": submission })))
}
