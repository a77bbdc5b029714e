//! Handlers for the `/tasks` resource: CRUD (admin), claiming, submitting.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use taskpoints_core::error::CoreError;
use taskpoints_core::status::{
    NOTIFICATION_KIND_SUBMISSION_PENDING, TASK_STATUS_ASSIGNED, TASK_STATUS_OPEN,
    TASK_STATUS_SUBMITTED,
};
use taskpoints_core::types::{Date, DbId};
use taskpoints_db::models::notification::CreateNotification;
use taskpoints_db::models::submission::UpsertSubmission;
use taskpoints_db::models::task::{CreateTask, TaskFilter, UpdateTask};
use taskpoints_db::repositories::{NotificationRepo, SubmissionRepo, TaskRepo, UserRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`.
#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<String>,
    /// Non-admins: list own assigned tasks instead of the open pool.
    #[serde(default)]
    pub assigned_to_me: bool,
}

/// Request body for `POST /tasks`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1, max = 100))]
    pub publisher_name: String,
    pub start_date: Date,
    pub end_date: Date,
    #[validate(range(min = 1))]
    pub max_points: i64,
}

/// Request body for `POST /tasks/{id}/submit`.
#[derive(Debug, Deserialize)]
pub struct SubmitTaskRequest {
    #[serde(default)]
    pub description: String,
    /// Paths of previously uploaded evidence files.
    #[serde(default)]
    pub file_paths: Vec<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tasks
///
/// Role-aware listing: admins see everything; employees see the open pool,
/// or their own tasks with `assigned_to_me=true`. An optional `status`
/// filter applies on top.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<TaskListQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let mut filter = TaskFilter {
        status: params.status,
        assigned_to: None,
    };

    if !auth.is_admin() {
        if params.assigned_to_me {
            filter.assigned_to = Some(auth.user_id);
        } else if filter.status.is_none() {
            filter.status = Some(TASK_STATUS_OPEN.to_string());
        }
    }

    let tasks = TaskRepo::list(&state.pool, &filter).await?;
    Ok(Json(serde_json::json!({ "tasks": tasks })))
}

/// POST /api/tasks
///
/// Create a task (admin only). The date order and point checks run before
/// any write.
pub async fn create_task(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTaskRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    if input.end_date < input.start_date {
        return Err(AppError::Core(CoreError::Validation(
            "End date cannot be before start date".into(),
        )));
    }

    let task = TaskRepo::create(
        &state.pool,
        &CreateTask {
            title: input.title,
            description: input.description,
            publisher_name: input.publisher_name,
            start_date: input.start_date,
            end_date: input.end_date,
            max_points: input.max_points,
            created_by: admin.user_id,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, created_by = admin.user_id, "Task created");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "task": task })),
    ))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;
    Ok(Json(serde_json::json!({ "task": task })))
}

/// PUT /api/tasks/{id}
///
/// Partial update (admin only). Only supplied fields are changed.
pub async fn update_task(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<serde_json::Value>> {
    if let Some(max_points) = input.max_points {
        if max_points <= 0 {
            return Err(AppError::Core(CoreError::Validation(
                "Max points must be greater than 0".into(),
            )));
        }
    }
    if let (Some(start), Some(end)) = (input.start_date, input.end_date) {
        if end < start {
            return Err(AppError::Core(CoreError::Validation(
                "End date cannot be before start date".into(),
            )));
        }
    }

    let task = TaskRepo::update(&state.pool, task_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    Ok(Json(serde_json::json!({ "task": task })))
}

/// DELETE /api/tasks/{id}
///
/// Admin only. In-flight tasks (assigned or submitted) cannot be deleted.
pub async fn delete_task(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    if task.status == TASK_STATUS_ASSIGNED || task.status == TASK_STATUS_SUBMITTED {
        return Err(AppError::Core(CoreError::Conflict(
            "Cannot delete a task that is assigned or under review".into(),
        )));
    }

    TaskRepo::delete(&state.pool, task_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/tasks/{id}/assign
///
/// Claim an open task for the authenticated user. The repository guard makes
/// racing claims safe: exactly one wins.
pub async fn assign_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    if task.end_date < chrono::Utc::now().date_naive() {
        return Err(AppError::Core(CoreError::Validation(
            "Task deadline has passed".into(),
        )));
    }

    let claimed = TaskRepo::claim(&state.pool, task_id, auth.user_id).await?;
    if !claimed {
        return Err(AppError::Core(CoreError::Conflict(
            "Task is no longer open".into(),
        )));
    }

    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    tracing::info!(task_id, user_id = auth.user_id, "Task claimed");
    Ok(Json(serde_json::json!({ "task": task })))
}

/// POST /api/tasks/{id}/submit
///
/// Submit (or resubmit) completion evidence for one's assigned task. Moves
/// the task to `submitted` and notifies every administrator, deduplicated
/// per (admin, submission).
pub async fn submit_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<SubmitTaskRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let task = TaskRepo::find_by_id(&state.pool, task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: task_id,
        }))?;

    if task.assigned_to != Some(auth.user_id) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the assignee can submit this task".into(),
        )));
    }
    if task.status != TASK_STATUS_ASSIGNED && task.status != TASK_STATUS_SUBMITTED {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Task status '{}' does not allow submission",
            task.status
        ))));
    }

    let submission = SubmissionRepo::upsert(
        &state.pool,
        &UpsertSubmission {
            task_id,
            user_id: auth.user_id,
            description: input.description,
            file_paths: serde_json::json!(input.file_paths),
        },
    )
    .await?;

    let mut tx = state.pool.begin().await?;
    TaskRepo::set_status(&mut tx, task_id, TASK_STATUS_SUBMITTED, task.assigned_to).await?;
    tx.commit().await?;

    notify_admins_of_submission(&state, &submission).await;

    tracing::info!(task_id, user_id = auth.user_id, submission_id = submission.id, "Task submitted");
    Ok(Json(serde_json::json!({ "submission": submission })))
}

/// Fan out a pending-review notification to every administrator.
///
/// Failure here must not fail the submission itself; it is logged and
/// swallowed.
async fn notify_admins_of_submission(
    state: &AppState,
    submission: &taskpoints_db::models::submission::Submission,
) {
    let admins = match UserRepo::list_by_role(&state.pool, taskpoints_core::roles::ROLE_ADMIN).await
    {
        Ok(admins) => admins,
        Err(e) => {
            tracing::error!(error = %e, "Failed to list admins for submission notification");
            return;
        }
    };

    let task_title = submission.task_title.as_deref().unwrap_or("(untitled)");
    let user_name = submission.user_name.as_deref().unwrap_or("(unknown)");

    for admin in admins {
        let result = NotificationRepo::create_deduplicated(
            &state.pool,
            &CreateNotification {
                user_id: admin.id,
                title: "New task submission".to_string(),
                message: format!(
                    "User {user_name} submitted task \"{task_title}\" and is awaiting review."
                ),
                kind: NOTIFICATION_KIND_SUBMISSION_PENDING.to_string(),
                related_task_id: Some(submission.task_id),
                related_submission_id: Some(submission.id),
            },
        )
        .await;

        if let Err(e) = result {
            tracing::error!(error = %e, admin_id = admin.id, "Failed to create submission notification");
        }
    }
}
