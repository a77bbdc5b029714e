//! Handlers for the `/users` resource (admin user management).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use taskpoints_core::error::CoreError;
use taskpoints_core::types::DbId;
use taskpoints_db::models::user::UpdateUser;
use taskpoints_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// GET /api/users
///
/// List all users (admin only).
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let users = UserRepo::list(&state.pool).await?;
    let total_count = users.len();
    let users: Vec<_> = users.into_iter().map(|u| u.into_response()).collect();
    Ok(Json(serde_json::json!({
        "users": users,
        "total_count": total_count,
    })))
}

/// GET /api/users/stats
///
/// Aggregate user counts (admin only).
pub async fn user_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let stats = UserRepo::stats(&state.pool).await?;
    Ok(Json(serde_json::json!(stats)))
}

/// GET /api/users/{id}
pub async fn get_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(Json(serde_json::json!({ "user": user.into_response() })))
}

/// PUT /api/users/{id}
///
/// Partial update of username/email (admin only).
pub async fn update_user(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::update(&state.pool, user_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;
    Ok(Json(serde_json::json!({ "user": user.into_response() })))
}

/// DELETE /api/users/{id}
///
/// Remove a user (admin only). Admins cannot delete themselves.
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if admin.user_id == user_id {
        return Err(AppError::Core(CoreError::Validation(
            "Cannot delete your own account".into(),
        )));
    }

    let deleted = UserRepo::delete(&state.pool, user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
