//! Handlers for the `/points` resource: personal ledgers and monthly totals.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Datelike;
use serde::Deserialize;
use taskpoints_core::error::CoreError;
use taskpoints_core::types::DbId;
use taskpoints_db::repositories::{MonthlySettingRepo, PointRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// `?year=&month=` pair; both default to the current calendar month.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub year: Option<i32>,
    pub month: Option<i32>,
}

impl PeriodQuery {
    /// Resolve the query against today's date.
    pub fn resolve(&self) -> (i32, i32) {
        let today = chrono::Utc::now();
        (
            self.year.unwrap_or_else(|| today.year()),
            self.month.unwrap_or(today.month() as i32),
        )
    }
}

/// GET /api/points/my
///
/// The authenticated user's profile, lifetime earned total, and full ledger.
pub async fn my_points(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth.user_id,
        }))?;

    let total_points = PointRepo::total_earned_for_user(&state.pool, auth.user_id).await?;
    let point_records = PointRepo::list_for_user(&state.pool, auth.user_id, None).await?;

    Ok(Json(serde_json::json!({
        "user": user.into_response(),
        "total_points": total_points,
        "point_records": point_records,
    })))
}

/// GET /api/points/user/{id}
///
/// One user's ledger for a month. Admins may view anyone; employees only
/// themselves.
pub async fn user_points(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<serde_json::Value>> {
    if !auth.is_admin() && auth.user_id != user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not allowed to view this user's points".into(),
        )));
    }

    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let (year, month) = period.resolve();
    let point_records = PointRepo::list_for_user(&state.pool, user_id, Some((year, month))).await?;
    let monthly_points: i64 = point_records
        .iter()
        .filter(|r| r.kind == taskpoints_core::status::POINT_KIND_EARNED)
        .map(|r| r.points)
        .sum();

    Ok(Json(serde_json::json!({
        "user": user.into_response(),
        "year": year,
        "month": month,
        "monthly_points": monthly_points,
        "point_records": point_records,
    })))
}

/// GET /api/points/monthly
///
/// Per-user earned totals for a month plus the period's setting (admin
/// only). `total_points` here is the denominator the distribution
/// calculator divides by.
pub async fn monthly_points(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (year, month) = period.resolve();

    let users = PointRepo::monthly_totals(&state.pool, year, month).await?;
    let total_points: i64 = users.iter().map(|u| u.monthly_points).sum();
    let monthly_setting = MonthlySettingRepo::find(&state.pool, year, month).await?;

    Ok(Json(serde_json::json!({
        "year": year,
        "month": month,
        "total_points": total_points,
        "users": users,
        "monthly_setting": monthly_setting,
    })))
}
