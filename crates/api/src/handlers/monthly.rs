//! Handlers for `/monthly`: profit-distribution settings, salary
//! calculation, finalization.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use taskpoints_core::distribution::{
    recompute, round_to, user_salary, validate_setting, POINT_VALUE_DECIMALS, SALARY_DECIMALS,
};
use taskpoints_core::error::CoreError;
use taskpoints_db::models::monthly_setting::UpsertMonthlySetting;
use taskpoints_db::repositories::{MonthlySettingRepo, PointRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::points::PeriodQuery;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /monthly/settings`.
#[derive(Debug, Deserialize)]
pub struct SaveSettingsRequest {
    pub year: i32,
    pub month: i32,
    pub total_profit: f64,
    pub profit_percentage: f64,
}

/// Request body for `POST /monthly/finalize`.
#[derive(Debug, Deserialize)]
pub struct FinalizeRequest {
    pub year: i32,
    pub month: i32,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/monthly/settings?year=&month=
///
/// The period's setting, or `null` when none has been saved -- absence is a
/// normal outcome, not an error.
pub async fn get_settings(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (year, month) = period.resolve();
    let monthly_setting = MonthlySettingRepo::find(&state.pool, year, month).await?;
    Ok(Json(serde_json::json!({ "monthly_setting": monthly_setting })))
}

/// POST /api/monthly/settings
///
/// Upsert a period's profit and percentage (admin only). The save-time
/// validation gate runs before any write; a finalized period refuses
/// changes.
pub async fn save_settings(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<SaveSettingsRequest>,
) -> AppResult<Json<serde_json::Value>> {
    // A negative month wraps to a large u32, which the range check rejects.
    validate_setting(input.month as u32, input.total_profit, input.profit_percentage)
        .map_err(AppError::Core)?;

    if let Some(existing) = MonthlySettingRepo::find(&state.pool, input.year, input.month).await? {
        if existing.is_finalized {
            return Err(AppError::PeriodFinalized {
                year: input.year,
                month: input.month,
            });
        }
    }

    let monthly_setting = MonthlySettingRepo::upsert(
        &state.pool,
        &UpsertMonthlySetting {
            year: input.year,
            month: input.month,
            total_profit: input.total_profit,
            profit_percentage: input.profit_percentage,
        },
    )
    .await?;

    tracing::info!(
        year = input.year,
        month = input.month,
        admin = admin.user_id,
        "Monthly settings saved"
    );

    Ok(Json(serde_json::json!({ "monthly_setting": monthly_setting })))
}

/// GET /api/monthly/salary?year=&month=
///
/// Compute the distribution pool, point value, and per-user payouts for a
/// month (admin only), and persist the rounded point value on the setting.
/// A month with zero points yields a zero point value and an empty payout
/// list.
pub async fn calculate_salary(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(period): Query<PeriodQuery>,
) -> AppResult<Json<serde_json::Value>> {
    let (year, month) = period.resolve();

    let setting = MonthlySettingRepo::find(&state.pool, year, month)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "Set this month's profit and percentage first".into(),
            ))
        })?;

    let users = PointRepo::monthly_totals(&state.pool, year, month).await?;
    let total_points: i64 = users.iter().map(|u| u.monthly_points).sum();

    let derived = recompute(setting.total_profit, setting.profit_percentage, total_points);
    let point_value = round_to(derived.point_value, POINT_VALUE_DECIMALS);

    if total_points == 0 {
        return Ok(Json(serde_json::json!({
            "year": year,
            "month": month,
            "total_points": 0,
            "point_value": 0,
            "users": [],
        })));
    }

    MonthlySettingRepo::set_points_value(&state.pool, year, month, point_value).await?;

    let users_salary: Vec<serde_json::Value> = users
        .iter()
        .map(|u| {
            serde_json::json!({
                "user_id": u.user_id,
                "username": u.username,
                "email": u.email,
                "monthly_points": u.monthly_points,
                "salary": user_salary(u.monthly_points, point_value),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "year": year,
        "month": month,
        "total_profit": setting.total_profit,
        "profit_percentage": setting.profit_percentage,
        "profit_pool": round_to(derived.distribution_amount, SALARY_DECIMALS),
        "total_points": total_points,
        "point_value": point_value,
        "users": users_salary,
    })))
}

/// POST /api/monthly/finalize
///
/// Lock a period against further setting changes (admin only).
pub async fn finalize(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<FinalizeRequest>,
) -> AppResult<Json<serde_json::Value>> {
    let monthly_setting = MonthlySettingRepo::finalize(&state.pool, input.year, input.month)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(
                "No monthly setting exists for this period".into(),
            ))
        })?;

    tracing::info!(
        year = input.year,
        month = input.month,
        admin = admin.user_id,
        "Monthly settings finalized"
    );

    Ok(Json(serde_json::json!({ "monthly_setting": monthly_setting })))
}
