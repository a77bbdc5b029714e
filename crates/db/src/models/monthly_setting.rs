//! Monthly profit-distribution setting entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use taskpoints_core::types::{DbId, Timestamp};

/// A row from the `monthly_settings` table. One row per (year, month);
/// saving an existing period overwrites it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MonthlySetting {
    pub id: DbId,
    pub year: i32,
    pub month: i32,
    pub total_profit: f64,
    pub profit_percentage: f64,
    /// Server-computed worth of one point, set by the salary calculation.
    pub points_value: Option<f64>,
    /// Once finalized the period refuses further saves.
    pub is_finalized: bool,
    pub created_at: Timestamp,
}

/// DTO for upserting a period's setting.
#[derive(Debug)]
pub struct UpsertMonthlySetting {
    pub year: i32,
    pub month: i32,
    pub total_profit: f64,
    pub profit_percentage: f64,
}
