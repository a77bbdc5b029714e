//! Repository for the `monthly_settings` table.

use sqlx::PgPool;
use crate::models::monthly_setting::{MonthlySetting, UpsertMonthlySetting};

const COLUMNS: &str =
    "id, year, month, total_profit, profit_percentage, points_value, is_finalized, created_at";

/// Provides upsert-style access to one setting per (year, month).
pub struct MonthlySettingRepo;

impl MonthlySettingRepo {
    /// Find the setting for a period. Absence is a normal outcome.
    pub async fn find(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<Option<MonthlySetting>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM monthly_settings WHERE year = $1 AND month = $2");
        sqlx::query_as::<_, MonthlySetting>(&query)
            .bind(year)
            .bind(month)
            .fetch_optional(pool)
            .await
    }

    /// Insert the period's setting, or overwrite profit and percentage if it
    /// already exists. The stored `points_value` is cleared on overwrite
    /// since it was derived from the previous inputs.
    pub async fn upsert(
        pool: &PgPool,
        input: &UpsertMonthlySetting,
    ) -> Result<MonthlySetting, sqlx::Error> {
        let query = format!(
            "INSERT INTO monthly_settings (year, month, total_profit, profit_percentage)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_monthly_settings_year_month DO UPDATE SET
                total_profit = EXCLUDED.total_profit,
                profit_percentage = EXCLUDED.profit_percentage,
                points_value = NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlySetting>(&query)
            .bind(input.year)
            .bind(input.month)
            .bind(input.total_profit)
            .bind(input.profit_percentage)
            .fetch_one(pool)
            .await
    }

    /// Persist the computed point value for a period.
    pub async fn set_points_value(
        pool: &PgPool,
        year: i32,
        month: i32,
        points_value: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE monthly_settings SET points_value = $3 WHERE year = $1 AND month = $2",
        )
        .bind(year)
        .bind(month)
        .bind(points_value)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a period as finalized. Returns the updated row, or `None` if no
    /// setting exists for that period.
    pub async fn finalize(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<Option<MonthlySetting>, sqlx::Error> {
        let query = format!(
            "UPDATE monthly_settings SET is_finalized = TRUE
             WHERE year = $1 AND month = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MonthlySetting>(&query)
            .bind(year)
            .bind(month)
            .fetch_optional(pool)
            .await
    }
}
