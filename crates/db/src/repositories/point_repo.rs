//! Repository for the `point_records` ledger.

use sqlx::PgPool;
use taskpoints_core::status::POINT_KIND_EARNED;
use taskpoints_core::types::DbId;

use crate::models::point_record::{CreatePointRecord, PointRecord, UserMonthlyPoints};

const COLUMNS: &str = "p.id, p.user_id, p.task_id, p.points, p.kind, p.description, \
                       p.created_at, t.title AS task_title";

/// Provides append and aggregation operations for the points ledger.
pub struct PointRepo;

impl PointRepo {
    /// Append a ledger entry inside a transaction.
    pub async fn create(
        conn: &mut sqlx::PgConnection,
        input: &CreatePointRecord,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO point_records (user_id, task_id, points, kind, description)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(input.user_id)
        .bind(input.task_id)
        .bind(input.points)
        .bind(&input.kind)
        .bind(input.description.as_deref())
        .execute(conn)
        .await?;
        Ok(())
    }

    /// List a user's ledger entries, newest first, optionally restricted to
    /// one calendar month.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        period: Option<(i32, i32)>,
    ) -> Result<Vec<PointRecord>, sqlx::Error> {
        let (year, month) = match period {
            Some((y, m)) => (Some(y), Some(m)),
            None => (None, None),
        };
        let query = format!(
            "SELECT {COLUMNS}
             FROM point_records p
             LEFT JOIN tasks t ON t.id = p.task_id
             WHERE p.user_id = $1
               AND ($2::INT IS NULL OR EXTRACT(YEAR FROM p.created_at)::INT = $2)
               AND ($3::INT IS NULL OR EXTRACT(MONTH FROM p.created_at)::INT = $3)
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, PointRecord>(&query)
            .bind(user_id)
            .bind(year)
            .bind(month)
            .fetch_all(pool)
            .await
    }

    /// Sum of a user's lifetime earned points.
    pub async fn total_earned_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(points), 0)
             FROM point_records
             WHERE user_id = $1 AND kind = $2",
        )
        .bind(user_id)
        .bind(POINT_KIND_EARNED)
        .fetch_one(pool)
        .await?;
        Ok(total)
    }

    /// Earned points per user for one calendar month, covering every user
    /// (zero for those with no records).
    pub async fn monthly_totals(
        pool: &PgPool,
        year: i32,
        month: i32,
    ) -> Result<Vec<UserMonthlyPoints>, sqlx::Error> {
        sqlx::query_as::<_, UserMonthlyPoints>(
            "SELECT u.id AS user_id, u.username, u.email,
                    COALESCE(SUM(p.points), 0)::BIGINT AS monthly_points
             FROM users u
             LEFT JOIN point_records p
               ON p.user_id = u.id
              AND p.kind = 'earned'
              AND EXTRACT(YEAR FROM p.created_at)::INT = $1
              AND EXTRACT(MONTH FROM p.created_at)::INT = $2
             GROUP BY u.id, u.username, u.email
             ORDER BY u.id",
        )
        .bind(year)
        .bind(month)
        .fetch_all(pool)
        .await
    }
}
