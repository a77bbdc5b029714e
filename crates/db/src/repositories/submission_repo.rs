//! Repository for the `task_submissions` table.

use sqlx::PgPool;
use taskpoints_core::types::DbId;

use crate::models::submission::{Submission, UpsertSubmission};

const COLUMNS: &str = "s.id, s.task_id, s.user_id, s.description, s.file_paths, s.submitted_at, \
                       s.reviewed_at, s.awarded_points, s.review_status, s.review_comments, \
                       t.title AS task_title, u.username AS user_name";

const JOINS: &str = "FROM task_submissions s
                     JOIN tasks t ON t.id = s.task_id
                     JOIN users u ON u.id = s.user_id";

/// Provides submission CRUD and the review workflow update.
pub struct SubmissionRepo;

impl SubmissionRepo {
    /// Create the submission for (task, user), or refresh it on resubmission.
    ///
    /// A resubmission replaces the evidence, bumps `submitted_at`, and drops
    /// the record back to pending review.
    pub async fn upsert(pool: &PgPool, input: &UpsertSubmission) -> Result<Submission, sqlx::Error> {
        let query = format!(
            "WITH upserted AS (
                INSERT INTO task_submissions (task_id, user_id, description, file_paths)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT ON CONSTRAINT uq_task_submissions_task_user DO UPDATE SET
                    description = EXCLUDED.description,
                    file_paths = EXCLUDED.file_paths,
                    submitted_at = NOW(),
                    review_status = 'pending',
                    reviewed_at = NULL
                RETURNING *
             )
             SELECT {COLUMNS}
             FROM upserted s
             JOIN tasks t ON t.id = s.task_id
             JOIN users u ON u.id = s.user_id"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(input.task_id)
            .bind(input.user_id)
            .bind(&input.description)
            .bind(&input.file_paths)
            .fetch_one(pool)
            .await
    }

    /// Find a submission by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {JOINS} WHERE s.id = $1");
        sqlx::query_as::<_, Submission>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all submissions, optionally restricted to one review status,
    /// newest first.
    pub async fn list(
        pool: &PgPool,
        review_status: Option<&str>,
    ) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {JOINS}
             WHERE ($1::TEXT IS NULL OR s.review_status = $1)
             ORDER BY s.submitted_at DESC"
        );
        sqlx::query_as::<_, Submission>(&query)
            .bind(review_status)
            .fetch_all(pool)
            .await
    }

    /// List one user's submissions, newest first.
    pub async fn list_for_user(pool: &PgPool, user_id: DbId) -> Result<Vec<Submission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {JOINS} WHERE s.user_id = $1 ORDER BY s.submitted_at DESC");
        sqlx::query_as::<_, Submission>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record a review decision inside a transaction.
    pub async fn record_review(
        conn: &mut sqlx::PgConnection,
        id: DbId,
        review_status: &str,
        awarded_points: i64,
        review_comments: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE task_submissions SET
                review_status = $2,
                awarded_points = $3,
                review_comments = $4,
                reviewed_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(review_status)
        .bind(awarded_points)
        .bind(review_comments)
        .execute(conn)
        .await?;
        Ok(())
    }
}
