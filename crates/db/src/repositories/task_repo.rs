//! Repository for the `tasks` table.

use sqlx::PgPool;
use taskpoints_core::types::DbId;

use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};

/// Column list including the joined creator/assignee usernames.
const COLUMNS: &str = "t.id, t.title, t.description, t.publisher_name, t.start_date, t.end_date, \
                       t.max_points, t.status, t.created_by, t.assigned_to, t.created_at, \
                       c.username AS creator_name, a.username AS assignee_name";

const JOINS: &str = "FROM tasks t
                     JOIN users c ON c.id = t.created_by
                     LEFT JOIN users a ON a.id = t.assigned_to";

/// Provides CRUD and workflow operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task (status defaults to `open`), returning the row.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO tasks
                    (title, description, publisher_name, start_date, end_date, max_points, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {COLUMNS}
             FROM inserted t
             JOIN users c ON c.id = t.created_by
             LEFT JOIN users a ON a.id = t.assigned_to"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.publisher_name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_points)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} {JOINS} WHERE t.id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks matching the filter, newest first.
    pub async fn list(pool: &PgPool, filter: &TaskFilter) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} {JOINS}
             WHERE ($1::TEXT IS NULL OR t.status = $1)
               AND ($2::BIGINT IS NULL OR t.assigned_to = $2)
             ORDER BY t.created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&filter.status)
            .bind(filter.assigned_to)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE tasks SET
                    title = COALESCE($2, title),
                    description = COALESCE($3, description),
                    publisher_name = COALESCE($4, publisher_name),
                    start_date = COALESCE($5, start_date),
                    end_date = COALESCE($6, end_date),
                    max_points = COALESCE($7, max_points),
                    status = COALESCE($8, status)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS}
             FROM updated t
             JOIN users c ON c.id = t.created_by
             LEFT JOIN users a ON a.id = t.assigned_to"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.publisher_name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.max_points)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    /// Claim an open task for a user.
    ///
    /// The status and assignment guards are part of the WHERE clause so two
    /// racing claims cannot both succeed. Returns `false` when the task was
    /// not open/unassigned (or does not exist).
    pub async fn claim(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET assigned_to = $2, status = 'assigned'
             WHERE id = $1 AND status = 'open' AND assigned_to IS NULL",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set a task's status (and optionally its assignee) inside a transaction.
    pub async fn set_status(
        conn: &mut sqlx::PgConnection,
        id: DbId,
        status: &str,
        assigned_to: Option<DbId>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET status = $2, assigned_to = $3 WHERE id = $1")
            .bind(id)
            .bind(status)
            .bind(assigned_to)
            .execute(conn)
            .await?;
        Ok(())
    }

    /// Delete a task. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
