use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use taskpoints_core::error::CoreError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the shape `{ "error": <message>, "code": <machine code> }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskpoints_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A write against a finalized distribution period.
    #[error("Settings for {year}-{month:02} are finalized")]
    PeriodFinalized { year: i32, month: i32 },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Domain-specific HTTP errors ---
            AppError::PeriodFinalized { year, month } => (
                StatusCode::CONFLICT,
                "MONTH_FINALIZED",
                format!("Settings for {year}-{month:02} are finalized and cannot be changed"),
            ),

            // --- Generic HTTP errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 409 with a message naming the duplicated field, not the constraint.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.starts_with("uq_") {
                        return (StatusCode::CONFLICT, "CONFLICT", conflict_message(constraint));
                    }
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Translate a unique-constraint name into the message users see.
///
/// Handlers pre-check these conditions, so this path fires only when two
/// writers race past the pre-check; the message must still make sense on
/// its own.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_users_username" => "Username is already taken".to_string(),
        "uq_users_email" => "Email is already registered".to_string(),
        "uq_monthly_settings_year_month" => {
            "Settings for this period already exist".to_string()
        }
        "uq_task_submissions_task_user" => {
            "You have already submitted this task".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_messages_name_the_field() {
        assert_eq!(conflict_message("uq_users_username"), "Username is already taken");
        assert_eq!(conflict_message("uq_users_email"), "Email is already registered");
        assert_eq!(
            conflict_message("uq_monthly_settings_year_month"),
            "Settings for this period already exist"
        );
        assert!(conflict_message("uq_something_else").contains("uq_something_else"));
    }

    #[test]
    fn test_period_finalized_maps_to_conflict() {
        let response = AppError::PeriodFinalized { year: 2026, month: 3 }.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response =
            AppError::Core(CoreError::Validation("Month must be between 1 and 12".into()))
                .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_names_the_entity() {
        let err = AppError::Core(CoreError::NotFound {
            entity: "Task".into(),
            id: 7,
        });
        assert_eq!(err.to_string(), "Entity not found: Task with id 7");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
