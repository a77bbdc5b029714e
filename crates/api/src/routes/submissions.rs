//! Route definitions for the `/submissions` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::submissions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(submissions::list_submissions))
        .route("/submissions/my", get(submissions::list_my_submissions))
        .route("/submissions/{id}", get(submissions::get_submission))
        .route(
            "/submissions/{id}/review",
            post(submissions::review_submission),
        )
}
