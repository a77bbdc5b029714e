//! Route definitions for the `/monthly` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::monthly;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/monthly/settings",
            get(monthly::get_settings).post(monthly::save_settings),
        )
        .route("/monthly/salary", get(monthly::calculate_salary))
        .route("/monthly/finalize", post(monthly::finalize))
}
