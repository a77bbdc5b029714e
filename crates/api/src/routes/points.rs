//! Route definitions for the `/points` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::points;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/points/my", get(points::my_points))
        .route("/points/user/{id}", get(points::user_points))
        .route("/points/monthly", get(points::monthly_points))
}
