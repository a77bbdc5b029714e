pub mod auth;
pub mod health;
pub mod monthly;
pub mod notifications;
pub mod points;
pub mod submissions;
pub mod tasks;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                   register (public)
/// /auth/login                      login (public)
/// /auth/profile                    profile (auth)
/// /auth/logout                     logout (auth)
///
/// /tasks                           list (auth), create (admin)
/// /tasks/{id}                      get (auth), update/delete (admin)
/// /tasks/{id}/assign               claim an open task (auth)
/// /tasks/{id}/submit               submit evidence (assignee)
///
/// /submissions                     list (admin)
/// /submissions/my                  own submissions (auth)
/// /submissions/{id}                get (admin or owner)
/// /submissions/{id}/review         approve/reject (admin)
///
/// /users                           list (admin)
/// /users/stats                     aggregate counts (admin)
/// /users/{id}                      get/update/delete (admin)
///
/// /points/my                       own ledger (auth)
/// /points/user/{id}                per-user monthly ledger (admin or self)
/// /points/monthly                  per-user monthly totals (admin)
///
/// /monthly/settings                get, upsert (admin)
/// /monthly/salary                  distribution + payouts (admin)
/// /monthly/finalize                lock a period (admin)
///
/// /notifications                   list (auth)
/// /notifications/count             unread count (auth)
/// /notifications/{id}/read         mark read (auth)
/// /notifications/read-all          mark all read (auth)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(tasks::router())
        .merge(submissions::router())
        .merge(users::router())
        .merge(points::router())
        .merge(monthly::router())
        .merge(notifications::router())
}
