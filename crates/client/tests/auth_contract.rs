//! Session and 401-contract behavior over a real HTTP round trip.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use common::{fake_session, TestBackend};
use taskpoints_client::{ApiClient, ClientError};

fn login_router() -> Router {
    Router::new().route(
        "/api/auth/login",
        post(|Json(body): Json<serde_json::Value>| async move {
            if body["password"] == "correct horse" {
                Json(json!({
                    "access_token": "granted-token",
                    "expires_in": 3600,
                    "user": {
                        "id": 7,
                        "username": "alice",
                        "email": "alice@example.com",
                        "role": "user",
                        "total_points": 120
                    }
                }))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Invalid credentials", "code": "UNAUTHORIZED"})),
                )
                    .into_response()
            }
        }),
    )
}

#[tokio::test]
async fn test_login_installs_session() {
    let backend = TestBackend::start(login_router()).await;
    let client = backend.client();

    let user = client.login("alice", "correct horse").await.expect("login");
    assert_eq!(user.username, "alice");
    assert!(backend.session.is_authenticated());
    assert_eq!(backend.session.token().as_deref(), Some("granted-token"));
    assert!(!backend.session.is_admin());
}

#[tokio::test]
async fn test_failed_login_leaves_no_session() {
    let backend = TestBackend::start(login_router()).await;
    let client = backend.client();

    let err = client.login("alice", "wrong").await.unwrap_err();
    assert_matches!(err, ClientError::Unauthorized);
    assert!(!backend.session.is_authenticated());
}

#[tokio::test]
async fn test_business_error_surfaces_backend_message() {
    let router = Router::new().route(
        "/api/tasks/{id}/assign",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({"error": "Task is already assigned", "code": "CONFLICT"})),
            )
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());
    let client = backend.client();

    let err = client.assign_task(3).await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 409, ref message }
        if message == "Task is already assigned");
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_fires_callback_once() {
    let router = Router::new().route(
        "/api/auth/profile",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Token expired", "code": "UNAUTHORIZED"})),
            )
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let client = ApiClient::new(backend.base_url(), backend.session.clone())
        .on_unauthorized(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    let err = client.profile().await.unwrap_err();
    assert_matches!(err, ClientError::Unauthorized);
    assert!(!backend.session.is_authenticated(), "session must be gone");
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    // A second 401 still maps to the error but must not re-fire the hook.
    let err = client.profile().await.unwrap_err();
    assert_matches!(err, ClientError::Unauthorized);
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unauthorized_contract_applies_to_empty_body_endpoints() {
    // Endpoints without a success body must run the same status mapping as
    // the typed ones.
    let router = Router::new().route(
        "/api/notifications/{id}/read",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Token expired", "code": "UNAUTHORIZED"})),
            )
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());

    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let client = ApiClient::new(backend.base_url(), backend.session.clone())
        .on_unauthorized(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

    let err = client.mark_notification_read(5).await.unwrap_err();
    assert_matches!(err, ClientError::Unauthorized);
    assert!(!backend.session.is_authenticated());
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_request_timeout_surfaces_as_retryable_network_error() {
    let router = Router::new().route(
        "/api/auth/profile",
        get(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            Json(json!({"user": null}))
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());

    let client = ApiClient::with_timeout(
        backend.base_url(),
        backend.session.clone(),
        std::time::Duration::from_millis(200),
    );

    let err = client.profile().await.unwrap_err();
    assert_matches!(err, ClientError::Network(_));
    assert!(err.is_retryable());
    // A timeout is not an auth event; the session must survive.
    assert!(backend.session.is_authenticated());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_server_rejects() {
    let router = Router::new().route(
        "/api/auth/logout",
        post(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "Token expired", "code": "UNAUTHORIZED"})),
            )
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());
    let client = backend.client();

    client.logout().await.expect("logout is best-effort");
    assert!(!backend.session.is_authenticated());
}

#[tokio::test]
async fn test_bearer_header_attached_when_logged_in() {
    let router = Router::new().route(
        "/api/auth/profile",
        get(|headers: axum::http::HeaderMap| async move {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("");
            if auth == "Bearer test-token" {
                Json(json!({"user": {
                    "id": 1,
                    "username": "admin",
                    "email": "admin@example.com",
                    "role": "admin",
                    "total_points": 0
                }}))
                .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Missing token", "code": "UNAUTHORIZED"})),
                )
                    .into_response()
            }
        }),
    );
    let backend = TestBackend::start(router).await;
    backend.session.set(fake_session());
    let client = backend.client();

    let user = client.profile().await.expect("profile");
    assert_eq!(user.role, "admin");
}
