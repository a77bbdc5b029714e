//! The monthly screen's load/derive/save cycle against a stateful stub.

mod common;

use std::sync::{Arc, Mutex};

use assert_matches::assert_matches;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use common::{fake_session, TestBackend};
use taskpoints_client::{ClientError, LoadState, MonthlyView};

/// Stub backing store: one optional setting, a fixed point total, and a
/// flag to simulate an outage.
#[derive(Clone)]
struct StubState {
    setting: Arc<Mutex<Option<Value>>>,
    total_points: i64,
    broken: Arc<Mutex<bool>>,
}

fn monthly_router(state: StubState) -> Router {
    Router::new()
        .route(
            "/api/monthly/settings",
            get(get_settings).post(save_settings),
        )
        .route("/api/points/monthly", get(monthly_points))
        .with_state(state)
}

async fn get_settings(State(state): State<StubState>) -> impl IntoResponse {
    if *state.broken.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Database unavailable", "code": "INTERNAL_ERROR"})),
        )
            .into_response();
    }
    let setting = state.setting.lock().unwrap().clone();
    Json(json!({ "monthly_setting": setting })).into_response()
}

async fn save_settings(
    State(state): State<StubState>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let saved = json!({
        "year": body["year"],
        "month": body["month"],
        "total_profit": body["total_profit"],
        "profit_percentage": body["profit_percentage"],
        "points_value": null,
        "is_finalized": false
    });
    *state.setting.lock().unwrap() = Some(saved.clone());
    Json(json!({ "monthly_setting": saved }))
}

async fn monthly_points(State(state): State<StubState>) -> impl IntoResponse {
    if *state.broken.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Database unavailable", "code": "INTERNAL_ERROR"})),
        )
            .into_response();
    }
    Json(json!({
        "year": 2026,
        "month": 3,
        "total_points": state.total_points,
        "users": []
    }))
    .into_response()
}

fn stub_state(total_points: i64) -> StubState {
    StubState {
        setting: Arc::new(Mutex::new(None)),
        total_points,
        broken: Arc::new(Mutex::new(false)),
    }
}

#[tokio::test]
async fn test_load_applies_saved_setting_and_derives() {
    let state = stub_state(1000);
    *state.setting.lock().unwrap() = Some(json!({
        "year": 2026,
        "month": 3,
        "total_profit": 10000.0,
        "profit_percentage": 25.0,
        "points_value": 2.5,
        "is_finalized": false
    }));
    let backend = TestBackend::start(monthly_router(state)).await;
    backend.session.set(fake_session());

    let mut view = MonthlyView::new(backend.client(), 2026, 3);
    view.load().await.expect("load");

    assert_eq!(*view.state(), LoadState::Loaded);
    assert_eq!(view.total_profit(), Some(10000.0));
    assert_eq!(view.profit_percentage(), Some(25.0));
    assert_eq!(view.total_points(), 1000);

    let d = view.derived();
    assert!((d.distribution_amount - 2500.0).abs() < 1e-9);
    assert!((d.point_value - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_load_for_unsaved_period_uses_defaults() {
    let backend = TestBackend::start(monthly_router(stub_state(480))).await;
    backend.session.set(fake_session());

    let mut view = MonthlyView::new(backend.client(), 2026, 7);
    view.load().await.expect("load");

    assert_eq!(*view.state(), LoadState::Loaded);
    assert_eq!(view.total_profit(), None, "blank, not zero");
    assert_eq!(view.profit_percentage(), Some(25.0));
    assert_eq!(view.total_points(), 480);
    assert!(view.setting().is_none());

    // Blank profit derives to zero but is still renderable.
    let d = view.derived();
    assert_eq!(d.distribution_amount, 0.0);
    assert_eq!(d.point_value, 0.0);
}

#[tokio::test]
async fn test_load_failure_keeps_inputs_and_allows_retry() {
    let state = stub_state(1000);
    let broken = state.broken.clone();
    let backend = TestBackend::start(monthly_router(state)).await;
    backend.session.set(fake_session());

    let mut view = MonthlyView::new(backend.client(), 2026, 3);
    view.set_total_profit(Some(8000.0));
    view.set_profit_percentage(Some(40.0));

    *broken.lock().unwrap() = true;
    let err = view.load().await.unwrap_err();
    assert_matches!(err, ClientError::Api { status: 500, .. });
    assert_matches!(view.state(), LoadState::LoadFailed(_));

    // The screen stays usable on stale inputs.
    assert_eq!(view.total_profit(), Some(8000.0));
    let d = view.derived();
    assert!((d.distribution_amount - 3200.0).abs() < 1e-9);

    // Backend recovers; the same view loads fine.
    *broken.lock().unwrap() = false;
    view.load().await.expect("retry");
    assert_eq!(*view.state(), LoadState::Loaded);
    assert_eq!(view.total_points(), 1000);
}

#[tokio::test]
async fn test_save_persists_and_reloads() {
    let state = stub_state(1000);
    let setting = state.setting.clone();
    let backend = TestBackend::start(monthly_router(state)).await;
    backend.session.set(fake_session());

    let mut view = MonthlyView::new(backend.client(), 2026, 3);
    view.load().await.expect("initial load");
    view.set_total_profit(Some(10000.0));

    view.save().await.expect("save");

    let stored = setting.lock().unwrap().clone().expect("stub received save");
    assert_eq!(stored["total_profit"], json!(10000.0));
    assert_eq!(stored["profit_percentage"], json!(25.0));

    // The post-save reload round-trips the persisted values.
    assert_eq!(*view.state(), LoadState::Loaded);
    assert_eq!(view.total_profit(), Some(10000.0));
    let d = view.derived();
    assert!((d.point_value - 2.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_invalid_inputs_never_reach_the_stub() {
    let state = stub_state(1000);
    let setting = state.setting.clone();
    let backend = TestBackend::start(monthly_router(state)).await;
    backend.session.set(fake_session());

    let mut view = MonthlyView::new(backend.client(), 2026, 3);
    view.set_total_profit(Some(-100.0));

    let err = view.save().await.unwrap_err();
    assert_matches!(err, ClientError::Validation(_));
    assert!(setting.lock().unwrap().is_none(), "no request may hit the server");
}
