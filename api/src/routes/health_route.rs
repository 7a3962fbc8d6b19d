//! GET /health — liveness plus provider health snapshots.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::core::app_state::AppState;

/// Handler: GET /health
///
/// Always returns 200; individual provider probes report `ok: false`
/// instead of failing the endpoint.
pub async fn health_route(State(state): State<Arc<AppState>>) -> Json<Value> {
    let providers = state.svc.health_all().await;
    Json(json!({
        "status": "ok",
        "providers": providers,
    }))
}
