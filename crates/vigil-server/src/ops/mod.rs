//! Operational HTTP endpoints.
//!
//! - `/health`  : liveness, always 200
//! - `/ready`   : readiness (503 when a check fails or while draining)
//! - `/metrics` : Prometheus text format

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use vigil_core::metrics::CONTENT_TYPE;

use crate::app_state::AppState;
use crate::readiness::ReadinessReport;

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "version": state.cfg().service.app_version,
        })),
    )
}

pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.readiness().evaluate().await {
        ReadinessReport::Ready(checks) => (
            StatusCode::OK,
            Json(json!({ "status": "ready", "checks": checks })),
        ),
        ReadinessReport::NotReady(checks) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready", "checks": checks })),
        ),
        ReadinessReport::Draining => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready", "reason": "draining" })),
        ),
        ReadinessReport::Failed(message) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "error", "message": message })),
        ),
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.registry().render() {
        Ok(body) => (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to generate metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate metrics" })),
            )
                .into_response()
        }
    }
}
