//! Simulated user API.
//!
//! Each handler reports its outcome on `business_operations_total` using the
//! fixed `BusinessStatus` vocabulary.

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::http_error::ApiError;
use crate::obs::http::BusinessStatus;
use crate::services::{jitter, simulate_latency};

/// Ids above this do not exist.
const MAX_USER_ID: u64 = 100;

pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    tracing::info!("root endpoint accessed");
    let svc = &state.cfg().service;
    Json(json!({
        "service": "Sample Application",
        "version": svc.app_version,
        "environment": svc.environment,
        "endpoints": {
            "health": "/health",
            "ready": "/ready",
            "metrics": "/metrics",
            "api": "/api/*",
        }
    }))
}

pub async fn get_users(State(state): State<AppState>) -> impl IntoResponse {
    simulate_latency(state.cfg().handlers.simulate_latency, 10, 100).await;

    let users = json!([
        { "id": 1, "name": "Alice", "email": "alice@example.com" },
        { "id": 2, "name": "Bob", "email": "bob@example.com" },
        { "id": 3, "name": "Charlie", "email": "charlie@example.com" },
    ]);

    state.metrics().record_business("get_users", BusinessStatus::Success);
    tracing::info!(count = 3, "retrieved users");
    Json(json!({ "users": users, "count": 3 }))
}

/// Plain decimal digits only; ids too large for `u64` saturate (and so do not exist).
fn parse_user_id(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(raw.parse().unwrap_or(u64::MAX))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id =
        parse_user_id(&raw_id).ok_or_else(|| ApiError::not_found("Resource not found"))?;

    simulate_latency(state.cfg().handlers.simulate_latency, 10, 50).await;

    if user_id > MAX_USER_ID {
        state.metrics().record_business("get_user", BusinessStatus::NotFound);
        return Err(ApiError::not_found("User not found"));
    }

    state.metrics().record_business("get_user", BusinessStatus::Success);
    tracing::info!(user_id, "retrieved user");
    Ok(Json(json!({
        "id": user_id,
        "name": format!("User {user_id}"),
        "email": format!("user{user_id}@example.com"),
    })))
}

#[derive(Debug, Deserialize)]
struct CreateUserReq {
    name: String,
    email: String,
}

pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    // Missing body, bad JSON and missing fields all count as validation errors.
    let req: CreateUserReq = match serde_json::from_slice(&body) {
        Ok(r) => r,
        Err(e) => {
            state.metrics().record_business("create_user", BusinessStatus::ValidationError);
            tracing::debug!(error = %e, "create_user rejected");
            return Err(ApiError::bad_request("Invalid input"));
        }
    };

    simulate_latency(state.cfg().handlers.simulate_latency, 50, 150).await;

    let id = jitter(1, 1000);
    state.metrics().record_business("create_user", BusinessStatus::Success);
    tracing::info!(user_id = id, "created user");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "name": req.name, "email": req.email })),
    ))
}

/// `?type=500|404|slow`; any other value panics to exercise the fault path.
pub async fn simulate_error(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ApiError> {
    let kind = params.get("type").map(String::as_str).unwrap_or("generic");
    match kind {
        "500" => {
            state.metrics().record_business("simulate_error", BusinessStatus::Error);
            Err(ApiError::internal())
        }
        "404" => Err(ApiError::not_found("Not found")),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(2)).await;
            Ok(Json(json!({ "message": "Slow response" })))
        }
        _ => panic!("simulated exception"),
    }
}

pub async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
