//! Shared router test helpers.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use vigil_server::app_state::AppState;
use vigil_server::config::ServiceConfig;
use vigil_server::readiness::ReadinessCheck;
use vigil_server::router::build_router;

/// Default config with simulated latency off.
pub fn fast_config() -> ServiceConfig {
    let mut cfg = ServiceConfig::default();
    cfg.handlers.simulate_latency = false;
    cfg
}

pub fn app() -> (AppState, Router) {
    let state = AppState::new(fast_config()).expect("state");
    let router = build_router(state.clone());
    (state, router)
}

pub fn app_with_checks(checks: Vec<Arc<dyn ReadinessCheck>>) -> (AppState, Router) {
    let state = AppState::with_checks(fast_config(), checks).expect("state");
    let router = build_router(state.clone());
    (state, router)
}

pub struct Reply {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("json body")
    }
}

pub async fn send(router: &Router, method: Method, uri: &str, body: Option<&str>) -> Reply {
    let mut req = Request::builder().method(method).uri(uri);
    if body.is_some() {
        req = req.header("content-type", "application/json");
    }
    let req = req
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();

    let res = router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let content_type = res
        .headers()
        .get("content-type")
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    Reply {
        status,
        content_type,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

pub async fn get(router: &Router, uri: &str) -> Reply {
    send(router, Method::GET, uri, None).await
}

pub fn active_requests(state: &AppState) -> f64 {
    state
        .metrics()
        .requests_active
        .value(&[])
        .unwrap()
        .unwrap_or(0.0)
}

pub fn request_count(state: &AppState, method: &str, endpoint: &str, status: &str) -> f64 {
    state
        .metrics()
        .requests_total
        .value(&[("method", method), ("endpoint", endpoint), ("status", status)])
        .unwrap()
        .unwrap_or(0.0)
}

pub fn business_count(state: &AppState, operation: &str, status: &str) -> f64 {
    state
        .metrics()
        .business_operations
        .value(&[("operation", operation), ("status", status)])
        .unwrap()
        .unwrap_or(0.0)
}
