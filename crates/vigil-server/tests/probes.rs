//! Liveness and readiness probes.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

mod helpers;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use vigil_core::error::{Result, VigilError};
use vigil_server::readiness::{ReadinessCheck, StaticCheck};

use helpers::{app, app_with_checks, get, request_count};

struct BrokenProbe;

#[async_trait]
impl ReadinessCheck for BrokenProbe {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> Result<bool> {
        Err(VigilError::Internal("connection refused".into()))
    }
}

#[tokio::test]
async fn health_reports_version() {
    let (state, router) = app();
    let reply = get(&router, "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], "1.0.0");
    assert_eq!(request_count(&state, "GET", "health", "200"), 1.0);
}

#[tokio::test]
async fn ready_lists_passing_checks() {
    let (_state, router) = app();
    let reply = get(&router, "/ready").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["database"], "ok");
}

#[tokio::test]
async fn health_stays_up_while_not_ready() {
    let (state, router) = app_with_checks(vec![
        Arc::new(StaticCheck::new("database", true)),
        Arc::new(StaticCheck::new("queue", false)),
    ]);

    let ready = get(&router, "/ready").await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = ready.json();
    assert_eq!(body["status"], "not ready");
    assert_eq!(body["checks"]["queue"], "failing");

    assert_eq!(get(&router, "/health").await.status, StatusCode::OK);
    assert_eq!(request_count(&state, "GET", "ready", "503"), 1.0);
}

#[tokio::test]
async fn probe_error_reports_error_status() {
    let (_state, router) = app_with_checks(vec![Arc::new(BrokenProbe)]);

    let ready = get(&router, "/ready").await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    let body = ready.json();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn draining_makes_service_not_ready() {
    let (state, router) = app();
    state.set_draining();

    let ready = get(&router, "/ready").await;
    assert_eq!(ready.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(ready.json()["reason"], "draining");
    assert_eq!(get(&router, "/health").await.status, StatusCode::OK);
}
