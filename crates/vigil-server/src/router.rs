//! Axum router wiring.
//!
//! `ROUTES` names every (method, path) pair; the request middleware uses these
//! names as the `endpoint` label so series stay stable when ids vary.

use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::{app_state::AppState, obs, ops, services::users};

/// (method, route pattern, endpoint name)
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/", "index"),
    ("GET", "/health", "health"),
    ("GET", "/ready", "ready"),
    ("GET", "/metrics", "metrics"),
    ("GET", "/api/users", "get_users"),
    ("POST", "/api/users", "create_user"),
    ("GET", "/api/users/:user_id", "get_user"),
    ("GET", "/api/simulate-error", "simulate_error"),
];

/// Endpoint name for a matched route pattern, if the method is routed there.
///
/// `get()` routes also answer `HEAD`, so `HEAD` shares the `GET` name.
pub fn endpoint_name(method: &str, matched_path: &str) -> Option<&'static str> {
    let method = if method == "HEAD" { "GET" } else { method };
    ROUTES
        .iter()
        .find(|(m, p, _)| *m == method && *p == matched_path)
        .map(|(_, _, name)| *name)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(users::index))
        .route("/health", get(ops::health))
        .route("/ready", get(ops::ready))
        .route("/metrics", get(ops::metrics))
        .route("/api/users", get(users::get_users).post(users::create_user))
        .route("/api/users/:user_id", get(users::get_user))
        .route("/api/simulate-error", get(users::simulate_error))
        .fallback(users::not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::middleware::track_requests,
        ))
        .with_state(state)
}
