//! Request instrumentation middleware.
//!
//! Installed with `Router::layer`, so it wraps every route, the 404 fallback
//! and method mismatches. Per request:
//! - pre: read the clock, check out an in-flight slot (gauge +1)
//! - run the handler; a panic is turned into a 500 response
//! - post: release the slot (gauge -1), then record duration and count
//!
//! The slot is released by `Drop`, so a cancelled request future (client gone,
//! transport timeout) still decrements exactly once. Recording is best-effort:
//! failures are logged and the response goes out unchanged.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::FutureExt;
use vigil_core::metrics::{Gauge, GaugeSeries};

use crate::app_state::AppState;
use crate::http_error::ApiError;
use crate::obs::http::RequestLabels;
use crate::router;

/// One checked-out slot of the active-requests gauge.
pub struct InFlight {
    series: GaugeSeries,
}

impl InFlight {
    /// Increment `gauge` and hold the slot until drop.
    ///
    /// Returns `None` (after logging) if the gauge cannot be written; then
    /// nothing is checked out and nothing will be released.
    pub fn enter(gauge: &Gauge) -> Option<Self> {
        match gauge.series(&[]) {
            Ok(series) => {
                series.inc();
                Some(Self { series })
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to increment active requests gauge");
                None
            }
        }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.series.dec();
    }
}

fn non_empty_or_unknown(s: &str) -> &str {
    if s.is_empty() {
        "unknown"
    } else {
        s
    }
}

/// Resolve `method`, `endpoint` and `status` labels.
///
/// `endpoint` is the route name for (method, matched path), else the matched
/// route pattern, else the raw path, else `"unknown"`. Only unrouted requests
/// reach the raw path.
pub fn resolve_labels(
    method: &str,
    matched_path: Option<&str>,
    raw_path: &str,
    status: StatusCode,
) -> RequestLabels {
    let endpoint = match matched_path {
        Some(p) => router::endpoint_name(method, p).unwrap_or(p),
        None => non_empty_or_unknown(raw_path),
    };

    RequestLabels {
        method: non_empty_or_unknown(method).to_string(),
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let metrics = state.metrics();
    let in_flight = InFlight::enter(&metrics.requests_active);

    let method = req.method().as_str().to_string();
    let raw_path = req.uri().path().to_string();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let response = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => {
            tracing::error!(
                %method,
                path = %raw_path,
                panic = panic_message(payload.as_ref()),
                "handler panicked"
            );
            ApiError::internal().into_response()
        }
    };

    drop(in_flight);

    let labels = resolve_labels(&method, matched_path.as_deref(), &raw_path, response.status());
    if let Err(e) = metrics.record_request(&labels, start.elapsed()) {
        tracing::warn!(
            method = %labels.method,
            endpoint = %labels.endpoint,
            status = labels.status,
            error = %e,
            "failed to record request metrics"
        );
    }

    response
}
