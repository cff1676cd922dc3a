//! Instruments exported by the service.
//!
//! Names and label schemas are part of the scrape contract; dashboards and
//! alerts depend on them.

use std::time::Duration;

use vigil_core::error::Result;
use vigil_core::metrics::{Counter, Gauge, Histogram, Registry};

/// Default `http_request_duration_seconds` bounds, in seconds.
pub const DEFAULT_DURATION_BUCKETS: [f64; 14] = [
    0.005, 0.01, 0.025, 0.05, 0.075, 0.1, 0.25, 0.5, 0.75, 1.0, 2.5, 5.0, 7.5, 10.0,
];

/// Outcome vocabulary for `business_operations_total{status}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessStatus {
    Success,
    Error,
    NotFound,
    ValidationError,
}

impl BusinessStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            BusinessStatus::Success => "success",
            BusinessStatus::Error => "error",
            BusinessStatus::NotFound => "not_found",
            BusinessStatus::ValidationError => "validation_error",
        }
    }
}

/// Resolved labels of one finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLabels {
    pub method: String,
    pub endpoint: String,
    pub status: u16,
}

#[derive(Clone)]
pub struct HttpMetrics {
    pub requests_total: Counter,
    pub request_duration: Histogram,
    pub requests_active: Gauge,
    pub business_operations: Counter,
    pub app_info: Gauge,
}

impl HttpMetrics {
    /// Register every service family. Fails on duplicates or bad buckets.
    pub fn register(registry: &Registry, duration_buckets: &[f64]) -> Result<Self> {
        Ok(Self {
            requests_total: registry.counter(
                "http_requests_total",
                "Total HTTP requests",
                &["method", "endpoint", "status"],
            )?,
            request_duration: registry.histogram(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "endpoint"],
                duration_buckets,
            )?,
            requests_active: registry.gauge(
                "http_requests_active",
                "Number of active HTTP requests",
                &[],
            )?,
            business_operations: registry.counter(
                "business_operations_total",
                "Total business operations",
                &["operation", "status"],
            )?,
            app_info: registry.gauge(
                "app_info",
                "Application information",
                &["version", "environment"],
            )?,
        })
    }

    pub fn set_app_info(&self, version: &str, environment: &str) -> Result<()> {
        self.app_info
            .set(&[("version", version), ("environment", environment)], 1.0)
    }

    /// Record duration and count of one finished request.
    pub fn record_request(&self, labels: &RequestLabels, elapsed: Duration) -> Result<()> {
        let method = labels.method.as_str();
        let endpoint = labels.endpoint.as_str();
        let status = labels.status.to_string();

        self.request_duration.observe(
            &[("method", method), ("endpoint", endpoint)],
            elapsed.as_secs_f64(),
        )?;
        self.requests_total.inc(
            &[("method", method), ("endpoint", endpoint), ("status", status.as_str())],
            1.0,
        )
    }

    /// Count a business outcome. Best-effort: failures are logged, never returned.
    pub fn record_business(&self, operation: &str, status: BusinessStatus) {
        if let Err(e) = self.business_operations.inc(
            &[("operation", operation), ("status", status.as_str())],
            1.0,
        ) {
            tracing::warn!(operation, status = status.as_str(), error = %e, "failed to record business operation");
        }
    }
}
