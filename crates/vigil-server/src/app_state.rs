//! Shared application state for the vigil service.
//!
//! Owns the metric registry for the life of the process. Construction
//! registers every metric family, so a bad definition fails startup instead
//! of the first request.

use std::sync::Arc;

use vigil_core::error::Result;
use vigil_core::metrics::Registry;

use crate::config::ServiceConfig;
use crate::obs::http::HttpMetrics;
use crate::readiness::{Readiness, ReadinessCheck, StaticCheck};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    registry: Arc<Registry>,
    metrics: HttpMetrics,
    readiness: Readiness,
}

impl AppState {
    /// Build application state with the readiness checks named in config.
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        let checks: Vec<Arc<dyn ReadinessCheck>> = cfg
            .readiness
            .checks
            .iter()
            .map(|name| Arc::new(StaticCheck::new(name.clone(), true)) as Arc<dyn ReadinessCheck>)
            .collect();
        Self::with_checks(cfg, checks)
    }

    /// Build application state with explicit readiness checks.
    pub fn with_checks(cfg: ServiceConfig, checks: Vec<Arc<dyn ReadinessCheck>>) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let metrics = HttpMetrics::register(&registry, &cfg.metrics.duration_buckets)?;
        metrics.set_app_info(&cfg.service.app_version, &cfg.service.environment)?;

        tracing::info!(
            version = %cfg.service.app_version,
            environment = %cfg.service.environment,
            checks = checks.len(),
            "application state ready"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                metrics,
                readiness: Readiness::new(checks),
            }),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(&self.inner.registry)
    }

    pub fn metrics(&self) -> &HttpMetrics {
        &self.inner.metrics
    }

    pub fn readiness(&self) -> &Readiness {
        &self.inner.readiness
    }

    pub fn set_draining(&self) {
        self.inner.readiness.set_draining();
    }

    pub fn is_draining(&self) -> bool {
        self.inner.readiness.is_draining()
    }
}
