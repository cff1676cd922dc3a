//! Readiness checks behind `/ready`.
//!
//! Liveness (`/health`) never consults these. Readiness is 200 only when every
//! check passes and the process is not draining.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use vigil_core::error::Result;

/// A dependency probe.
#[async_trait]
pub trait ReadinessCheck: Send + Sync {
    fn name(&self) -> &str;
    /// `Ok(false)`: dependency reachable but not usable. `Err`: the probe itself failed.
    async fn check(&self) -> Result<bool>;
}

/// Fixed-result check, standing in for a real dependency probe.
pub struct StaticCheck {
    name: String,
    ready: bool,
}

impl StaticCheck {
    pub fn new(name: impl Into<String>, ready: bool) -> Self {
        Self {
            name: name.into(),
            ready,
        }
    }
}

#[async_trait]
impl ReadinessCheck for StaticCheck {
    fn name(&self) -> &str {
        &self.name
    }

    async fn check(&self) -> Result<bool> {
        Ok(self.ready)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadinessReport {
    Ready(BTreeMap<String, &'static str>),
    NotReady(BTreeMap<String, &'static str>),
    Draining,
    Failed(String),
}

impl ReadinessReport {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReadinessReport::Ready(_))
    }
}

#[derive(Default)]
pub struct Readiness {
    checks: Vec<Arc<dyn ReadinessCheck>>,
    draining: AtomicBool,
}

impl Readiness {
    pub fn new(checks: Vec<Arc<dyn ReadinessCheck>>) -> Self {
        Self {
            checks,
            draining: AtomicBool::new(false),
        }
    }

    /// Mark draining state.
    pub fn set_draining(&self) {
        self.draining.store(true, Ordering::Relaxed);
    }

    /// Return whether draining is active.
    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::Relaxed)
    }

    /// Run every check in order; the first probe error aborts the evaluation.
    pub async fn evaluate(&self) -> ReadinessReport {
        if self.is_draining() {
            return ReadinessReport::Draining;
        }

        let mut results = BTreeMap::new();
        let mut all_ok = true;
        for c in &self.checks {
            match c.check().await {
                Ok(ok) => {
                    all_ok &= ok;
                    results.insert(c.name().to_string(), if ok { "ok" } else { "failing" });
                }
                Err(e) => {
                    tracing::error!(check = c.name(), error = %e, "readiness check failed");
                    return ReadinessReport::Failed(format!("{}: {e}", c.name()));
                }
            }
        }

        if all_ok {
            ReadinessReport::Ready(results)
        } else {
            ReadinessReport::NotReady(results)
        }
    }
}
