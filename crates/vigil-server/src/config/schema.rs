use std::net::SocketAddr;

use serde::Deserialize;
use vigil_core::error::{Result, VigilError};

use crate::obs::http::DEFAULT_DURATION_BUCKETS;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    pub version: u32,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub handlers: HandlersSection,

    #[serde(default)]
    pub readiness: ReadinessSection,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            version: 1,
            service: ServiceSection::default(),
            metrics: MetricsSection::default(),
            handlers: HandlersSection::default(),
            readiness: ReadinessSection::default(),
        }
    }
}

impl ServiceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(VigilError::BadRequest(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.service.validate()?;
        self.metrics.validate()?;

        Ok(())
    }

    /// Apply `APP_VERSION`, `ENVIRONMENT` and `PORT` overrides from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("APP_VERSION").filter(|v| !v.is_empty()) {
            self.service.app_version = v;
        }
        if let Some(v) = lookup("ENVIRONMENT").filter(|v| !v.is_empty()) {
            self.service.environment = v;
        }
        if let Some(v) = lookup("PORT").filter(|v| !v.is_empty()) {
            self.service.port = v
                .parse()
                .map_err(|e| VigilError::BadRequest(format!("PORT must be a port number ({v}): {e}")))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_app_version")]
    pub app_version: String,

    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_version: default_app_version(),
            environment: default_environment(),
        }
    }
}

impl ServiceSection {
    pub fn validate(&self) -> Result<()> {
        if self.app_version.trim().is_empty() {
            return Err(VigilError::BadRequest("service.app_version must not be empty".into()));
        }
        if self.environment.trim().is_empty() {
            return Err(VigilError::BadRequest("service.environment must not be empty".into()));
        }
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| VigilError::BadRequest(format!("service.host is not a valid address: {e}")))
    }
}

fn default_host() -> String {
    "0.0.0.0".into()
}
fn default_port() -> u16 {
    8080
}
fn default_app_version() -> String {
    "1.0.0".into()
}
fn default_environment() -> String {
    "development".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Upper bounds (seconds) of `http_request_duration_seconds`.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            duration_buckets: default_duration_buckets(),
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if self.duration_buckets.is_empty() {
            return Err(VigilError::BadRequest(
                "metrics.duration_buckets must not be empty".into(),
            ));
        }
        Ok(())
    }
}

fn default_duration_buckets() -> Vec<f64> {
    DEFAULT_DURATION_BUCKETS.to_vec()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlersSection {
    /// Sleep a random few milliseconds in user endpoints, like a real backend.
    #[serde(default = "default_true")]
    pub simulate_latency: bool,
}

impl Default for HandlersSection {
    fn default() -> Self {
        Self {
            simulate_latency: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadinessSection {
    /// Names of simulated dependency checks reported by `/ready`.
    #[serde(default = "default_checks")]
    pub checks: Vec<String>,
}

impl Default for ReadinessSection {
    fn default() -> Self {
        Self {
            checks: default_checks(),
        }
    }
}

fn default_checks() -> Vec<String> {
    vec!["database".into()]
}
