//! Service config loader (strict parsing, then environment overrides).

pub mod schema;

use std::fs;

use vigil_core::error::{Result, VigilError};

pub use schema::{HandlersSection, MetricsSection, ReadinessSection, ServiceConfig, ServiceSection};

pub fn load_from_file(path: &str) -> Result<ServiceConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| VigilError::Internal(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ServiceConfig> {
    let cfg: ServiceConfig = serde_yaml::from_str(s)
        .map_err(|e| VigilError::BadRequest(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// File (if any) or defaults, then `APP_VERSION` / `ENVIRONMENT` / `PORT` from `lookup`.
pub fn load<F>(path: Option<&str>, lookup: F) -> Result<ServiceConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = match path {
        Some(p) => load_from_file(p)?,
        None => ServiceConfig::default(),
    };
    cfg.apply_env(lookup)?;
    cfg.validate()?;
    Ok(cfg)
}
