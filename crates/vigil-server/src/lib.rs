//! vigil HTTP service library entry.
//!
//! This crate wires configuration, the metric registry, the request
//! instrumentation middleware, probes and the business endpoints into one axum
//! router. It is consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod http_error;
pub mod obs;
pub mod ops;
pub mod readiness;
pub mod router;
pub mod services;
