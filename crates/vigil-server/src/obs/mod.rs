//! Request-level observability.
//!
//! `http` names the instruments the service exports; `middleware` records them
//! around every request.

pub mod http;
pub mod middleware;
