//! vigil core: transport-agnostic metric primitives and the shared error type.
//!
//! This crate defines the metric registry, the labeled instruments recorded by
//! the HTTP service, and the Prometheus text encoder used by `/metrics`. It
//! carries no HTTP or runtime dependencies so instruments can be exercised from
//! plain threads as well as from the async server.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Instrument writes happen on every request path, so every fallible step
//! surfaces as `VigilError`/`Result` and the caller decides whether to log it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{Result, VigilError};
