//! Shared error type across vigil crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed request.
    BadRequest,
    /// Requested resource does not exist.
    NotFound,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VigilError>;

/// Unified error type used by the metrics core and the server.
#[derive(Debug, Error)]
pub enum VigilError {
    #[error("metric already registered: {0}")]
    DuplicateMetric(String),
    #[error("label mismatch on {metric}: expected {expected:?}, got {got:?}")]
    LabelMismatch {
        metric: String,
        expected: Vec<String>,
        got: Vec<String>,
    },
    #[error("counter {metric} cannot be incremented by {delta}")]
    NegativeDelta { metric: String, delta: f64 },
    #[error("invalid metric definition: {0}")]
    InvalidMetric(String),
    #[error("metrics serialization failed: {0}")]
    Serialization(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl VigilError {
    /// Map internal error to a stable client-facing code.
    ///
    /// Metric errors are programmer or registry faults, never caused by the
    /// caller's request, so they all surface as `Internal`.
    pub fn client_code(&self) -> ClientCode {
        match self {
            VigilError::BadRequest(_) => ClientCode::BadRequest,
            VigilError::NotFound(_) => ClientCode::NotFound,
            VigilError::DuplicateMetric(_)
            | VigilError::LabelMismatch { .. }
            | VigilError::NegativeDelta { .. }
            | VigilError::InvalidMetric(_)
            | VigilError::Serialization(_)
            | VigilError::Internal(_) => ClientCode::Internal,
        }
    }
}
