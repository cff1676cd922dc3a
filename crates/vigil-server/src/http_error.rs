//! JSON error responses for handlers.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use vigil_core::error::{ClientCode, VigilError};

/// Handler error; renders as `{"error": "..."}` with a status from the client code.
#[derive(Debug)]
pub struct ApiError(pub VigilError);

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(VigilError::BadRequest(msg.into()))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self(VigilError::NotFound(msg.into()))
    }

    pub fn internal() -> Self {
        Self(VigilError::Internal("Internal server error".into()))
    }

    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show callers. Internal details stay in the logs.
    pub fn public_message(&self) -> &str {
        match &self.0 {
            VigilError::BadRequest(m) | VigilError::NotFound(m) => m,
            _ => "Internal server error",
        }
    }
}

impl From<VigilError> for ApiError {
    fn from(e: VigilError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        (self.status(), Json(json!({ "error": self.public_message() }))).into_response()
    }
}
