//! Error types for the simulation API.
//!
//! [`ApiError`] maps every failure mode onto an HTTP status and a JSON
//! body of the form `{"error": "...", "status": 400}` via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use populace_engine::EngineError;
use tracing::error;
use validator::ValidationErrors;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body was malformed or failed validation.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The language-model provider failed or timed out.
    #[error("upstream model error: {0}")]
    Upstream(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status for this error.
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        if err.is_caller_error() {
            Self::BadRequest(err.to_string())
        } else if err.is_upstream_error() {
            Self::Upstream(err.to_string())
        } else {
            Self::Internal(err.to_string())
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::BadRequest(errors.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::BadRequest(msg) | Self::Upstream(msg) | Self::Internal(msg) => msg.clone(),
        };
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
