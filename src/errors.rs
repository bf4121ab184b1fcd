use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// A required form field is missing or blank.
    Validation(String),
    /// No usable credential for the selected auth mode.
    Configuration(String),
    /// Network or connectivity failure talking to the upstream service.
    Transport(String),
    /// The upstream service answered with a non-success status.
    Protocol {
        /// HTTP status code returned upstream.
        status: u16,
    },
    /// Bad request error (invalid input to the console API itself).
    BadRequest(String),
    /// Internal server error.
    InternalError(String),
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Transport(msg) => write!(f, "Request failed: {}", msg),
            AppError::Protocol { status } => write!(f, "HTTP {}", status),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Validation and configuration problems are the caller's to fix, so they
    /// surface verbatim. Upstream failures map to 502.
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) | AppError::Configuration(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Transport(msg) => {
                tracing::error!("Upstream transport error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            AppError::Protocol { status } => {
                tracing::warn!("Upstream returned HTTP {}", status);
                StatusCode::BAD_GATEWAY
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response();
            }
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Transport(err.to_string())
    }
}
