//! HTTP error mapping for handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Invalid query or form input (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Chart or page rendering failed (500).
    #[error("Internal error: {0}")]
    Internal(String),

    /// No market data for the requested symbol (503).
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl From<sentimeter_core::ValidationError> for AppError {
    fn from(error: sentimeter_core::ValidationError) -> Self {
        Self::BadRequest(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %message, "request failed");
        }

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
