//! Error types for pleadingd

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pleading_core::DocumentError;
use serde::Serialize;
use thiserror::Error;

use crate::render::RenderError;

/// Daemon-level errors
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Server startup error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for DaemonError {
    fn from(err: config::ConfigError) -> Self {
        DaemonError::Config(err.to_string())
    }
}

/// API-specific errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request or missing required field
    #[error("{0}")]
    BadRequest(String),

    /// Internal error
    #[error("{0}")]
    Internal(String),

    /// Template rendering failed
    #[error("Template error: {0}")]
    Render(#[from] RenderError),

    /// Document store failure
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Document(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) | ApiError::Render(_) | ApiError::Document(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Result type alias for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::BadRequest("Folder path required".to_string())
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );

        assert_eq!(
            ApiError::Internal("boom".to_string()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );

        assert_eq!(
            ApiError::Document(DocumentError::EmptyContent)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_filesystem_failure_is_server_error() {
        let err = ApiError::Document(DocumentError::Write {
            path: "/tmp/x.html".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bad_request_message_is_bare() {
        assert_eq!(
            ApiError::BadRequest("Case folder required".into()).to_string(),
            "Case folder required"
        );
    }
}
