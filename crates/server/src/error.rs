//! Unified error handling with Sentry integration.
//!
//! Domain outcomes (validation, not-found, authentication) are part of each
//! RPC's response body and never reach this type. `AppError` covers the
//! transport-level failures: it captures the error to Sentry and answers
//! with a generic 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::services::DirectoryError;

/// Application-level error type for the directory server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A directory call failed in a way the route does not model.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// The blocking worker running a directory call panicked or was cancelled.
    #[error("Worker error: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let event_id = sentry::capture_error(&self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Request error"
        );

        // Don't expose internal error details to clients
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Directory(DirectoryError::Credential("bad params".to_string()));
        assert_eq!(
            err.to_string(),
            "Directory error: password hashing error: bad params"
        );
    }

    #[test]
    fn test_app_error_is_opaque_500() {
        let response =
            AppError::Directory(DirectoryError::Internal("duplicate".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
