//! Unified error handling for the HTTP surface.
//!
//! Every failure is caught at the handler boundary and converted into the
//! JSON envelope `{success: false, message, error}` with the appropriate
//! status code. All route handlers should return `Result<T, AppError>`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the user service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Request body was missing or not valid JSON.
    #[error("invalid request body: {0}")]
    InvalidBody(String),
}

/// JSON body for failed requests.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match &self {
            Self::Repository(err) => match err {
                RepositoryError::Validation(failure) => (
                    StatusCode::BAD_REQUEST,
                    "Validation failed",
                    failure.to_string(),
                ),
                RepositoryError::DuplicateEmail => (
                    StatusCode::BAD_REQUEST,
                    "Email already exists",
                    err.to_string(),
                ),
                RepositoryError::InvalidId(detail) => {
                    (StatusCode::BAD_REQUEST, "Invalid user id", detail.clone())
                }
                RepositoryError::NotFound => {
                    (StatusCode::NOT_FOUND, "User not found", err.to_string())
                }
                RepositoryError::Store(_) | RepositoryError::DataCorruption(_) => {
                    // Log the real cause server-side; never leak it to clients.
                    tracing::error!(error = %err, "store failure while handling request");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "Something went wrong",
                        "Internal server error".to_owned(),
                    )
                }
            },
            Self::InvalidBody(detail) => (
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                detail.clone(),
            ),
        };

        let body = ErrorBody {
            success: false,
            message: message.to_owned(),
            error: detail,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
