//! Branchtale — API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use branchtale_core::error::DomainError;
use branchtale_core::presentation::SurfaceHandle;
use serde::Serialize;
use thiserror::Error;

/// Startup and runtime errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// An environment variable is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The adventure content could not be loaded.
    #[error("content error: {0}")]
    Content(#[from] DomainError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain error raised while handling the request.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The addressed surface does not exist on the board.
    #[error("surface {0} not found")]
    SurfaceNotFound(SurfaceHandle),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self {
            Self::SurfaceNotFound(_) => (StatusCode::NOT_FOUND, "surface_not_found"),
            Self::Domain(DomainError::GameNotFound(_)) => {
                (StatusCode::NOT_FOUND, "game_not_found")
            }
            Self::Domain(DomainError::Validation(_)) => {
                (StatusCode::BAD_REQUEST, "validation_error")
            }
            Self::Domain(DomainError::InvalidChoice(_)) => (StatusCode::CONFLICT, "invalid_choice"),
            Self::Domain(DomainError::Presentation(_)) => {
                (StatusCode::BAD_GATEWAY, "presentation_error")
            }
            Self::Domain(DomainError::Infrastructure(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        let body = ErrorBody {
            error: error_code,
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
