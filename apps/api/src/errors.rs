use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::prompts::ValidationFailure;
use crate::analysis::report::ReportViolation;
use crate::analysis::service::ServiceFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Provider, extraction or report-shape failure. The message reaches the caller.
    #[error("Analysis error: {0}")]
    Analysis(String),
}

impl From<ValidationFailure> for AppError {
    fn from(e: ValidationFailure) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<ServiceFailure> for AppError {
    fn from(e: ServiceFailure) -> Self {
        match e {
            ServiceFailure::UnsupportedProvider(_) | ServiceFailure::Validation(_) => {
                AppError::Validation(e.to_string())
            }
            ServiceFailure::Provider(_) | ServiceFailure::Extraction => {
                AppError::Analysis(e.to_string())
            }
        }
    }
}

impl From<ReportViolation> for AppError {
    fn from(e: ReportViolation) -> Self {
        AppError::Analysis(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Analysis(msg) => {
                tracing::warn!("Analysis error: {msg}");
                (StatusCode::BAD_GATEWAY, "ANALYSIS_ERROR", msg.clone())
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
