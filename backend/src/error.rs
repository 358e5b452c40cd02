//! Error handling for the profit ledger server
//!
//! Maps engine and infrastructure failures onto consistent JSON error bodies

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::LedgerError;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Engine errors
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    // Request errors
    #[error("Missing or invalid tenant: {0}")]
    MissingTenant(String),

    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap a collaborator failure as `Unavailable`
    pub fn unavailable(collaborator: &str, source: impl std::fmt::Display) -> Self {
        AppError::Ledger(LedgerError::Unavailable(format!(
            "{} unreachable: {}",
            collaborator, source
        )))
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Ledger(err) => {
                let status = match err {
                    LedgerError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
                    LedgerError::Unresolvable(_) => StatusCode::UNPROCESSABLE_ENTITY,
                    LedgerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                };
                let (message, field) = match err {
                    LedgerError::InvalidInput { field, message } => {
                        (message.clone(), Some(field.clone()))
                    }
                    other => (other.to_string(), None),
                };
                (
                    status,
                    ErrorDetail {
                        code: err.code().to_string(),
                        message,
                        field,
                    },
                )
            }
            AppError::MissingTenant(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "MISSING_TENANT".to_string(),
                    message: msg.clone(),
                    field: Some("x-tenant-id".to_string()),
                },
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{} not found", resource),
                    field: None,
                },
            ),
            AppError::Configuration(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "CONFIGURATION_ERROR".to_string(),
                    message: format!("Configuration error: {}", msg),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message: "A database error occurred".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: msg.clone(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
