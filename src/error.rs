// ABOUTME: Centralized error handling system with detailed context and logging
// ABOUTME: Provides structured errors without exposing server-side details to clients

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    /// Absent and owned-by-someone-else are deliberately the same condition.
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Upload failed: {0}")]
    UploadFailed(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::UploadFailed(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::Database(_) => {
                tracing::error!("Database error: {}", self);
                "Database operation failed".to_string()
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized access: {}", msg);
                "Unauthorized".to_string()
            }
            AppError::NotFound(msg) => {
                tracing::info!("Resource not found: {}", msg);
                msg.clone()
            }
            AppError::Conflict(msg) | AppError::Validation(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                msg.clone()
            }
            AppError::PayloadTooLarge(msg) | AppError::UnsupportedMediaType(msg) => {
                tracing::warn!("Rejected body: {}", msg);
                msg.clone()
            }
            AppError::UploadFailed(_) => {
                tracing::error!("Object storage error: {}", self);
                "Failed to upload document".to_string()
            }
            AppError::Internal(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Maps a unique-index violation to a Conflict naming the offending column,
/// leaving every other database error untouched.
pub fn conflict_or_db(err: DbErr, subject: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(format!(
            "A {} with this {} already exists.",
            subject,
            conflicting_field(&detail)
        )),
        _ => AppError::Database(err),
    }
}

/// Pulls the column out of a driver message such as
/// `UNIQUE constraint failed: clients.user_id, clients.email`.
/// The owner column is skipped so the caller sees the field they supplied.
pub fn conflicting_field(detail: &str) -> &str {
    detail
        .rsplit([',', ' '])
        .filter_map(|part| part.trim().rsplit('.').next())
        .find(|col| !col.is_empty() && *col != "user_id")
        .unwrap_or("field")
}

pub type Result<T> = std::result::Result<T, AppError>;
