//! Error types for the EMS server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    NotAuthorized = 3,
    DbFailure = 4,
    NoSuchEntity = 5,
    BadValue = 6,
    Duplicate = 7,
    InvalidState = 8,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A status transition or business rule refused the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        // 23505 = unique_violation
        if let sqlx::Error::Database(ref db) = e {
            if db.code().as_deref() == Some("23505") {
                let what = db.constraint().unwrap_or("unique constraint");
                return AppError::Conflict(format!("Duplicate value violates {}", what));
            }
        }
        AppError::Database(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
}

impl AppError {
    /// HTTP status and error code for this error
    pub fn status(&self) -> (StatusCode, ErrorCode) {
        match self {
            AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, ErrorCode::NotAuthenticated),
            AppError::Authorization(_) => (StatusCode::FORBIDDEN, ErrorCode::NotAuthorized),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchEntity),
            AppError::Validation(_) | AppError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue)
            }
            AppError::InvalidState(_) => (StatusCode::BAD_REQUEST, ErrorCode::InvalidState),
            AppError::Conflict(_) => (StatusCode::CONFLICT, ErrorCode::Duplicate),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::DbFailure),
            AppError::Io(_) | AppError::Email(_) | AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorCode::Failure)
            }
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::InvalidState(msg)
            | AppError::Email(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Database(e) => e.to_string(),
            AppError::Io(e) => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message: self.message(),
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status().0, StatusCode::NOT_FOUND);
        assert_eq!(AppError::Authorization("x".into()).status().0, StatusCode::FORBIDDEN);
        assert_eq!(AppError::Authentication("x".into()).status().0, StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidState("x".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Conflict("x".into()).status().0, StatusCode::CONFLICT);
        assert_eq!(
            AppError::Internal("boom".into()).status().0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message_is_echoed() {
        let err = AppError::Internal("mail relay refused".into());
        assert_eq!(err.message(), "mail relay refused");
    }

    #[test]
    fn test_row_not_found_is_server_error() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Database(_)));
        assert_eq!(err.status().1, ErrorCode::DbFailure);
    }
}
