//! Unified error handling for the account layer.
//!
//! Business rejections (`AlreadyExists`, `InvalidCredential`, `InvalidToken`)
//! are kept apart from storage faults so the HTTP adapter can map them to
//! client errors while faults become opaque 500s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Business rejections
    #[error("{0} already exists")]
    AlreadyExists(String),

    #[error("Invalid username or password")]
    InvalidCredential,

    #[error("Invalid or revoked token")]
    InvalidToken,

    /// Store-level lookup miss; never surfaced by the account service
    #[error("Resource not found")]
    NotFound,

    // Boundary
    #[error("Invalid input: {0}")]
    BadRequest(String),

    // Storage faults
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body for HTTP
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::AlreadyExists(_) => "ALREADY_EXISTS",
            AppError::InvalidCredential => "INVALID_CREDENTIAL",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::NotFound => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::InvalidCredential | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),

            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A storage error occurred".to_string()
            }
            #[cfg(feature = "cache")]
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                "A storage error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// HTTP Response (Axum)
// =============================================================================

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn already_exists(entity: impl Into<String>) -> Self {
        AppError::AlreadyExists(entity.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_business_rejections_map_to_client_statuses() {
        assert_eq!(AppError::already_exists("User").status(), StatusCode::CONFLICT);
        assert_eq!(AppError::InvalidCredential.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::bad_request("x").status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_message_is_hidden() {
        let err = AppError::internal("disk on fire");

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.user_message(), "An internal error occurred");
    }

    #[test]
    fn test_domain_internal_is_internal() {
        let err: AppError = DomainError::internal("hash failed").into();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_conflict_message() {
        assert_eq!(
            AppError::already_exists("User").user_message(),
            "User already exists"
        );
    }
}
