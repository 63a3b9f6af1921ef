//! Account Error Types
//!
//! This module provides account-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::bearer::BearerError;
use platform::password::{PasswordHashError, PasswordPolicyError};
use thiserror::Error;

/// Account-specific result type alias
pub type AccountResult<T> = Result<T, AccountError>;

/// Account-specific error variants
#[derive(Debug, Error)]
pub enum AccountError {
    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized(#[from] BearerError),

    /// Malformed request body
    #[error("{0}")]
    InvalidRequest(String),

    /// New password rejected by policy
    #[error(transparent)]
    PasswordPolicy(#[from] PasswordPolicyError),

    /// Hashing failed
    #[error("Password hashing failed")]
    PasswordHash(#[from] PasswordHashError),

    /// No credential row for the caller
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::Unauthorized(_) => ErrorKind::Unauthorized,
            AccountError::InvalidRequest(_) => ErrorKind::BadRequest,
            AccountError::PasswordPolicy(_) => ErrorKind::UnprocessableEntity,
            AccountError::UserNotFound => ErrorKind::NotFound,
            AccountError::Database(e) => classify_sqlx(e).0,
            AccountError::PasswordHash(_) | AccountError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AccountError::Database(_) | AccountError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        AppError::new(self.kind(), message)
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountError::Database(e) => {
                tracing::error!(error = %e, "Account database error");
            }
            AccountError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing error");
            }
            AccountError::Internal(msg) => {
                tracing::error!(message = %msg, "Account internal error");
            }
            AccountError::Unauthorized(e) => {
                tracing::warn!(error = %e, "Unauthenticated account request");
            }
            _ => {
                tracing::debug!(error = %self, "Account error");
            }
        }
    }
}

impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        err.to_app_error()
    }
}

impl From<JsonRejection> for AccountError {
    fn from(rejection: JsonRejection) -> Self {
        AccountError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
