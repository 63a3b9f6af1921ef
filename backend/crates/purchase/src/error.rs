//! Purchase Error Types
//!
//! This module provides purchase-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::ChapterId;
use platform::bearer::BearerError;
use thiserror::Error;

use crate::domain::gateway::GatewayError;
use crate::domain::value_objects::Money;

/// Purchase-specific result type alias
pub type PurchaseResult<T> = Result<T, PurchaseError>;

/// Purchase-specific error variants
///
/// Every variant renders as the same flat `{ error }` body; the kind only
/// drives logging.
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// Missing or invalid bearer token
    #[error("Unauthorized")]
    Unauthorized(#[from] BearerError),

    /// Malformed request body or parameters
    #[error("{0}")]
    InvalidRequest(String),

    /// One or more requested chapters do not exist
    #[error("Chapter not found")]
    ChapterNotFound(Vec<ChapterId>),

    /// A chapter belongs to a different book than the one in the request
    #[error("Chapter does not belong to the requested book")]
    ChapterNotInBook(ChapterId),

    /// Claimed amount differs from the server-side total
    #[error("Amount mismatch: expected {expected}, got {actual}")]
    AmountMismatch { expected: Money, actual: Money },

    /// At least one chapter already has a completed purchase
    #[error("Chapter already purchased")]
    AlreadyOwned(Vec<ChapterId>),

    /// Gateway order creation failed (detail is logged only)
    #[error("Failed to create payment order")]
    Gateway(#[from] GatewayError),

    /// Gateway signature did not match
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// No purchase rows match the verified order
    #[error("Purchase not found")]
    PurchaseNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PurchaseError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            PurchaseError::Unauthorized(_) => ErrorKind::Unauthorized,
            PurchaseError::InvalidRequest(_)
            | PurchaseError::ChapterNotInBook(_)
            | PurchaseError::AmountMismatch { .. }
            | PurchaseError::InvalidSignature => ErrorKind::BadRequest,
            PurchaseError::ChapterNotFound(_) | PurchaseError::PurchaseNotFound => {
                ErrorKind::NotFound
            }
            PurchaseError::AlreadyOwned(_) => ErrorKind::Conflict,
            PurchaseError::Gateway(_) => ErrorKind::BadGateway,
            PurchaseError::Database(e) => classify_sqlx(e).0,
            PurchaseError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to the unified error without consuming `self`
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            // Never leak SQL or driver text to the client
            PurchaseError::Database(_) | PurchaseError::Internal(_) => {
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let app_err = AppError::new(self.kind(), message);
        match self {
            PurchaseError::AlreadyOwned(_) => app_err.with_detail("alreadyOwned", true),
            _ => app_err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            PurchaseError::Database(e) => {
                tracing::error!(error = %e, "Purchase database error");
            }
            PurchaseError::Gateway(e) => {
                tracing::error!(error = %e, "Payment gateway error");
            }
            PurchaseError::Internal(msg) => {
                tracing::error!(message = %msg, "Purchase internal error");
            }
            PurchaseError::InvalidSignature => {
                tracing::warn!("Payment signature mismatch");
            }
            PurchaseError::AmountMismatch { expected, actual } => {
                tracing::warn!(%expected, %actual, "Order amount mismatch");
            }
            PurchaseError::AlreadyOwned(ids) => {
                tracing::info!(chapter_count = ids.len(), "Order for owned chapter rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Purchase error");
            }
        }
    }
}

impl From<PurchaseError> for AppError {
    fn from(err: PurchaseError) -> Self {
        err.to_app_error()
    }
}

impl From<JsonRejection> for PurchaseError {
    fn from(rejection: JsonRejection) -> Self {
        PurchaseError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for PurchaseError {
    fn from(rejection: PathRejection) -> Self {
        PurchaseError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for PurchaseError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
