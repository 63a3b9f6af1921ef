//! Bearer credential utilities
//!
//! Resolves the caller of a request from its `Authorization: Bearer` header.

use axum::http::{HeaderMap, header};
use uuid::Uuid;

use crate::token::{TokenError, TokenVerifier};

/// Error when resolving the caller from request headers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing authorization header")]
    MissingHeader,

    #[error("Authorization header is not a bearer token")]
    NotBearer,

    #[error("Invalid bearer token: {0}")]
    InvalidToken(#[from] TokenError),
}

/// Extract the raw token from an `Authorization: Bearer <token>` header
///
/// The scheme is matched case-insensitively; surrounding whitespace is
/// ignored.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(BearerError::MissingHeader)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or(BearerError::NotBearer)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(BearerError::NotBearer);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(BearerError::NotBearer);
    }

    Ok(token)
}

/// Resolve the authenticated user id from request headers
///
/// ## Returns
/// * `Ok(Uuid)` - the `sub` claim of a valid, unexpired token
/// * `Err(BearerError)` - header missing/malformed or token rejected
pub fn authenticate(headers: &HeaderMap, verifier: &TokenVerifier) -> Result<Uuid, BearerError> {
    let token = extract_bearer_token(headers)?;
    let claims = verifier.verify(token)?;
    Ok(claims.subject()?)
}
