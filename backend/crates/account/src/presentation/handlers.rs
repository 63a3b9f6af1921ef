//! HTTP Handlers

use crate::application::config::AccountConfig;
use crate::application::notification_preference::NotificationPreferenceUseCase;
use crate::application::reset_password::ResetPasswordUseCase;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::error::AccountResult;
use crate::presentation::dto::{
    NotificationPreferenceDto, ResetPasswordRequest, ResetPasswordResponse,
};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::HeaderMap;
use kernel::id::UserId;
use platform::bearer::authenticate;
use platform::token::TokenVerifier;
use std::sync::Arc;

/// Shared state for account handlers
#[derive(Clone)]
pub struct AccountAppState<R>
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<AccountConfig>,
}

impl<R> AccountAppState<R>
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    fn caller(&self, headers: &HeaderMap) -> AccountResult<UserId> {
        Ok(UserId::from(authenticate(headers, &self.verifier)?))
    }
}

/// GET /api/account/notifications
pub async fn get_notifications<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
) -> AccountResult<Json<NotificationPreferenceDto>>
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let enabled = NotificationPreferenceUseCase::new(state.repo.clone())
        .get(user_id)
        .await?;

    Ok(Json(NotificationPreferenceDto {
        notifications_enabled: enabled,
    }))
}

/// PUT /api/account/notifications
pub async fn update_notifications<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<NotificationPreferenceDto>, JsonRejection>,
) -> AccountResult<Json<NotificationPreferenceDto>>
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Json(req) = payload?;

    let enabled = NotificationPreferenceUseCase::new(state.repo.clone())
        .set(user_id, req.notifications_enabled)
        .await?;

    Ok(Json(NotificationPreferenceDto {
        notifications_enabled: enabled,
    }))
}

/// POST /api/account/password
pub async fn reset_password<R>(
    State(state): State<AccountAppState<R>>,
    headers: HeaderMap,
    payload: Result<Json<ResetPasswordRequest>, JsonRejection>,
) -> AccountResult<Json<ResetPasswordResponse>>
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Json(req) = payload?;

    ResetPasswordUseCase::new(state.repo.clone(), state.config.clone())
        .execute(user_id, req.password)
        .await?;

    Ok(Json(ResetPasswordResponse { success: true }))
}
