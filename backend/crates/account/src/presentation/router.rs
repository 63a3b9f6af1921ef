//! Account Router

use crate::application::config::AccountConfig;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::infra::postgres::PgAccountRepository;
use crate::presentation::handlers::{self, AccountAppState};
use axum::{
    Router,
    routing::{get, post},
};
use platform::token::TokenVerifier;
use std::sync::Arc;

/// Create the account router with PostgreSQL repository
pub fn account_router(
    repo: PgAccountRepository,
    verifier: TokenVerifier,
    config: AccountConfig,
) -> Router {
    account_router_generic(repo, verifier, config)
}

/// Create a generic account router for any repository implementation
pub fn account_router_generic<R>(repo: R, verifier: TokenVerifier, config: AccountConfig) -> Router
where
    R: ProfileRepository + CredentialRepository + Clone + Send + Sync + 'static,
{
    let state = AccountAppState {
        repo: Arc::new(repo),
        verifier: Arc::new(verifier),
        config: Arc::new(config),
    };

    Router::new()
        .route(
            "/notifications",
            get(handlers::get_notifications::<R>).put(handlers::update_notifications::<R>),
        )
        .route("/password", post(handlers::reset_password::<R>))
        .with_state(state)
}
