//! Reset Password Use Case
//!
//! Sets a new password for the authenticated caller. The caller proves
//! identity with the bearer token of a recovery session.

use std::sync::Arc;

use crate::application::config::AccountConfig;
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::new_password::NewPassword;
use crate::error::{AccountError, AccountResult};
use kernel::id::UserId;

pub struct ResetPasswordUseCase<C>
where
    C: CredentialRepository,
{
    credential_repo: Arc<C>,
    config: Arc<AccountConfig>,
}

impl<C> ResetPasswordUseCase<C>
where
    C: CredentialRepository,
{
    pub fn new(credential_repo: Arc<C>, config: Arc<AccountConfig>) -> Self {
        Self {
            credential_repo,
            config,
        }
    }

    pub async fn execute(&self, user_id: UserId, raw_password: String) -> AccountResult<()> {
        let password = NewPassword::new(raw_password)?;

        // Argon2id is CPU-bound; keep it off the async workers.
        let config = Arc::clone(&self.config);
        let hash = tokio::task::spawn_blocking(move || password.hash(config.pepper()))
            .await
            .map_err(|e| AccountError::Internal(e.to_string()))??;

        let updated = self
            .credential_repo
            .update_password_hash(user_id, &hash)
            .await?;
        if !updated {
            return Err(AccountError::UserNotFound);
        }

        tracing::info!(user_id = %user_id, "Password reset");
        Ok(())
    }
}
