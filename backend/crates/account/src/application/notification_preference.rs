//! Notification Preference Use Case
//!
//! Reads and writes the `notifications_enabled` flag on the caller's profile.

use std::sync::Arc;

use crate::domain::entity::profile::Profile;
use crate::domain::repository::ProfileRepository;
use crate::error::AccountResult;
use kernel::id::UserId;

pub struct NotificationPreferenceUseCase<P>
where
    P: ProfileRepository,
{
    profile_repo: Arc<P>,
}

impl<P> NotificationPreferenceUseCase<P>
where
    P: ProfileRepository,
{
    pub fn new(profile_repo: Arc<P>) -> Self {
        Self { profile_repo }
    }

    /// Current flag; users without a profile row get the default
    pub async fn get(&self, user_id: UserId) -> AccountResult<bool> {
        let profile = self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .unwrap_or_else(|| Profile::default_for(user_id));
        Ok(profile.notifications_enabled)
    }

    /// Store the flag and return the stored value
    pub async fn set(&self, user_id: UserId, enabled: bool) -> AccountResult<bool> {
        let profile = self
            .profile_repo
            .upsert_notifications(user_id, enabled)
            .await?;

        tracing::info!(
            user_id = %user_id,
            notifications_enabled = profile.notifications_enabled,
            "Notification preference updated"
        );

        Ok(profile.notifications_enabled)
    }
}
