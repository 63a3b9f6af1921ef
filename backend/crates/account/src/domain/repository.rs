//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::UserId;
use platform::password::HashedPassword;

use crate::domain::entity::profile::Profile;
use crate::error::AccountResult;

/// Profile repository trait
#[trait_variant::make(ProfileRepository: Send)]
pub trait LocalProfileRepository {
    /// Find the profile row, if the user has one
    async fn find_by_user_id(&self, user_id: UserId) -> AccountResult<Option<Profile>>;

    /// Create or update the notification flag, returning the stored profile
    async fn upsert_notifications(&self, user_id: UserId, enabled: bool)
    -> AccountResult<Profile>;
}

/// Credential repository trait
#[trait_variant::make(CredentialRepository: Send)]
pub trait LocalCredentialRepository {
    /// Replace the password hash; false when the user has no credential row
    async fn update_password_hash(
        &self,
        user_id: UserId,
        hash: &HashedPassword,
    ) -> AccountResult<bool>;
}
