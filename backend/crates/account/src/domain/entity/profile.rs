//! Profile Entity
//!
//! The part of a user's profile this backend writes.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

/// Default for users without a profile row
pub const DEFAULT_NOTIFICATIONS_ENABLED: bool = true;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub user_id: UserId,
    pub notifications_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Profile as seen before the user changed anything
    pub fn default_for(user_id: UserId) -> Self {
        Self {
            user_id,
            notifications_enabled: DEFAULT_NOTIFICATIONS_ENABLED,
            updated_at: Utc::now(),
        }
    }
}
