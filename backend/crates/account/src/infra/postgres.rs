//! PostgreSQL Repository Implementations

use crate::domain::entity::profile::Profile;
use crate::domain::repository::{CredentialRepository, ProfileRepository};
use crate::error::AccountResult;
use chrono::{DateTime, Utc};
use kernel::id::UserId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ProfileRepository for PgAccountRepository {
    async fn find_by_user_id(&self, user_id: UserId) -> AccountResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT user_id, notifications_enabled, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn upsert_notifications(
        &self,
        user_id: UserId,
        enabled: bool,
    ) -> AccountResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, notifications_enabled, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET notifications_enabled = EXCLUDED.notifications_enabled,
                updated_at = NOW()
            RETURNING user_id, notifications_enabled, updated_at
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(enabled)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_profile())
    }
}

impl CredentialRepository for PgAccountRepository {
    async fn update_password_hash(
        &self,
        user_id: UserId,
        hash: &HashedPassword,
    ) -> AccountResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE credentials
            SET password_hash = $2, updated_at = NOW()
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(hash.as_phc_string())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }
}

// Database row types

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: Uuid,
    notifications_enabled: bool,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            user_id: self.user_id.into(),
            notifications_enabled: self.notifications_enabled,
            updated_at: self.updated_at,
        }
    }
}
