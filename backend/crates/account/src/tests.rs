//! Unit tests for account crate

#[cfg(test)]
mod support {
    use crate::domain::entity::profile::Profile;
    use crate::domain::repository::{CredentialRepository, ProfileRepository};
    use crate::error::AccountResult;
    use chrono::Utc;
    use kernel::id::UserId;
    use platform::password::HashedPassword;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Profiles and credential hashes held in memory
    #[derive(Clone, Default)]
    pub struct InMemoryAccounts {
        profiles: Arc<Mutex<HashMap<UserId, Profile>>>,
        credentials: Arc<Mutex<HashMap<UserId, String>>>,
    }

    impl InMemoryAccounts {
        pub fn with_user(user_id: UserId) -> Self {
            let store = Self::default();
            store
                .credentials
                .lock()
                .unwrap()
                .insert(user_id, "$argon2id$placeholder".to_string());
            store
        }

        pub fn password_hash(&self, user_id: UserId) -> Option<String> {
            self.credentials.lock().unwrap().get(&user_id).cloned()
        }

        pub fn profile(&self, user_id: UserId) -> Option<Profile> {
            self.profiles.lock().unwrap().get(&user_id).cloned()
        }
    }

    impl ProfileRepository for InMemoryAccounts {
        async fn find_by_user_id(&self, user_id: UserId) -> AccountResult<Option<Profile>> {
            Ok(self.profile(user_id))
        }

        async fn upsert_notifications(
            &self,
            user_id: UserId,
            enabled: bool,
        ) -> AccountResult<Profile> {
            let mut profiles = self.profiles.lock().unwrap();
            let profile = profiles
                .entry(user_id)
                .or_insert_with(|| Profile::default_for(user_id));
            profile.notifications_enabled = enabled;
            profile.updated_at = Utc::now();
            Ok(profile.clone())
        }
    }

    impl CredentialRepository for InMemoryAccounts {
        async fn update_password_hash(
            &self,
            user_id: UserId,
            hash: &HashedPassword,
        ) -> AccountResult<bool> {
            let mut credentials = self.credentials.lock().unwrap();
            match credentials.get_mut(&user_id) {
                Some(stored) => {
                    *stored = hash.as_phc_string().to_string();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }
}

#[cfg(test)]
mod notification_tests {
    use super::support::*;
    use crate::application::notification_preference::NotificationPreferenceUseCase;
    use kernel::id::UserId;
    use std::sync::Arc;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_default_is_enabled() {
        let store = InMemoryAccounts::default();
        let use_case = NotificationPreferenceUseCase::new(Arc::new(store.clone()));

        let enabled = assert_ok!(use_case.get(UserId::new()).await);
        assert!(enabled);
    }

    #[tokio::test]
    async fn test_toggle_round_trip() {
        let store = InMemoryAccounts::default();
        let use_case = NotificationPreferenceUseCase::new(Arc::new(store.clone()));
        let user = UserId::new();

        assert!(!assert_ok!(use_case.set(user, false).await));
        assert!(!assert_ok!(use_case.get(user).await));
        assert!(assert_ok!(use_case.set(user, true).await));
        assert!(assert_ok!(use_case.get(user).await));

        // Upsert keeps a single profile row per user
        assert_eq!(store.profile(user).map(|p| p.user_id), Some(user));
    }
}

#[cfg(test)]
mod reset_password_tests {
    use super::support::*;
    use crate::application::config::AccountConfig;
    use crate::application::reset_password::ResetPasswordUseCase;
    use crate::error::AccountError;
    use kernel::id::UserId;
    use platform::password::{ClearTextPassword, HashedPassword};
    use std::sync::Arc;
    use tokio_test::{assert_err, assert_ok};

    fn use_case(store: &InMemoryAccounts, pepper: Option<&[u8]>) -> ResetPasswordUseCase<InMemoryAccounts> {
        ResetPasswordUseCase::new(
            Arc::new(store.clone()),
            Arc::new(AccountConfig {
                password_pepper: pepper.map(<[u8]>::to_vec),
            }),
        )
    }

    #[tokio::test]
    async fn test_reset_stores_argon2id_hash() {
        let user = UserId::new();
        let store = InMemoryAccounts::with_user(user);

        assert_ok!(use_case(&store, Some(b"pepper"))
            .execute(user, "Reading#Night2024".to_string())
            .await);

        let stored = store.password_hash(user).unwrap();
        assert!(stored.starts_with("$argon2id$"));

        let hashed = HashedPassword::from_phc_string(stored).unwrap();
        let password = ClearTextPassword::new("Reading#Night2024".to_string()).unwrap();
        assert!(hashed.verify(&password, Some(b"pepper")));
    }

    #[tokio::test]
    async fn test_weak_password_rejected_before_write() {
        let user = UserId::new();
        let store = InMemoryAccounts::with_user(user);

        let err = assert_err!(use_case(&store, None)
            .execute(user, "password123".to_string())
            .await);

        assert!(matches!(err, AccountError::PasswordPolicy(_)));
        assert_eq!(
            store.password_hash(user).as_deref(),
            Some("$argon2id$placeholder")
        );
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let store = InMemoryAccounts::default();
        let err = assert_err!(use_case(&store, None)
            .execute(UserId::new(), "Reading#Night2024".to_string())
            .await);
        assert!(matches!(err, AccountError::UserNotFound));
    }
}

#[cfg(test)]
mod router_tests {
    use super::support::*;
    use crate::application::config::AccountConfig;
    use crate::presentation::router::account_router_generic;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use kernel::id::UserId;
    use platform::token::{Claims, TokenVerifier};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const JWT_SECRET: &[u8] = b"account-test-jwt-secret";

    fn app(store: &InMemoryAccounts) -> Router {
        account_router_generic(
            store.clone(),
            TokenVerifier::new(JWT_SECRET.to_vec()),
            AccountConfig::development(),
        )
    }

    fn token_for(user_id: UserId) -> String {
        TokenVerifier::new(JWT_SECRET.to_vec()).issue(&Claims::for_user(user_id.into_uuid(), 300))
            .unwrap()
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = builder
            .body(
                body.map(|v| Body::from(v.to_string()))
                    .unwrap_or_else(Body::empty),
            )
            .unwrap();

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_notification_toggle_over_http() {
        let store = InMemoryAccounts::default();
        let app = app(&store);
        let token = token_for(UserId::new());

        let (status, body) = send(&app, "GET", "/notifications", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "notificationsEnabled": true }));

        let (status, body) = send(
            &app,
            "PUT",
            "/notifications",
            Some(&token),
            Some(json!({ "notificationsEnabled": false })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "notificationsEnabled": false }));

        let (_, body) = send(&app, "GET", "/notifications", Some(&token), None).await;
        assert_eq!(body["notificationsEnabled"], false);
    }

    #[tokio::test]
    async fn test_password_reset_over_http() {
        let user = UserId::new();
        let store = InMemoryAccounts::with_user(user);
        let app = app(&store);

        let (status, body) = send(
            &app,
            "POST",
            "/password",
            Some(&token_for(user)),
            Some(json!({ "password": "Reading#Night2024" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = send(
            &app,
            "POST",
            "/password",
            Some(&token_for(user)),
            Some(json!({ "password": "short" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 8 characters (got 5)");
    }

    #[tokio::test]
    async fn test_requests_without_token_rejected() {
        let store = InMemoryAccounts::default();
        let app = app(&store);

        let (status, body) = send(&app, "GET", "/notifications", None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Unauthorized" }));

        let (status, _) = send(
            &app,
            "PUT",
            "/notifications",
            Some("not.a.token"),
            Some(json!({ "notificationsEnabled": false })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let store = InMemoryAccounts::default();
        let (status, body) = send(
            &app(&store),
            "PUT",
            "/notifications",
            Some(&token_for(UserId::new())),
            Some(json!({ "notificationsEnabled": "yes" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::AccountError;
    use kernel::error::kind::ErrorKind;
    use platform::password::PasswordPolicyError;

    #[test]
    fn test_policy_errors_are_unprocessable() {
        let err = AccountError::from(PasswordPolicyError::CommonPattern);
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
        assert_eq!(
            err.to_app_error().message(),
            "Password is too common or follows a predictable pattern"
        );
    }

    #[test]
    fn test_database_detail_not_exposed() {
        let err = AccountError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_app_error().message(), "Internal server error");
    }
}
