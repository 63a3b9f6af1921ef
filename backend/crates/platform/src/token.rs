//! HS256 access tokens
//!
//! Verifies the JWTs issued by the hosted auth service. Only `alg = HS256`
//! is accepted.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Clock skew tolerated when checking `exp`
const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Token verification errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("unsupported algorithm")]
    UnsupportedAlgorithm,

    #[error("bad signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("subject is not a user id")]
    InvalidSubject,

    #[error("token could not be signed")]
    Signing,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            JwtErrorKind::InvalidSignature => TokenError::BadSignature,
            JwtErrorKind::InvalidAlgorithm | JwtErrorKind::InvalidAlgorithmName => {
                TokenError::UnsupportedAlgorithm
            }
            _ => TokenError::Malformed,
        }
    }
}

/// Claims read from an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id (UUID string)
    pub sub: String,
    /// Expiry (Unix seconds)
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    /// Claims for an authenticated user, valid for `ttl_secs`
    pub fn for_user(user_id: Uuid, ttl_secs: i64) -> Self {
        Self {
            sub: user_id.to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
            role: Some("authenticated".to_string()),
            email: None,
        }
    }

    /// Parse `sub` as a user id
    pub fn subject(&self) -> Result<Uuid, TokenError> {
        Uuid::parse_str(&self.sub).map_err(|_| TokenError::InvalidSubject)
    }
}

/// Verifier (and issuer) for HS256 tokens
#[derive(Clone)]
pub struct TokenVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(&secret),
            decoding_key: DecodingKey::from_secret(&secret),
            leeway_secs: DEFAULT_LEEWAY_SECS,
        }
    }

    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway_secs = leeway_secs;
        self
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = self.leeway_secs;
        // Auth service tokens carry `aud = authenticated`; the role claim is what matters.
        validation.validate_aud = false;
        validation
    }

    /// Verify signature and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation())?;
        Ok(data.claims)
    }

    /// Sign claims into a compact token
    ///
    /// Production tokens come from the auth service; this exists for
    /// local development and tests.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::default(), claims, &self.encoding_key).map_err(|_| TokenError::Signing)
    }
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("secret", &"[REDACTED]")
            .field("leeway_secs", &self.leeway_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"super-secret-jwt-token-with-at-least-32-characters";

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET.to_vec())
    }

    #[test]
    fn test_issue_and_verify() {
        let user_id = Uuid::new_v4();
        let token = verifier().issue(&Claims::for_user(user_id, 60)).unwrap();

        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.subject().unwrap(), user_id);
        assert_eq!(claims.role.as_deref(), Some("authenticated"));
    }

    #[test]
    fn test_expired_token() {
        let token = verifier()
            .issue(&Claims::for_user(Uuid::new_v4(), -3600))
            .unwrap();
        assert_eq!(verifier().verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_leeway_accepts_recent_expiry() {
        let token = verifier()
            .issue(&Claims::for_user(Uuid::new_v4(), -5))
            .unwrap();
        assert!(verifier().verify(&token).is_ok());
        assert_eq!(
            verifier().with_leeway(0).verify(&token),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_tampered_payload() {
        let token = verifier()
            .issue(&Claims::for_user(Uuid::new_v4(), 60))
            .unwrap();
        let other = verifier()
            .issue(&Claims::for_user(Uuid::new_v4(), 60))
            .unwrap();

        let parts: Vec<&str> = token.split('.').collect();
        let other_payload = other.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], other_payload, parts[2]);

        assert_eq!(verifier().verify(&forged), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_wrong_secret() {
        let token = TokenVerifier::new(b"another-secret".to_vec())
            .issue(&Claims::for_user(Uuid::new_v4(), 60))
            .unwrap();
        assert_eq!(verifier().verify(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_rejects_other_algorithms() {
        let token = encode(
            &Header::new(Algorithm::HS384),
            &Claims::for_user(Uuid::new_v4(), 60),
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            verifier().verify(&token),
            Err(TokenError::UnsupportedAlgorithm)
        );
    }

    #[test]
    fn test_malformed_tokens() {
        assert_eq!(verifier().verify("abc"), Err(TokenError::Malformed));
        assert_eq!(verifier().verify("!!.??.**"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_non_uuid_subject() {
        let claims = Claims {
            sub: "service_role".to_string(),
            exp: Utc::now().timestamp() + 60,
            role: None,
            email: None,
        };
        assert_eq!(claims.subject(), Err(TokenError::InvalidSubject));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let output = format!("{:?}", verifier());
        assert!(output.contains("REDACTED"));
        assert!(!output.contains("super-secret"));
    }
}
