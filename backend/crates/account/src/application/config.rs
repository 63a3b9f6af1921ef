//! Application Configuration
//!
//! Configuration for the account application layer.

use std::fmt;

/// Account application configuration
#[derive(Clone, Default)]
pub struct AccountConfig {
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
}

impl AccountConfig {
    /// Create config for development (no pepper)
    pub fn development() -> Self {
        Self::default()
    }

    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountConfig")
            .field(
                "password_pepper",
                &self.password_pepper.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}
