//! New Password Value Object
//!
//! A password chosen during reset. Delegates policy and hashing to
//! `platform::password`.

use platform::password::{ClearTextPassword, HashedPassword};

use crate::error::AccountResult;

/// Validated new password; zeroized on drop
#[derive(Debug)]
pub struct NewPassword(ClearTextPassword);

impl NewPassword {
    /// Validate against the password policy (NIST SP 800-63B)
    pub fn new(raw: String) -> AccountResult<Self> {
        Ok(Self(ClearTextPassword::new(raw)?))
    }

    /// Argon2id hash ready for storage
    pub fn hash(&self, pepper: Option<&[u8]>) -> AccountResult<HashedPassword> {
        Ok(self.0.hash(pepper)?)
    }

    pub fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}
