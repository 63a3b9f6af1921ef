//! Account Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Notification preference toggle (defaults to enabled)
//! - Password reset for the bearer of a recovery session
//!
//! ## Security Model
//! - The caller is always the `sub` of a verified bearer token
//! - New passwords follow NIST SP 800-63B and are stored as Argon2id hashes

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::AccountConfig;
pub use error::{AccountError, AccountResult};
pub use infra::postgres::PgAccountRepository;
pub use presentation::router::{account_router, account_router_generic};

#[cfg(test)]
mod tests;
