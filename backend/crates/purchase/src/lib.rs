//! Chapter Purchase Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Business logic, entities, repository and gateway traits
//! - `application/` - Use cases
//! - `infra/` - Database and payment gateway implementations
//! - `presentation/` - HTTP handlers
//!
//! ## Security Model
//! - Prices come from the database; the client's amount is only checked, never charged
//! - A purchase completes only after the gateway signature (HMAC-SHA256 over
//!   `orderId|paymentId`) verifies in constant time
//! - Ownership is a completed purchase row, unique per (user, chapter)

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::PurchaseConfig;
pub use error::{PurchaseError, PurchaseResult};
pub use infra::postgres::PgPurchaseRepository;
pub use infra::razorpay::RazorpayGateway;
pub use presentation::router::{purchase_router, purchase_router_generic};
