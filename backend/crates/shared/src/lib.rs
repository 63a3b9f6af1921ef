//! Shared Kernel - Domain-crossing minimal core
//!
//! Vocabulary shared by the purchase and account crates:
//! - The unified error type and its HTTP rendering
//! - Typed UUID identifiers for users, books, chapters and purchases
//!
//! Only things with the same meaning in every crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
