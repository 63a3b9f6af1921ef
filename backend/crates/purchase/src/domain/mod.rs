//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (Chapter, Purchase, PaymentStatus)
//! - Domain value objects (Money, ChapterSelection)
//! - Domain services (amount checks, gateway signature verification)
//! - Repository and gateway traits (interfaces)

pub mod entities;
pub mod gateway;
pub mod repository;
pub mod services;
pub mod value_objects;
