//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (HMAC-SHA256, hex, constant-time compare)
//! - Bearer token extraction and HS256 JWT verification (`jsonwebtoken`)
//! - Password policy and hashing (Argon2id, NIST SP 800-63B compliant)

pub mod bearer;
pub mod crypto;
pub mod password;
pub mod token;
