//! Value Object Module

pub mod new_password;
