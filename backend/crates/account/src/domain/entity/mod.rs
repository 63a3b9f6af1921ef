//! Entity Module

pub mod profile;
