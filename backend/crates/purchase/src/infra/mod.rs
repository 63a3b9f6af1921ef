//! Infrastructure Layer - Database and gateway implementations

pub mod postgres;
pub mod razorpay;
