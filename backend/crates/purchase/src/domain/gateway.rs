//! Payment Gateway Port
//!
//! The purchase flow only needs one thing from the gateway: a remote order
//! the client can check out against. The HTTP implementation lives in
//! `infra::razorpay`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::PurchaseResult;

/// Order to be created at the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    /// Amount in minor units (paise)
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub notes: BTreeMap<String, String>,
}

/// Order as returned by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Gateway call failures
///
/// Details are logged, never returned to the client.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(String),

    #[error("gateway returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected gateway response: {0}")]
    InvalidResponse(String),
}

/// Payment gateway trait
#[trait_variant::make(PaymentGateway: Send)]
pub trait LocalPaymentGateway {
    /// Create a remote order for `draft.amount` minor units
    async fn create_order(&self, draft: &OrderDraft) -> PurchaseResult<GatewayOrder>;
}
