//! Data Transfer Objects
//!
//! Request and response types for the purchase API.

use crate::domain::entities::PaymentStatus;
use kernel::id::{BookId, ChapterId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Requests
// ============================================================================

/// POST /api/purchases/orders
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub chapter_id: ChapterId,
    #[serde(default)]
    pub book_id: Option<BookId>,
    pub amount: f64,
}

/// POST /api/purchases/orders/bulk
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBulkOrderRequest {
    pub chapter_ids: Vec<ChapterId>,
    pub book_id: BookId,
    pub total_amount: f64,
}

/// POST /api/purchases/verify
///
/// Accepts both our field names and the gateway's checkout callback names.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[serde(alias = "razorpay_order_id")]
    pub order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
    #[serde(default)]
    pub chapter_id: Option<ChapterId>,
    #[serde(default)]
    pub chapter_ids: Option<Vec<ChapterId>>,
}

impl VerifyPaymentRequest {
    /// Union of `chapterId` and `chapterIds`
    pub fn chapter_ids(&self) -> Vec<ChapterId> {
        let mut ids: Vec<ChapterId> = self.chapter_ids.clone().unwrap_or_default();
        if let Some(id) = self.chapter_id {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Order the client opens the gateway checkout with
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: String,
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub chapter_ids: Vec<ChapterId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub success: bool,
    pub order_id: String,
    pub completed: u64,
    pub already_completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseStatusResponse {
    pub chapter_id: ChapterId,
    pub owned: bool,
    pub status: Option<PaymentStatus>,
    pub order_id: Option<String>,
}
