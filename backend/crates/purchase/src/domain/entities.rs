//! Domain Entities
//!
//! Core business entities for the purchase domain.

use chrono::{DateTime, Utc};
use kernel::id::{BookId, ChapterId, PurchaseId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_objects::Money;

/// Chapter as seen by the purchase flow (read-only)
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: ChapterId,
    pub book_id: BookId,
    pub price: Money,
}

/// Payment state of a purchase row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "pending" => Some(PaymentStatus::Pending),
            "completed" => Some(PaymentStatus::Completed),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }

    /// Pending and failed rows are replaced when a new order is created
    pub const fn is_stale(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purchase entity - one row per (user, chapter, gateway order)
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub chapter_id: ChapterId,
    pub amount_paid: Money,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Purchase {
    /// New pending purchase for a chapter priced at order time
    pub fn pending(user_id: UserId, chapter: &Chapter, gateway_order_id: &str) -> Self {
        let now = Utc::now();
        Self {
            id: PurchaseId::new(),
            user_id,
            chapter_id: chapter.id,
            amount_paid: chapter.price,
            gateway_order_id: gateway_order_id.to_string(),
            gateway_payment_id: None,
            payment_status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// A chapter is owned iff a completed purchase exists
    pub fn grants_ownership(&self) -> bool {
        self.payment_status == PaymentStatus::Completed
    }
}
