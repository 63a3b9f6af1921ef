//! Purchase Status Use Case

use crate::domain::entities::PaymentStatus;
use crate::domain::repository::PurchaseRepository;
use crate::error::PurchaseResult;
use kernel::id::{ChapterId, UserId};
use std::sync::Arc;

/// Output DTO for purchase status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseStatusOutput {
    pub chapter_id: ChapterId,
    pub owned: bool,
    pub status: Option<PaymentStatus>,
    pub order_id: Option<String>,
}

/// Purchase Status Use Case
pub struct PurchaseStatusUseCase<P>
where
    P: PurchaseRepository,
{
    purchase_repo: Arc<P>,
}

impl<P> PurchaseStatusUseCase<P>
where
    P: PurchaseRepository,
{
    pub fn new(purchase_repo: Arc<P>) -> Self {
        Self { purchase_repo }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        chapter_id: ChapterId,
    ) -> PurchaseResult<PurchaseStatusOutput> {
        let latest = self
            .purchase_repo
            .latest_for_chapter(user_id, chapter_id)
            .await?;

        Ok(match latest {
            Some(purchase) => PurchaseStatusOutput {
                chapter_id,
                owned: purchase.grants_ownership(),
                status: Some(purchase.payment_status),
                order_id: Some(purchase.gateway_order_id),
            },
            None => PurchaseStatusOutput {
                chapter_id,
                owned: false,
                status: None,
                order_id: None,
            },
        })
    }
}
