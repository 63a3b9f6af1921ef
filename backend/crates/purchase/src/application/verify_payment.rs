//! Verify Payment Use Case

use crate::application::config::PurchaseConfig;
use crate::domain::repository::PurchaseRepository;
use crate::domain::services::verify_payment_signature;
use crate::error::{PurchaseError, PurchaseResult};
use kernel::id::{ChapterId, UserId};
use std::sync::Arc;

/// Input DTO for verify payment
#[derive(Debug, Clone)]
pub struct VerifyPaymentInput {
    pub user_id: UserId,
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    /// Chapters to complete; empty means every chapter of the order
    pub chapter_ids: Vec<ChapterId>,
}

/// Output DTO for verify payment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyPaymentOutput {
    pub order_id: String,
    /// Rows moved to completed by this call
    pub completed: u64,
    /// True when every matching row was already completed
    pub already_completed: bool,
}

/// Verify Payment Use Case
pub struct VerifyPaymentUseCase<P>
where
    P: PurchaseRepository,
{
    purchase_repo: Arc<P>,
    config: Arc<PurchaseConfig>,
}

impl<P> VerifyPaymentUseCase<P>
where
    P: PurchaseRepository,
{
    pub fn new(purchase_repo: Arc<P>, config: Arc<PurchaseConfig>) -> Self {
        Self {
            purchase_repo,
            config,
        }
    }

    pub async fn execute(&self, input: VerifyPaymentInput) -> PurchaseResult<VerifyPaymentOutput> {
        if input.order_id.is_empty() || input.payment_id.is_empty() || input.signature.is_empty()
        {
            return Err(PurchaseError::InvalidRequest(
                "orderId, paymentId and signature are required".to_string(),
            ));
        }

        if !verify_payment_signature(
            &self.config.gateway_key_secret,
            &input.order_id,
            &input.payment_id,
            &input.signature,
        ) {
            let failed = self
                .purchase_repo
                .mark_failed(input.user_id, &input.order_id)
                .await?;
            tracing::warn!(
                order_id = %input.order_id,
                user_id = %input.user_id,
                failed_rows = failed,
                "Payment signature rejected"
            );
            return Err(PurchaseError::InvalidSignature);
        }

        let outcome = self
            .purchase_repo
            .mark_completed(
                input.user_id,
                &input.order_id,
                &input.chapter_ids,
                &input.payment_id,
            )
            .await?;

        if outcome.is_empty() {
            tracing::warn!(
                order_id = %input.order_id,
                user_id = %input.user_id,
                "Verified payment matches no purchase"
            );
            return Err(PurchaseError::PurchaseNotFound);
        }

        tracing::info!(
            order_id = %input.order_id,
            payment_id = %input.payment_id,
            user_id = %input.user_id,
            completed = outcome.completed,
            already_completed = outcome.already_completed,
            "Payment verified"
        );

        Ok(VerifyPaymentOutput {
            order_id: input.order_id,
            completed: outcome.completed,
            already_completed: outcome.completed == 0,
        })
    }
}
