//! Create Order Use Case
//!
//! Shared by the single-chapter and bulk endpoints.

use crate::application::config::PurchaseConfig;
use crate::domain::entities::{Chapter, Purchase};
use crate::domain::gateway::{OrderDraft, PaymentGateway};
use crate::domain::repository::{ChapterRepository, PurchaseRepository};
use crate::domain::services::{check_amount, check_same_book, expected_total};
use crate::domain::value_objects::{ChapterSelection, Money};
use crate::error::{PurchaseError, PurchaseResult};
use kernel::id::{BookId, ChapterId, UserId};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Input DTO for create order
#[derive(Debug, Clone)]
pub struct CreateOrderInput {
    pub user_id: UserId,
    pub chapter_ids: Vec<ChapterId>,
    /// Required for bulk orders, optional for a single chapter
    pub book_id: Option<BookId>,
    /// Amount the client believes it is paying (major units)
    pub claimed_amount: f64,
}

/// Output DTO for create order
#[derive(Debug, Clone)]
pub struct CreateOrderOutput {
    pub order_id: String,
    /// Minor units
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
    pub chapter_ids: Vec<ChapterId>,
}

/// Create Order Use Case
pub struct CreateOrderUseCase<C, P, G>
where
    C: ChapterRepository,
    P: PurchaseRepository,
    G: PaymentGateway,
{
    chapter_repo: Arc<C>,
    purchase_repo: Arc<P>,
    gateway: Arc<G>,
    config: Arc<PurchaseConfig>,
}

impl<C, P, G> CreateOrderUseCase<C, P, G>
where
    C: ChapterRepository,
    P: PurchaseRepository,
    G: PaymentGateway,
{
    pub fn new(
        chapter_repo: Arc<C>,
        purchase_repo: Arc<P>,
        gateway: Arc<G>,
        config: Arc<PurchaseConfig>,
    ) -> Self {
        Self {
            chapter_repo,
            purchase_repo,
            gateway,
            config,
        }
    }

    pub async fn execute(&self, input: CreateOrderInput) -> PurchaseResult<CreateOrderOutput> {
        let claimed = Money::new(input.claimed_amount)
            .filter(|m| m.amount() > 0.0)
            .ok_or_else(|| PurchaseError::InvalidRequest("Amount must be positive".to_string()))?;

        let selection = ChapterSelection::new(input.chapter_ids, self.config.max_bulk_chapters)
            .map_err(|e| PurchaseError::InvalidRequest(e.to_string()))?;

        let chapters = self.load_chapters(&selection).await?;
        if let Some(book_id) = input.book_id {
            check_same_book(&chapters, book_id)?;
        }

        // The client's total is never trusted
        let expected = expected_total(&chapters);
        check_amount(claimed, expected, self.config.amount_tolerance)?;

        let owned = self
            .purchase_repo
            .find_owned(input.user_id, selection.ids())
            .await?;
        if !owned.is_empty() {
            return Err(PurchaseError::AlreadyOwned(owned));
        }

        let draft = order_draft(
            input.user_id,
            input.book_id,
            &chapters,
            expected,
            &self.config.currency,
        );
        let order = self.gateway.create_order(&draft).await?;

        let purchases: Vec<Purchase> = chapters
            .iter()
            .map(|chapter| Purchase::pending(input.user_id, chapter, &order.id))
            .collect();
        let replaced = self
            .purchase_repo
            .replace_stale_with_pending(input.user_id, &purchases)
            .await?;

        tracing::info!(
            order_id = %order.id,
            user_id = %input.user_id,
            chapter_count = chapters.len(),
            amount = order.amount,
            replaced_rows = replaced,
            "Payment order created"
        );

        Ok(CreateOrderOutput {
            order_id: order.id,
            amount: order.amount,
            currency: order.currency,
            key_id: self.config.gateway_key_id.clone(),
            chapter_ids: selection.into_vec(),
        })
    }

    /// Load every selected chapter, in selection order
    async fn load_chapters(&self, selection: &ChapterSelection) -> PurchaseResult<Vec<Chapter>> {
        let found = self.chapter_repo.find_by_ids(selection.ids()).await?;

        let mut chapters = Vec::with_capacity(selection.len());
        let mut missing = Vec::new();
        for id in selection.ids() {
            match found.iter().find(|c| c.id == *id) {
                Some(chapter) => chapters.push(chapter.clone()),
                None => missing.push(*id),
            }
        }

        if !missing.is_empty() {
            return Err(PurchaseError::ChapterNotFound(missing));
        }
        Ok(chapters)
    }
}

/// Gateway order for the server-side total
fn order_draft(
    user_id: UserId,
    book_id: Option<BookId>,
    chapters: &[Chapter],
    total: Money,
    currency: &str,
) -> OrderDraft {
    let mut notes = BTreeMap::new();
    notes.insert("user_id".to_string(), user_id.to_string());
    notes.insert("chapter_count".to_string(), chapters.len().to_string());
    if let Some(book_id) = book_id {
        notes.insert("book_id".to_string(), book_id.to_string());
    }
    if let [chapter] = chapters {
        notes.insert("chapter_id".to_string(), chapter.id.to_string());
    }

    OrderDraft {
        amount: total.to_minor_units(),
        currency: currency.to_string(),
        // Gateway limit is 40 characters
        receipt: format!("rcpt_{}", uuid::Uuid::new_v4().simple()),
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(price: f64) -> Chapter {
        Chapter {
            id: ChapterId::new(),
            book_id: BookId::new(),
            price: Money::new(price).unwrap(),
        }
    }

    #[test]
    fn test_order_draft_single_chapter() {
        let user_id = UserId::new();
        let chapters = vec![chapter(99.0)];
        let draft = order_draft(user_id, None, &chapters, expected_total(&chapters), "INR");

        assert_eq!(draft.amount, 9900);
        assert_eq!(draft.currency, "INR");
        assert!(draft.receipt.len() <= 40);
        assert_eq!(draft.notes["user_id"], user_id.to_string());
        assert_eq!(draft.notes["chapter_id"], chapters[0].id.to_string());
        assert!(!draft.notes.contains_key("book_id"));
    }

    #[test]
    fn test_order_draft_bulk() {
        let book_id = BookId::new();
        let chapters = vec![chapter(10.0), chapter(20.5)];
        let draft = order_draft(
            UserId::new(),
            Some(book_id),
            &chapters,
            expected_total(&chapters),
            "INR",
        );

        assert_eq!(draft.amount, 3050);
        assert_eq!(draft.notes["chapter_count"], "2");
        assert_eq!(draft.notes["book_id"], book_id.to_string());
        assert!(!draft.notes.contains_key("chapter_id"));
    }
}
