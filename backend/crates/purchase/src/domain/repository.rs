//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use kernel::id::{ChapterId, UserId};

use crate::domain::entities::{Chapter, Purchase};
use crate::error::PurchaseResult;

/// Result of completing the rows of a verified gateway order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Rows moved from pending or failed to completed by this call
    pub completed: u64,
    /// Rows of the same order that were already completed (retry)
    pub already_completed: u64,
}

impl CompletionOutcome {
    pub fn is_empty(&self) -> bool {
        self.completed == 0 && self.already_completed == 0
    }
}

/// Chapter repository trait (read-only)
#[trait_variant::make(ChapterRepository: Send)]
pub trait LocalChapterRepository {
    /// Load the chapters that exist among `ids`
    async fn find_by_ids(&self, ids: &[ChapterId]) -> PurchaseResult<Vec<Chapter>>;
}

/// Purchase repository trait
#[trait_variant::make(PurchaseRepository: Send)]
pub trait LocalPurchaseRepository {
    /// Chapters among `chapter_ids` the user already owns (completed purchase)
    async fn find_owned(
        &self,
        user_id: UserId,
        chapter_ids: &[ChapterId],
    ) -> PurchaseResult<Vec<ChapterId>>;

    /// Atomically replace stale rows with new pending purchases
    ///
    /// In one transaction: re-check ownership (`AlreadyOwned`), delete
    /// pending/failed rows for the same (user, chapter) pairs, insert
    /// `purchases`. Returns the number of deleted rows.
    async fn replace_stale_with_pending(
        &self,
        user_id: UserId,
        purchases: &[Purchase],
    ) -> PurchaseResult<u64>;

    /// Mark the user's pending rows of `order_id` as failed
    async fn mark_failed(&self, user_id: UserId, order_id: &str) -> PurchaseResult<u64>;

    /// Move the user's pending or failed rows of `order_id` for `chapter_ids` to completed
    async fn mark_completed(
        &self,
        user_id: UserId,
        order_id: &str,
        chapter_ids: &[ChapterId],
        payment_id: &str,
    ) -> PurchaseResult<CompletionOutcome>;

    /// Most relevant purchase row for (user, chapter): completed first, then newest
    async fn latest_for_chapter(
        &self,
        user_id: UserId,
        chapter_id: ChapterId,
    ) -> PurchaseResult<Option<Purchase>>;
}
