//! PostgreSQL Repository Implementations

use crate::domain::entities::{Chapter, PaymentStatus, Purchase};
use crate::domain::repository::{ChapterRepository, CompletionOutcome, PurchaseRepository};
use crate::domain::value_objects::Money;
use crate::error::{PurchaseError, PurchaseResult};
use chrono::{DateTime, Utc};
use kernel::error::conversions::is_unique_violation;
use kernel::id::{ChapterId, UserId, to_uuids};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed repository
#[derive(Clone)]
pub struct PgPurchaseRepository {
    pool: PgPool,
}

impl PgPurchaseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ChapterRepository for PgPurchaseRepository {
    async fn find_by_ids(&self, ids: &[ChapterId]) -> PurchaseResult<Vec<Chapter>> {
        let rows = sqlx::query_as::<_, ChapterRow>(
            r#"
            SELECT id, book_id, price::FLOAT8 AS price
            FROM chapters
            WHERE id = ANY($1)
            "#,
        )
        .bind(to_uuids(ids))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ChapterRow::into_chapter).collect()
    }
}

impl PurchaseRepository for PgPurchaseRepository {
    async fn find_owned(
        &self,
        user_id: UserId,
        chapter_ids: &[ChapterId],
    ) -> PurchaseResult<Vec<ChapterId>> {
        let owned = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT chapter_id
            FROM purchases
            WHERE user_id = $1
              AND chapter_id = ANY($2)
              AND payment_status = 'completed'
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(to_uuids(chapter_ids))
        .fetch_all(&self.pool)
        .await?;

        Ok(owned.into_iter().map(ChapterId::from).collect())
    }

    async fn replace_stale_with_pending(
        &self,
        user_id: UserId,
        purchases: &[Purchase],
    ) -> PurchaseResult<u64> {
        let chapter_ids: Vec<Uuid> = purchases.iter().map(|p| p.chapter_id.into_uuid()).collect();
        let mut tx = self.pool.begin().await?;

        // Serializes order creation per user, including chapters with no rows yet
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::TEXT, 0))")
            .bind(user_id.into_uuid())
            .execute(&mut *tx)
            .await?;

        let existing = sqlx::query_as::<_, (Uuid, String)>(
            r#"
            SELECT chapter_id, payment_status
            FROM purchases
            WHERE user_id = $1 AND chapter_id = ANY($2)
            FOR UPDATE
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(&chapter_ids)
        .fetch_all(&mut *tx)
        .await?;

        let owned: Vec<ChapterId> = existing
            .iter()
            .filter(|(_, status)| status == PaymentStatus::Completed.as_str())
            .map(|(id, _)| ChapterId::from(*id))
            .collect();
        if !owned.is_empty() {
            // Dropping the transaction rolls it back
            return Err(PurchaseError::AlreadyOwned(owned));
        }

        let deleted = sqlx::query(
            r#"
            DELETE FROM purchases
            WHERE user_id = $1
              AND chapter_id = ANY($2)
              AND payment_status IN ('pending', 'failed')
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(&chapter_ids)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        for purchase in purchases {
            sqlx::query(
                r#"
                INSERT INTO purchases (
                    id,
                    user_id,
                    chapter_id,
                    amount_paid,
                    gateway_order_id,
                    gateway_payment_id,
                    payment_status,
                    created_at,
                    updated_at
                ) VALUES ($1, $2, $3, $4::NUMERIC, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(purchase.id.into_uuid())
            .bind(purchase.user_id.into_uuid())
            .bind(purchase.chapter_id.into_uuid())
            .bind(purchase.amount_paid.amount())
            .bind(&purchase.gateway_order_id)
            .bind(&purchase.gateway_payment_id)
            .bind(purchase.payment_status.as_str())
            .bind(purchase.created_at)
            .bind(purchase.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        if deleted > 0 {
            tracing::info!(
                user_id = %user_id,
                deleted_rows = deleted,
                "Stale purchases replaced"
            );
        }

        Ok(deleted)
    }

    async fn mark_failed(&self, user_id: UserId, order_id: &str) -> PurchaseResult<u64> {
        let failed = sqlx::query(
            r#"
            UPDATE purchases
            SET payment_status = 'failed', updated_at = NOW()
            WHERE user_id = $1
              AND gateway_order_id = $2
              AND payment_status = 'pending'
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(order_id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(failed)
    }

    async fn mark_completed(
        &self,
        user_id: UserId,
        order_id: &str,
        chapter_ids: &[ChapterId],
        payment_id: &str,
    ) -> PurchaseResult<CompletionOutcome> {
        let chapter_ids = to_uuids(chapter_ids);

        let completed = sqlx::query(
            r#"
            UPDATE purchases
            SET payment_status = 'completed',
                gateway_payment_id = $4,
                updated_at = NOW()
            WHERE user_id = $1
              AND gateway_order_id = $2
              AND payment_status IN ('pending', 'failed')
              AND (CARDINALITY($3::UUID[]) = 0 OR chapter_id = ANY($3))
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(order_id)
        .bind(&chapter_ids)
        .bind(payment_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // Another order already completed one of these chapters
            if is_unique_violation(&e) {
                PurchaseError::AlreadyOwned(Vec::new())
            } else {
                PurchaseError::Database(e)
            }
        })?
        .rows_affected();

        if completed > 0 {
            return Ok(CompletionOutcome {
                completed,
                already_completed: 0,
            });
        }

        let already_completed = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM purchases
            WHERE user_id = $1
              AND gateway_order_id = $2
              AND payment_status = 'completed'
              AND (CARDINALITY($3::UUID[]) = 0 OR chapter_id = ANY($3))
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(order_id)
        .bind(&chapter_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(CompletionOutcome {
            completed: 0,
            already_completed: already_completed.max(0) as u64,
        })
    }

    async fn latest_for_chapter(
        &self,
        user_id: UserId,
        chapter_id: ChapterId,
    ) -> PurchaseResult<Option<Purchase>> {
        let row = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT
                id,
                user_id,
                chapter_id,
                amount_paid::FLOAT8 AS amount_paid,
                gateway_order_id,
                gateway_payment_id,
                payment_status,
                created_at,
                updated_at
            FROM purchases
            WHERE user_id = $1 AND chapter_id = $2
            ORDER BY (payment_status = 'completed') DESC, updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.into_uuid())
        .bind(chapter_id.into_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(PurchaseRow::into_purchase).transpose()
    }
}

// Database row types

#[derive(sqlx::FromRow)]
struct ChapterRow {
    id: Uuid,
    book_id: Uuid,
    price: f64,
}

impl ChapterRow {
    fn into_chapter(self) -> PurchaseResult<Chapter> {
        let price = Money::new(self.price).ok_or_else(|| {
            PurchaseError::Internal(format!("chapter {} has invalid price", self.id))
        })?;

        Ok(Chapter {
            id: self.id.into(),
            book_id: self.book_id.into(),
            price,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PurchaseRow {
    id: Uuid,
    user_id: Uuid,
    chapter_id: Uuid,
    amount_paid: f64,
    gateway_order_id: String,
    gateway_payment_id: Option<String>,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PurchaseRow {
    fn into_purchase(self) -> PurchaseResult<Purchase> {
        let payment_status = PaymentStatus::from_code(&self.payment_status).ok_or_else(|| {
            PurchaseError::Internal(format!("unknown payment status: {}", self.payment_status))
        })?;
        let amount_paid = Money::new(self.amount_paid).ok_or_else(|| {
            PurchaseError::Internal(format!("purchase {} has invalid amount", self.id))
        })?;

        Ok(Purchase {
            id: self.id.into(),
            user_id: self.user_id.into(),
            chapter_id: self.chapter_id.into(),
            amount_paid,
            gateway_order_id: self.gateway_order_id,
            gateway_payment_id: self.gateway_payment_id,
            payment_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
