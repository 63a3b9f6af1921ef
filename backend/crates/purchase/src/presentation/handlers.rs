//! HTTP Handlers

use crate::application::config::PurchaseConfig;
use crate::application::create_order::{CreateOrderInput, CreateOrderOutput, CreateOrderUseCase};
use crate::application::purchase_status::PurchaseStatusUseCase;
use crate::application::verify_payment::{VerifyPaymentInput, VerifyPaymentUseCase};
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::{ChapterRepository, PurchaseRepository};
use crate::error::PurchaseResult;
use crate::presentation::dto::{
    CreateBulkOrderRequest, CreateOrderRequest, OrderResponse, PurchaseStatusResponse,
    VerifyPaymentRequest, VerifyPaymentResponse,
};
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use kernel::id::{ChapterId, UserId};
use platform::bearer::authenticate;
use platform::token::TokenVerifier;
use std::sync::Arc;

/// Shared state for purchase handlers
#[derive(Clone)]
pub struct PurchaseAppState<R, G>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub gateway: Arc<G>,
    pub verifier: Arc<TokenVerifier>,
    pub config: Arc<PurchaseConfig>,
}

impl<R, G> PurchaseAppState<R, G>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    fn caller(&self, headers: &HeaderMap) -> PurchaseResult<UserId> {
        Ok(UserId::from(authenticate(headers, &self.verifier)?))
    }

    fn create_order_use_case(&self) -> CreateOrderUseCase<R, R, G> {
        CreateOrderUseCase::new(
            self.repo.clone(),
            self.repo.clone(),
            self.gateway.clone(),
            self.config.clone(),
        )
    }
}

/// POST /api/purchases/orders
pub async fn create_order<R, G>(
    State(state): State<PurchaseAppState<R, G>>,
    headers: HeaderMap,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> PurchaseResult<Json<OrderResponse>>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Json(req) = payload?;

    let output = state
        .create_order_use_case()
        .execute(CreateOrderInput {
            user_id,
            chapter_ids: vec![req.chapter_id],
            book_id: req.book_id,
            claimed_amount: req.amount,
        })
        .await?;

    Ok(Json(order_response(output)))
}

/// POST /api/purchases/orders/bulk
pub async fn create_bulk_order<R, G>(
    State(state): State<PurchaseAppState<R, G>>,
    headers: HeaderMap,
    payload: Result<Json<CreateBulkOrderRequest>, JsonRejection>,
) -> PurchaseResult<Json<OrderResponse>>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Json(req) = payload?;

    let output = state
        .create_order_use_case()
        .execute(CreateOrderInput {
            user_id,
            chapter_ids: req.chapter_ids,
            book_id: Some(req.book_id),
            claimed_amount: req.total_amount,
        })
        .await?;

    Ok(Json(order_response(output)))
}

/// POST /api/purchases/verify
pub async fn verify_payment<R, G>(
    State(state): State<PurchaseAppState<R, G>>,
    headers: HeaderMap,
    payload: Result<Json<VerifyPaymentRequest>, JsonRejection>,
) -> PurchaseResult<Json<VerifyPaymentResponse>>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Json(req) = payload?;
    let chapter_ids = req.chapter_ids();

    let use_case = VerifyPaymentUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(VerifyPaymentInput {
            user_id,
            order_id: req.order_id,
            payment_id: req.payment_id,
            signature: req.signature,
            chapter_ids,
        })
        .await?;

    Ok(Json(VerifyPaymentResponse {
        success: true,
        order_id: output.order_id,
        completed: output.completed,
        already_completed: output.already_completed,
    }))
}

/// GET /api/purchases/chapters/{chapter_id}
pub async fn purchase_status<R, G>(
    State(state): State<PurchaseAppState<R, G>>,
    headers: HeaderMap,
    path: Result<Path<ChapterId>, PathRejection>,
) -> PurchaseResult<Json<PurchaseStatusResponse>>
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let user_id = state.caller(&headers)?;
    let Path(chapter_id) = path?;

    let output = PurchaseStatusUseCase::new(state.repo.clone())
        .execute(user_id, chapter_id)
        .await?;

    Ok(Json(PurchaseStatusResponse {
        chapter_id: output.chapter_id,
        owned: output.owned,
        status: output.status,
        order_id: output.order_id,
    }))
}

fn order_response(output: CreateOrderOutput) -> OrderResponse {
    OrderResponse {
        order_id: output.order_id,
        amount: output.amount,
        currency: output.currency,
        key_id: output.key_id,
        chapter_ids: output.chapter_ids,
    }
}
