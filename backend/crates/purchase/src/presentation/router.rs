//! Purchase Router

use crate::application::config::PurchaseConfig;
use crate::domain::gateway::PaymentGateway;
use crate::domain::repository::{ChapterRepository, PurchaseRepository};
use crate::infra::postgres::PgPurchaseRepository;
use crate::infra::razorpay::RazorpayGateway;
use crate::presentation::handlers::{self, PurchaseAppState};
use axum::{
    Router,
    routing::{get, post},
};
use platform::token::TokenVerifier;
use std::sync::Arc;

/// Create the purchase router with PostgreSQL repository and the HTTP gateway
pub fn purchase_router(
    repo: PgPurchaseRepository,
    gateway: RazorpayGateway,
    verifier: TokenVerifier,
    config: PurchaseConfig,
) -> Router {
    purchase_router_generic(repo, gateway, verifier, config)
}

/// Create a generic purchase router for any repository and gateway implementation
pub fn purchase_router_generic<R, G>(
    repo: R,
    gateway: G,
    verifier: TokenVerifier,
    config: PurchaseConfig,
) -> Router
where
    R: ChapterRepository + PurchaseRepository + Clone + Send + Sync + 'static,
    G: PaymentGateway + Clone + Send + Sync + 'static,
{
    let state = PurchaseAppState {
        repo: Arc::new(repo),
        gateway: Arc::new(gateway),
        verifier: Arc::new(verifier),
        config: Arc::new(config),
    };

    Router::new()
        .route("/orders", post(handlers::create_order::<R, G>))
        .route("/orders/bulk", post(handlers::create_bulk_order::<R, G>))
        .route("/verify", post(handlers::verify_payment::<R, G>))
        .route(
            "/chapters/{chapter_id}",
            get(handlers::purchase_status::<R, G>),
        )
        .with_state(state)
}
