//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! feature crates.

mod settings;

use account::{PgAccountRepository, account_router};
use axum::{
    Json, Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use platform::token::TokenVerifier;
use purchase::{PgPurchaseRepository, RazorpayGateway, purchase_router};
use serde_json::{Value, json};
use settings::Settings;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,purchase=info,account=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(settings.database_max_connections)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let purchase_config = settings.purchase_config();
    tracing::info!(config = ?purchase_config, "Purchase configuration loaded");
    let gateway = RazorpayGateway::new(&purchase_config)?;
    let verifier = TokenVerifier::new(settings.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(health))
        .nest(
            "/api/purchases",
            purchase_router(
                PgPurchaseRepository::new(pool.clone()),
                gateway,
                verifier.clone(),
                purchase_config,
            ),
        )
        .nest(
            "/api/account",
            account_router(
                PgAccountRepository::new(pool.clone()),
                verifier,
                settings.account_config(),
            ),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer());

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Browser clients call from any origin with a bearer token, never cookies
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ]))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
