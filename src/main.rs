//! Intake - Role-Based Auth & Data Submission Service
//! Mission: Register users, issue bearer tokens, collect submissions

use anyhow::{Context, Result};
use axum::{middleware, routing::get, Router};
use dotenv::dotenv;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intake_backend::{
    auth::{api_router, AppState, TokenService},
    config::Config,
    middleware::request_logging,
    store,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    init_tracing();

    let config = Config::from_env();
    info!(
        "Starting intake backend (db: {}, strict validation: {})",
        config.db, config.strict_validation
    );

    let (users, submissions) =
        store::open_backend(&config).context("Failed to open store backend")?;
    let tokens = Arc::new(TokenService::new(
        config.jwt_secret.clone(),
        config.token_ttl_secs,
    ));

    let state = AppState {
        users,
        submissions,
        tokens,
        strict_validation: config.strict_validation,
    };

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(api_router(state))
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}

/// Initialize tracing with env-filter support
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "intake_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
