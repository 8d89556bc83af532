mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod reports;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::generation::generator::GenerationService;
use crate::llm_client::LlmClient;
use crate::reports::memory::InMemoryReportStore;
use crate::reports::postgres::PgReportStore;
use crate::reports::store::ReportStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting STAR report API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize report storage
    let store: Arc<dyn ReportStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url)?;
            run_migrations(&pool).await;
            Arc::new(PgReportStore::new(pool))
        }
        None => {
            warn!("DATABASE_URL is not set; reports are kept in memory and lost on restart");
            Arc::new(InMemoryReportStore::new())
        }
    };

    // Initialize LLM client and generation pipeline
    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url)?;
    let generator = GenerationService::new(
        Arc::new(llm),
        config.model.clone(),
        config.fallback_model.clone(),
        config.completion.clone(),
    );
    info!(
        "Generation pipeline initialized (model: {}, fallback: {})",
        config.model,
        config.fallback_model.as_deref().unwrap_or("none")
    );

    let state = AppState { store, generator };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
