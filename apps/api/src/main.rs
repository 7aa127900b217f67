mod config;
mod errors;
mod extract;
mod llm_client;
mod pipeline;
mod routes;
mod scoring;
mod shutdown;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::coordinator::BatchCoordinator;
use crate::pipeline::queue::JobQueue;
use crate::pipeline::store::ResultStore;
use crate::pipeline::worker::spawn_workers;
use crate::routes::build_router;
use crate::scoring::scorer::{LlmResumeScorer, ResumeScorer};
use crate::shutdown::install_shutdown_handler;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Ranker API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Shutdown token shared by the worker pool and the HTTP server
    let shutdown = install_shutdown_handler();

    // Pipeline singletons: one queue, one store, for the process lifetime
    let queue = JobQueue::new(shutdown.clone());
    let store = ResultStore::new();

    let scorer: Arc<dyn ResumeScorer> = Arc::new(LlmResumeScorer::new(llm.clone()));
    spawn_workers(config.worker_count, &queue, &store, &scorer);
    info!("Scoring worker pool started ({} workers)", config.worker_count);

    let coordinator = BatchCoordinator::new(
        queue,
        store,
        Duration::from_secs(config.batch_timeout_secs),
        Duration::from_millis(config.poll_interval_ms),
    );

    // Build app state
    let state = AppState {
        llm,
        coordinator,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Shutdown complete");
    Ok(())
}
