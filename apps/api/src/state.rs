use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::pipeline::coordinator::BatchCoordinator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Front door to the scoring pipeline: enqueues a batch and waits for
    /// the worker pool to resolve it.
    pub coordinator: BatchCoordinator,
    #[allow(dead_code)]
    pub config: Config,
}
