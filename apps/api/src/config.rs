use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Number of scoring workers draining the shared job queue.
    pub worker_count: usize,
    /// Overall deadline for one batch; unresolved jobs become Failed rows.
    pub batch_timeout_secs: u64,
    /// Fallback wait between result-store checks while a batch is pending.
    pub poll_interval_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            worker_count: env_or("WORKER_COUNT", "4")
                .parse::<usize>()
                .context("WORKER_COUNT must be a positive integer")?,
            batch_timeout_secs: env_or("BATCH_TIMEOUT_SECS", "90")
                .parse::<u64>()
                .context("BATCH_TIMEOUT_SECS must be an integer number of seconds")?,
            poll_interval_ms: env_or("POLL_INTERVAL_MS", "500")
                .parse::<u64>()
                .context("POLL_INTERVAL_MS must be an integer number of milliseconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
