//! Narrator service entry point.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from environment variables
//! 3. Load API keys from the secrets file or the environment
//! 4. Load prompt templates
//! 5. Serve HTTP until terminated

use std::sync::Arc;

use lifetree_narrator::secrets::{EnvSecretStore, FileSecretStore};
use lifetree_narrator::{AppState, NarratorConfig, ServerConfig, start_server};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("lifetree-narrator starting");

    let config = NarratorConfig::from_env()?;
    info!(
        host = config.host,
        port = config.port,
        preferred_provider = %config.preferred_provider,
        anthropic_model = config.anthropic.model,
        openai_model = config.openai.model,
        request_timeout_ms = config.request_timeout.as_millis(),
        "configuration loaded"
    );

    let state = match config.secrets_file.clone() {
        Some(path) => {
            info!(path = %path.display(), "loading API keys from secrets file");
            AppState::load(config, &FileSecretStore::new(path))?
        }
        None => AppState::load(config, &EnvSecretStore)?,
    };

    if !state.keys().any() {
        warn!("no LLM API keys configured, generation requests will fail");
    }
    if let Some(dir) = &state.config().templates_dir {
        info!(templates_dir = %dir.display(), "prompt template overrides loaded");
    }

    let server_config = ServerConfig::from(state.config());
    start_server(&server_config, Arc::new(state)).await?;

    Ok(())
}
