//! Headless Lifetree journey.
//!
//! Plays `journey.lives` lives with a scripted pilot steering
//! consciousness, carrying karma from each life into the next. Usage:
//!
//! ```text
//! lifetree-journey [path/to/lifetree.yaml]
//! ```
//!
//! Set `narrator.url` (or `NARRATOR_URL`) to have stories written by the
//! narrator service.

mod driver;

use std::path::{Path, PathBuf};

use lifetree_core::LifetreeConfig;
use lifetree_core::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::driver::{Driver, narrator_client};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("lifetree.yaml"), PathBuf::from);
    let config = load_config(&path)?;
    init_logging(&config.logging);

    info!(
        config = %path.display(),
        lives = config.journey.lives,
        seed = ?config.journey.seed,
        narrator = ?config.narrator.url,
        "lifetree-journey starting"
    );

    let client = narrator_client(&config.narrator)?;
    let reports = Driver::new(&config, client).run().await;

    let final_karma = reports.last().map(|r| r.karma);
    info!(lives = reports.len(), final_karma = ?final_karma, "journey complete");

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<LifetreeConfig> {
    if path.exists() {
        Ok(LifetreeConfig::from_file(path)?)
    } else {
        Ok(LifetreeConfig::parse("")?)
    }
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
