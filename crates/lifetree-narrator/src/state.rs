//! Shared application state for the narrator service.
//!
//! [`AppState`] is built once at startup. It holds the configuration, the
//! API keys, the prompt templates and one pooled HTTP client; handlers
//! only read from it.

use lifetree_core::EventGenerator;

use crate::config::NarratorConfig;
use crate::error::NarratorError;
use crate::llm::{LlmBackend, LlmBackendConfig, create_backend};
use crate::prompt::PromptEngine;
use crate::secrets::{ApiKeys, SecretStore, select_provider};

/// State shared by all request handlers.
pub struct AppState {
    config: NarratorConfig,
    keys: ApiKeys,
    prompts: PromptEngine,
    http: reqwest::Client,
    generator: EventGenerator,
}

impl AppState {
    /// Assemble the state from already loaded parts.
    pub fn new(
        config: NarratorConfig,
        keys: ApiKeys,
        prompts: PromptEngine,
    ) -> Result<Self, NarratorError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| NarratorError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            keys,
            prompts,
            http,
            generator: EventGenerator::default(),
        })
    }

    /// Load keys from `store` and templates from the configured directory.
    pub fn load(config: NarratorConfig, store: &impl SecretStore) -> Result<Self, NarratorError> {
        let keys = store.load()?;
        let prompts = match &config.templates_dir {
            Some(dir) => PromptEngine::from_dir(dir)?,
            None => PromptEngine::builtin()?,
        };
        Self::new(config, keys, prompts)
    }

    /// A backend for the provider selected by the configured preference.
    pub fn backend(&self) -> Result<LlmBackend, NarratorError> {
        let (provider, api_key) = select_provider(self.config.preferred_provider, &self.keys)?;
        let config = LlmBackendConfig::from_narrator(&self.config, provider, api_key);
        Ok(create_backend(self.http.clone(), config))
    }

    /// The service configuration.
    pub const fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// The loaded API keys.
    pub const fn keys(&self) -> &ApiKeys {
        &self.keys
    }

    /// The prompt templates.
    pub const fn prompts(&self) -> &PromptEngine {
        &self.prompts
    }

    /// Used to restore universal events in LLM-generated lives.
    pub const fn generator(&self) -> &EventGenerator {
        &self.generator
    }
}
