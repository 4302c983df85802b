//! Configuration types for the narrator service.
//!
//! All configuration is loaded from environment variables. API keys are
//! not part of this struct; they come from a [`SecretStore`] at startup.
//!
//! [`SecretStore`]: crate::secrets::SecretStore

use std::path::PathBuf;
use std::time::Duration;

use lifetree_types::Provider;

use crate::error::NarratorError;

/// Default Anthropic Messages API base URL.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";

/// Default `OpenAI` API base URL.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// Complete narrator configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarratorConfig {
    /// Host address to bind to.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Provider tried first when its key is present.
    pub preferred_provider: Provider,
    /// JSON secrets file holding the API keys. Falls back to environment
    /// variables when unset.
    pub secrets_file: Option<PathBuf>,
    /// Anthropic endpoint and model.
    pub anthropic: ProviderSettings,
    /// `OpenAI` endpoint and model.
    pub openai: ProviderSettings,
    /// Directory with prompt template overrides.
    pub templates_dir: Option<PathBuf>,
    /// Deadline for one LLM call.
    pub request_timeout: Duration,
    /// Token cap for every completion.
    pub max_tokens: u32,
}

/// Where and which model to call for one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// Model identifier.
    pub model: String,
}

impl NarratorConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `NARRATOR_HOST` -- bind address (default `0.0.0.0`)
    /// - `NARRATOR_PORT` -- bind port (default `8787`)
    /// - `LLM_PROVIDER` -- `anthropic` or `openai` (default `anthropic`)
    /// - `LLM_SECRETS_FILE` -- path to a JSON secrets file
    /// - `ANTHROPIC_API_URL` / `ANTHROPIC_MODEL`
    /// - `OPENAI_API_URL` / `OPENAI_MODEL`
    /// - `TEMPLATES_DIR` -- prompt template overrides
    /// - `REQUEST_TIMEOUT_MS` -- LLM call deadline (default 30000)
    /// - `LLM_MAX_TOKENS` -- completion token cap (default 500)
    pub fn from_env() -> Result<Self, NarratorError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NarratorError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var("NARRATOR_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse_var(var("NARRATOR_PORT"), "NARRATOR_PORT", 8787_u16)?;

        let preferred_provider = match var("LLM_PROVIDER") {
            Some(raw) => Provider::parse(&raw).ok_or_else(|| {
                NarratorError::Configuration(format!("unknown LLM_PROVIDER: {raw}"))
            })?,
            None => Provider::Anthropic,
        };

        let anthropic = ProviderSettings {
            api_url: trim_url(&var("ANTHROPIC_API_URL").unwrap_or_else(|| ANTHROPIC_API_URL.to_owned())),
            model: var("ANTHROPIC_MODEL").unwrap_or_else(|| "claude-sonnet-4-20250514".to_owned()),
        };
        let openai = ProviderSettings {
            api_url: trim_url(&var("OPENAI_API_URL").unwrap_or_else(|| OPENAI_API_URL.to_owned())),
            model: var("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_owned()),
        };

        let timeout_ms = parse_var(var("REQUEST_TIMEOUT_MS"), "REQUEST_TIMEOUT_MS", 30_000_u64)?;
        let max_tokens = parse_var(var("LLM_MAX_TOKENS"), "LLM_MAX_TOKENS", 500_u32)?;

        Ok(Self {
            host,
            port,
            preferred_provider,
            secrets_file: var("LLM_SECRETS_FILE").map(PathBuf::from),
            anthropic,
            openai,
            templates_dir: var("TEMPLATES_DIR").map(PathBuf::from),
            request_timeout: Duration::from_millis(timeout_ms),
            max_tokens,
        })
    }

    /// Settings for one provider.
    pub const fn provider(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Anthropic => &self.anthropic,
            Provider::OpenAi => &self.openai,
        }
    }
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_owned(),
            port: 8787,
            preferred_provider: Provider::Anthropic,
            secrets_file: None,
            anthropic: ProviderSettings {
                api_url: ANTHROPIC_API_URL.to_owned(),
                model: "claude-sonnet-4-20250514".to_owned(),
            },
            openai: ProviderSettings {
                api_url: OPENAI_API_URL.to_owned(),
                model: "gpt-4o".to_owned(),
            },
            templates_dir: None,
            request_timeout: Duration::from_secs(30),
            max_tokens: 500,
        }
    }
}

/// Parse an optional variable, falling back to `default` when unset.
fn parse_var<T>(raw: Option<String>, name: &str, default: T) -> Result<T, NarratorError>
where
    T: std::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.map_or(Ok(default), |v| {
        v.trim()
            .parse()
            .map_err(|e| NarratorError::Configuration(format!("invalid {name}: {e}")))
    })
}

fn trim_url(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}
