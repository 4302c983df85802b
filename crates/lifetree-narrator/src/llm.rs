//! LLM backend abstraction and implementations.
//!
//! Enum dispatch over the two supported providers, avoiding the
//! dyn-compatibility issues with async trait methods. Both backends share
//! one `reqwest` client and send a system prompt plus one user message.
//! A non-2xx answer becomes [`NarratorError::Upstream`] carrying the
//! provider name, the status and the response body.

use lifetree_types::Provider;

use crate::config::NarratorConfig;
use crate::error::NarratorError;
use crate::prompt::RenderedPrompt;

/// Everything needed to call one provider.
#[derive(Debug, Clone)]
pub struct LlmBackendConfig {
    /// Which API dialect to speak.
    pub provider: Provider,
    /// Base API URL, without a trailing slash.
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Token cap for the completion.
    pub max_tokens: u32,
}

impl LlmBackendConfig {
    /// Settings for `provider` taken from the narrator configuration.
    pub fn from_narrator(config: &NarratorConfig, provider: Provider, api_key: String) -> Self {
        let settings = config.provider(provider);
        Self {
            provider,
            api_url: settings.api_url.clone(),
            api_key,
            model: settings.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

// ---------------------------------------------------------------------------
// Unified backend enum
// ---------------------------------------------------------------------------

/// An LLM backend that turns a prompt into text.
pub enum LlmBackend {
    /// `OpenAI` chat completions API.
    OpenAi(OpenAiBackend),
    /// Anthropic Messages API.
    Anthropic(AnthropicBackend),
}

impl LlmBackend {
    /// Send a prompt and return the response text.
    pub async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, NarratorError> {
        match self {
            Self::OpenAi(backend) => backend.complete(prompt).await,
            Self::Anthropic(backend) => backend.complete(prompt).await,
        }
    }

    /// The provider behind this backend.
    pub const fn provider(&self) -> Provider {
        match self {
            Self::OpenAi(_) => Provider::OpenAi,
            Self::Anthropic(_) => Provider::Anthropic,
        }
    }
}

// ---------------------------------------------------------------------------
// OpenAI backend
// ---------------------------------------------------------------------------

/// Backend for the `OpenAI` chat completions API.
///
/// Sends requests to `{api_url}/chat/completions`.
pub struct OpenAiBackend {
    client: reqwest::Client,
    config: LlmBackendConfig,
}

impl OpenAiBackend {
    /// Create a new `OpenAI` backend over a shared client.
    pub const fn new(client: reqwest::Client, config: LlmBackendConfig) -> Self {
        Self { client, config }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, NarratorError> {
        let url = format!("{}/chat/completions", self.config.api_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "messages": [
                {"role": "system", "content": prompt.system},
                {"role": "user", "content": prompt.user}
            ]
        });

        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body);

        let json = send(request, Provider::OpenAi).await?;
        extract_openai_content(&json)
    }
}

/// Extract the text content from an `OpenAI` chat completions response.
fn extract_openai_content(json: &serde_json::Value) -> Result<String, NarratorError> {
    json.get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| {
            NarratorError::Parse("OpenAI response missing choices[0].message.content".to_owned())
        })
}

// ---------------------------------------------------------------------------
// Anthropic Messages API backend
// ---------------------------------------------------------------------------

/// Backend for the Anthropic Messages API.
///
/// Anthropic differs from `OpenAI` in three ways: the key goes in
/// `x-api-key`, the system prompt is a top-level field, and the text
/// comes back in `content[0].text`.
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: LlmBackendConfig,
}

impl AnthropicBackend {
    /// Create a new Anthropic backend over a shared client.
    pub const fn new(client: reqwest::Client, config: LlmBackendConfig) -> Self {
        Self { client, config }
    }

    async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, NarratorError> {
        let url = format!("{}/messages", self.config.api_url);

        let body = serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": prompt.system,
            "messages": [
                {"role": "user", "content": prompt.user}
            ]
        });

        let request = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body);

        let json = send(request, Provider::Anthropic).await?;
        extract_anthropic_content(&json)
    }
}

/// Extract the text content from an Anthropic Messages API response.
fn extract_anthropic_content(json: &serde_json::Value) -> Result<String, NarratorError> {
    json.get("content")
        .and_then(|c| c.get(0))
        .and_then(|b| b.get("text"))
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or_else(|| NarratorError::Parse("Anthropic response missing content[0].text".to_owned()))
}

// ---------------------------------------------------------------------------
// Shared request path
// ---------------------------------------------------------------------------

async fn send(
    request: reqwest::RequestBuilder,
    provider: Provider,
) -> Result<serde_json::Value, NarratorError> {
    let response = request
        .send()
        .await
        .map_err(|e| NarratorError::Transport(format!("{provider} request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_owned());
        return Err(NarratorError::upstream(provider, status.as_u16(), error_body));
    }

    response
        .json()
        .await
        .map_err(|e| NarratorError::Parse(format!("{provider} response parse failed: {e}")))
}

/// Create an LLM backend from configuration.
pub fn create_backend(client: reqwest::Client, config: LlmBackendConfig) -> LlmBackend {
    match config.provider {
        Provider::OpenAi => LlmBackend::OpenAi(OpenAiBackend::new(client, config)),
        Provider::Anthropic => LlmBackend::Anthropic(AnthropicBackend::new(client, config)),
    }
}
