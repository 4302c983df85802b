//! API key retrieval and provider selection.
//!
//! Keys are loaded once at startup through a [`SecretStore`] and kept in
//! the application state. A missing key is not an error until a request
//! actually needs an LLM.

use std::path::PathBuf;

use lifetree_types::Provider;
use serde::Deserialize;

use crate::error::NarratorError;

/// The LLM API keys. Same shape as the JSON secret document.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiKeys {
    /// Anthropic API key.
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    /// `OpenAI` API key.
    #[serde(default)]
    pub openai_api_key: Option<String>,
}

impl ApiKeys {
    /// The key for `provider`, if present and non-empty.
    pub fn key(&self, provider: Provider) -> Option<&str> {
        let key = match provider {
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
            Provider::OpenAi => self.openai_api_key.as_deref(),
        };
        key.map(str::trim).filter(|k| !k.is_empty())
    }

    /// Whether at least one key is available.
    pub fn any(&self) -> bool {
        self.key(Provider::Anthropic).is_some() || self.key(Provider::OpenAi).is_some()
    }
}

impl core::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiKeys")
            .field("anthropic_api_key", &self.key(Provider::Anthropic).map(|_| "<redacted>"))
            .field("openai_api_key", &self.key(Provider::OpenAi).map(|_| "<redacted>"))
            .finish()
    }
}

/// Pick the provider to call and its key.
///
/// The preferred provider wins when its key is present; otherwise
/// Anthropic, then `OpenAI`.
pub fn select_provider(preferred: Provider, keys: &ApiKeys) -> Result<(Provider, String), NarratorError> {
    [preferred, Provider::Anthropic, Provider::OpenAi]
        .into_iter()
        .find_map(|p| keys.key(p).map(|k| (p, k.to_owned())))
        .ok_or_else(|| NarratorError::Configuration("No API keys configured".to_owned()))
}

/// A source of API keys.
pub trait SecretStore {
    /// Load the keys.
    fn load(&self) -> Result<ApiKeys, NarratorError>;
}

/// Reads `ANTHROPIC_API_KEY` and `OPENAI_API_KEY` from the environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn load(&self) -> Result<ApiKeys, NarratorError> {
        Ok(ApiKeys {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
        })
    }
}

/// Reads a JSON document `{"anthropic_api_key": ..., "openai_api_key": ...}`.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// A store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SecretStore for FileSecretStore {
    fn load(&self) -> Result<ApiKeys, NarratorError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            NarratorError::Configuration(format!(
                "failed to read secrets file {}: {e}",
                self.path.display()
            ))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            NarratorError::Configuration(format!(
                "invalid secrets file {}: {e}",
                self.path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(anthropic: Option<&str>, openai: Option<&str>) -> ApiKeys {
        ApiKeys {
            anthropic_api_key: anthropic.map(ToOwned::to_owned),
            openai_api_key: openai.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn preferred_provider_wins_when_keyed() {
        let both = keys(Some("a-key"), Some("o-key"));
        let selected = select_provider(Provider::OpenAi, &both);
        assert!(matches!(selected, Ok((Provider::OpenAi, ref k)) if k == "o-key"));
    }

    #[test]
    fn falls_back_to_anthropic_then_openai() {
        let only_anthropic = keys(Some("a-key"), None);
        assert!(matches!(
            select_provider(Provider::OpenAi, &only_anthropic),
            Ok((Provider::Anthropic, _))
        ));

        let only_openai = keys(None, Some("o-key"));
        assert!(matches!(
            select_provider(Provider::Anthropic, &only_openai),
            Ok((Provider::OpenAi, _))
        ));
    }

    #[test]
    fn no_keys_is_a_configuration_error() {
        let empty = keys(None, Some("   "));
        assert!(!empty.any());
        assert!(matches!(
            select_provider(Provider::Anthropic, &empty),
            Err(NarratorError::Configuration(_))
        ));
    }

    #[test]
    fn debug_redacts_keys() {
        let printed = format!("{:?}", keys(Some("sk-secret"), None));
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("redacted"));
    }

    #[test]
    fn file_store_reads_secret_document() {
        let path = std::env::temp_dir().join(format!(
            "lifetree_secrets_{}_{:?}.json",
            std::process::id(),
            std::thread::current().id(),
        ));
        std::fs::write(&path, r#"{"anthropic_api_key": "a-key"}"#).ok();

        let loaded = FileSecretStore::new(&path).load();
        std::fs::remove_file(&path).ok();

        assert!(loaded.is_ok());
        let loaded = loaded.ok().unwrap_or_default();
        assert_eq!(loaded.key(Provider::Anthropic), Some("a-key"));
        assert_eq!(loaded.key(Provider::OpenAi), None);
    }

    #[test]
    fn missing_file_is_a_configuration_error() {
        let store = FileSecretStore::new("/nonexistent/lifetree/secrets.json");
        assert!(matches!(store.load(), Err(NarratorError::Configuration(_))));
    }
}
