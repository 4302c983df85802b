//! Request and response bodies exchanged with the narrator service.
//!
//! Field names are camelCase where the browser front end expects it
//! (`finalConsciousness`) and otherwise match the in-memory model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::{ConsciousnessSample, Karma, LifeEvent, TriggeredEvent};

/// Upstream LLM provider that produced a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Provider {
    /// Anthropic Messages API.
    Anthropic,
    /// `OpenAI` chat completions API.
    OpenAi,
}

impl Provider {
    /// Lowercase name used on the wire and in error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
        }
    }

    /// Parse a provider name, accepting a few common aliases.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Some(Self::Anthropic),
            "openai" | "gpt" => Some(Self::OpenAi),
            _ => None,
        }
    }
}

impl core::fmt::Display for Provider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /generate-events`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GenerateEventsRequest {
    /// Karma inherited from the previous life. Missing means neutral.
    #[serde(default)]
    pub karma: Karma,
}

/// Response of `POST /generate-events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GenerateEventsResponse {
    /// Complete event sequence, universal events included, sorted by time.
    pub events: Vec<LifeEvent>,
    /// Karma the events were generated for.
    pub karma: Karma,
    /// Provider that generated the events.
    pub provider: Provider,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Body of `POST /generate-story`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoryRequest {
    /// Sub-sampled consciousness history of the finished life.
    pub history: Vec<ConsciousnessSample>,
    /// Events that fired during the life.
    pub events: Vec<TriggeredEvent>,
    /// Karma computed for the finished life.
    #[serde(default)]
    pub karma: Karma,
    /// Consciousness at the moment of death.
    #[serde(rename = "finalConsciousness", default)]
    pub final_consciousness: f64,
}

/// Response of `POST /generate-story`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StoryResponse {
    /// The narrative text.
    pub story: String,
    /// Provider that wrote the story.
    pub provider: Provider,
    /// Karma echoed back from the request.
    pub karma: Karma,
    /// When the response was produced.
    pub timestamp: DateTime<Utc>,
}

/// Body returned by the narrator for any non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorBody {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_request_defaults_to_neutral() {
        let req: Result<GenerateEventsRequest, _> = serde_json::from_str("{}");
        assert!(req.is_ok_and(|r| r.karma == Karma::NEUTRAL));
    }

    #[test]
    fn story_request_uses_camel_case_final_consciousness() {
        let raw = r#"{
            "history": [{"p": 0.0, "c": 0.1, "t": 1}],
            "events": [],
            "karma": 0.2,
            "finalConsciousness": 0.4
        }"#;
        let req: Result<StoryRequest, _> = serde_json::from_str(raw);
        assert!(req.is_ok());
        let req = req.ok();
        assert_eq!(req.as_ref().map(|r| r.history.len()), Some(1));
        assert!(req.is_some_and(|r| (r.final_consciousness - 0.4).abs() < 1e-12));
    }

    #[test]
    fn provider_wire_names() {
        assert_eq!(serde_json::to_string(&Provider::OpenAi).unwrap_or_default(), "\"openai\"");
        assert_eq!(Provider::parse("Claude"), Some(Provider::Anthropic));
        assert_eq!(Provider::parse("openai"), Some(Provider::OpenAi));
        assert_eq!(Provider::parse("mistral"), None);
    }
}
