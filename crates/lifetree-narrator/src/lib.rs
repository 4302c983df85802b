//! Narrator service and client for the Lifetree journey.
//!
//! The narrator is a small Axum HTTP service that turns a life into words
//! with the help of an LLM:
//!
//! - **`POST /generate-events`** asks the model for the event sequence of
//!   a new life, given the karma it inherits. The model's answer is
//!   parsed leniently and the universal events are restored.
//! - **`POST /generate-story`** asks the model to narrate a finished life
//!   from its consciousness history and the events it lived.
//! - **`GET /health`** is a liveness probe.
//!
//! # Architecture
//!
//! ```text
//! request --> StoryContext/EventsContext --> PromptEngine --> LlmBackend --> response
//! ```
//!
//! API keys come from a [`SecretStore`] at startup. The provider is chosen
//! per request: the configured preference first, then Anthropic, then
//! `OpenAI`. [`NarratorClient`] is the journey's side of the wire.
//!
//! [`SecretStore`]: secrets::SecretStore

pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod llm;
pub mod parse;
pub mod prompt;
pub mod router;
pub mod secrets;
pub mod server;
pub mod state;
pub mod story;

// Re-export primary types for convenience.
pub use client::NarratorClient;
pub use config::NarratorConfig;
pub use error::NarratorError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, start_server};
pub use state::AppState;
