//! HTTP endpoint handlers for the narrator service.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/health` | Liveness probe |
//! | `POST` | `/generate-events` | Event sequence for a new life |
//! | `POST` | `/generate-story` | Narrative of a finished life |
//!
//! Bodies are taken as raw bytes and decoded here so that malformed JSON
//! is reported with the same `{error, status}` shape as every other error.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use chrono::Utc;
use lifetree_types::{
    GenerateEventsRequest, GenerateEventsResponse, Karma, StoryRequest, StoryResponse,
};
use tracing::info;

use crate::error::NarratorError;
use crate::parse::parse_events;
use crate::state::AppState;
use crate::story::{EventsContext, StoryContext};

/// Fields a story request cannot do without.
const STORY_REQUIRED_FIELDS: [&str; 2] = ["history", "events"];

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Liveness probe. Never touches the LLM.
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// POST /generate-events
// ---------------------------------------------------------------------------

/// Ask the LLM for the events of a life inheriting the requested karma.
///
/// An empty body is treated as `{}`, so karma defaults to neutral. The
/// universal events are restored on whatever the model returns.
pub async fn generate_events(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<GenerateEventsResponse>, NarratorError> {
    let request: GenerateEventsRequest = if body.is_empty() {
        GenerateEventsRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| NarratorError::BadRequest(format!("invalid request body: {e}")))?
    };
    let karma = Karma::new(request.karma.value());

    let prompt = state.prompts().render_events(&EventsContext::new(karma))?;
    let backend = state.backend()?;
    let provider = backend.provider();
    info!(%provider, %karma, "generating life events");

    let text = backend.complete(&prompt).await?;
    let events = state.generator().with_universal_events(parse_events(&text)?);
    info!(%provider, events = events.len(), "life events generated");

    Ok(Json(GenerateEventsResponse {
        events,
        karma,
        provider,
        timestamp: Utc::now(),
    }))
}

// ---------------------------------------------------------------------------
// POST /generate-story
// ---------------------------------------------------------------------------

/// Ask the LLM to narrate a finished life.
///
/// The body is validated before any provider is chosen, so a malformed
/// request is a `400` even when no API key is configured.
pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<StoryResponse>, NarratorError> {
    let request = decode_story_request(&body)?;
    let karma = Karma::new(request.karma.value());
    let context = StoryContext::from_request(&request)?;
    let prompt = state.prompts().render_story(&context)?;

    let backend = state.backend()?;
    let provider = backend.provider();
    info!(
        %provider,
        %karma,
        samples = request.history.len(),
        events = request.events.len(),
        "generating story"
    );

    let story = backend.complete(&prompt).await?.trim().to_owned();

    Ok(Json(StoryResponse {
        story,
        provider,
        karma,
        timestamp: Utc::now(),
    }))
}

fn decode_story_request(body: &[u8]) -> Result<StoryRequest, NarratorError> {
    let value: serde_json::Value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(body)
            .map_err(|e| NarratorError::BadRequest(format!("invalid request body: {e}")))?
    };

    let complete = STORY_REQUIRED_FIELDS
        .iter()
        .all(|field| value.get(field).is_some_and(|v| !v.is_null()));
    if !complete {
        return Err(NarratorError::BadRequest(format!(
            "Missing required fields: {}",
            STORY_REQUIRED_FIELDS.join(", ")
        )));
    }

    serde_json::from_value(value)
        .map_err(|e| NarratorError::BadRequest(format!("invalid story request: {e}")))
}
