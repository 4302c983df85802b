//! Axum router construction for the narrator service.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the narrator router.
///
/// - `GET /health`
/// - `POST /generate-events`
/// - `POST /generate-story`
///
/// CORS allows any origin: the browser front end calls the service
/// directly from wherever it is hosted.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/generate-events", post(handlers::generate_events))
        .route("/generate-story", post(handlers::generate_story))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
