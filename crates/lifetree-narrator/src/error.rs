//! Error types for the narrator service and client.
//!
//! [`NarratorError`] covers every failure between a caller and the LLM
//! provider. It converts into an Axum HTTP response: bad requests map to
//! `400`, everything else to `500`, always with an `{error, status}` body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lifetree_types::Provider;
use tracing::warn;

/// Errors that can occur while narrating.
#[derive(Debug, thiserror::Error)]
pub enum NarratorError {
    /// No usable API key or provider is configured.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The provider (or the narrator service) answered with a non-2xx status.
    #[error("{provider} API error: {status} - {message}")]
    Upstream {
        /// Who answered: an LLM provider or `narrator`.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// The response text could not be turned into the expected shape.
    #[error("response parse error: {0}")]
    Parse(String),

    /// A prompt template failed to load or render.
    #[error("template error: {0}")]
    Template(String),

    /// The request body is missing required fields or is malformed.
    #[error("{0}")]
    BadRequest(String),

    /// The HTTP call itself failed (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// A story request is already outstanding on this client.
    #[error("story generation already in progress")]
    InFlight,

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl NarratorError {
    /// Build an upstream error for an LLM provider.
    pub fn upstream(provider: Provider, status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            provider: provider.as_str().to_owned(),
            status,
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with.
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for NarratorError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            warn!(error = %self, "request failed");
        }
        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_names_provider_and_status() {
        let err = NarratorError::upstream(Provider::Anthropic, 529, "overloaded");
        assert_eq!(err.to_string(), "anthropic API error: 529 - overloaded");
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            NarratorError::BadRequest("missing".to_owned()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            NarratorError::Configuration("no keys".to_owned()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            NarratorError::upstream(Provider::OpenAi, 401, "bad key").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
