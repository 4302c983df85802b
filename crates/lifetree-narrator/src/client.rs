//! HTTP client for the narrator service.
//!
//! Used by the journey to fetch remote event sequences and stories. At
//! most one story request is outstanding per client; a second concurrent
//! call fails fast with [`NarratorError::InFlight`] instead of queueing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lifetree_types::{
    ErrorBody, GenerateEventsRequest, GenerateEventsResponse, Karma, StoryRequest, StoryResponse,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::NarratorError;

/// Client of one narrator service.
#[derive(Debug)]
pub struct NarratorClient {
    http: reqwest::Client,
    base_url: String,
    story_in_flight: AtomicBool,
}

impl NarratorClient {
    /// Client for the service at `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NarratorError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NarratorError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            story_in_flight: AtomicBool::new(false),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a story request is currently outstanding.
    pub fn story_in_flight(&self) -> bool {
        self.story_in_flight.load(Ordering::Acquire)
    }

    /// `POST /generate-events` for a life inheriting `karma`.
    pub async fn generate_events(&self, karma: Karma) -> Result<GenerateEventsResponse, NarratorError> {
        self.post("generate-events", &GenerateEventsRequest { karma })
            .await
    }

    /// `POST /generate-story` for a finished life.
    ///
    /// Fails with [`NarratorError::InFlight`] while another story request
    /// from this client has not completed.
    pub async fn generate_story(&self, request: &StoryRequest) -> Result<StoryResponse, NarratorError> {
        let _guard = InFlightGuard::acquire(&self.story_in_flight)?;
        self.post("generate-story", request).await
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, NarratorError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "calling narrator");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| NarratorError::Transport(format!("narrator request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| NarratorError::Transport(format!("narrator body read failed: {e}")))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text).map_or(text, |body| body.error);
            return Err(NarratorError::Upstream {
                provider: "narrator".to_owned(),
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Holds the in-flight flag for the duration of one request.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, NarratorError> {
        if flag
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(NarratorError::InFlight);
        }
        Ok(Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
