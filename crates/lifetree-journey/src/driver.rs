//! The headless life loop.
//!
//! [`Driver`] plays lives with a [`Pilot`] at the controls. When a
//! narrator is configured it asks it for each life's events, falling back
//! to local generation on any failure, and for a story when a scored life
//! ends.

use std::time::Duration;

use lifetree_core::config::NarratorClientConfig;
use lifetree_core::{EventCatalog, EventGenerator, Journey, LifeEnded, LifetreeConfig, Pilot};
use lifetree_narrator::NarratorClient;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

/// Plays a fixed number of lives.
pub struct Driver {
    journey: Journey<SmallRng>,
    pilot: Pilot,
    pilot_rng: SmallRng,
    narrator: Option<NarratorClient>,
    settings: NarratorClientConfig,
    lives: u32,
}

impl Driver {
    /// Build the journey from configuration.
    ///
    /// With `journey.seed` set, both the event sampling and the pilot are
    /// reproducible.
    pub fn new(config: &LifetreeConfig, narrator: Option<NarratorClient>) -> Self {
        let mut rng = match config.journey.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };
        let pilot_rng = SmallRng::seed_from_u64(rng.random());
        let generator = EventGenerator::new(EventCatalog::default(), config.generation.clone());

        Self {
            journey: Journey::new(config, generator, rng),
            pilot: Pilot::from_config(&config.journey),
            pilot_rng,
            narrator,
            settings: config.narrator.clone(),
            lives: config.journey.lives,
        }
    }

    /// Play every life and return their reports in order.
    pub async fn run(mut self) -> Vec<LifeEnded> {
        let mut reports = Vec::new();
        self.refresh_events().await;

        while self.journey.lives_completed() < self.lives {
            let consciousness = self.pilot.steer(&mut self.pilot_rng);
            let Some(ended) = self.journey.step(consciousness).ended else {
                continue;
            };

            info!(
                life = %ended.life,
                karma = %ended.karma,
                scored = ended.scored.is_some(),
                average = ended.summary.as_ref().map_or(0.0, |s| s.average_consciousness),
                transmuted = ended.summary.as_ref().map_or(0, |s| s.transmuted),
                fallen = ended.summary.as_ref().map_or(0, |s| s.fallen),
                "life report"
            );
            self.narrate(&ended).await;
            reports.push(ended);

            if self.journey.lives_completed() < self.lives {
                self.refresh_events().await;
            }
        }

        reports
    }

    /// Replace the local events of the current life with the narrator's.
    async fn refresh_events(&mut self) {
        if !self.settings.remote_events {
            return;
        }
        let Some(client) = &self.narrator else {
            return;
        };

        match client.generate_events(self.journey.karma()).await {
            Ok(response) => {
                info!(
                    provider = %response.provider,
                    events = response.events.len(),
                    "using narrator events"
                );
                self.journey.replace_events(response.events);
            }
            Err(e) => warn!(error = %e, "narrator events unavailable, using local generation"),
        }
    }

    async fn narrate(&self, ended: &LifeEnded) {
        if !self.settings.stories {
            return;
        }
        let (Some(client), Some(request)) = (&self.narrator, &ended.story) else {
            return;
        };

        match client.generate_story(request).await {
            Ok(response) => info!(
                life = %ended.life,
                provider = %response.provider,
                story = response.story,
                "story received"
            ),
            Err(e) => warn!(life = %ended.life, error = %e, "story generation failed"),
        }
    }
}

/// Client for the configured narrator, if any.
pub fn narrator_client(settings: &NarratorClientConfig) -> anyhow::Result<Option<NarratorClient>> {
    let Some(url) = &settings.url else {
        return Ok(None);
    };
    let timeout = Duration::from_millis(settings.request_timeout_ms);
    Ok(Some(NarratorClient::new(url.clone(), timeout)?))
}
