//! Per-life recording of consciousness and triggered events.
//!
//! The recorder is fed every frame but keeps only one sample every
//! `sample_interval` frames. At the end of a life it hands out the
//! summary, the karma and the payload for the story endpoint. Scoring and
//! narration both refuse lives with fewer than `min_samples` samples.

use chrono::Utc;
use lifetree_types::{ConsciousnessSample, Karma, LifeSummary, Outcome, StoryRequest, TriggeredEvent};

use crate::config::{RecordingConfig, ScoringConfig};
use crate::error::LifeError;
use crate::scorer;

/// Collects the record of one life.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeRecorder {
    sample_interval: u32,
    min_samples: usize,
    frames: u32,
    history: Vec<ConsciousnessSample>,
    events: Vec<TriggeredEvent>,
}

impl LifeRecorder {
    /// Create an empty recorder. An interval of zero is treated as one.
    pub fn new(recording: &RecordingConfig, scoring: &ScoringConfig) -> Self {
        Self {
            sample_interval: recording.sample_interval.max(1),
            min_samples: scoring.min_samples,
            frames: 0,
            history: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Count a frame, sampling it with the current wall-clock time if it
    /// falls on the interval.
    pub fn record(&mut self, progress: f64, consciousness: f64) {
        self.record_at(progress, consciousness, Utc::now().timestamp_millis());
    }

    /// Count a frame with an explicit timestamp.
    pub fn record_at(&mut self, progress: f64, consciousness: f64, timestamp_ms: i64) {
        self.frames = self.frames.saturating_add(1);
        if self.frames.checked_rem(self.sample_interval) == Some(0) {
            self.history.push(ConsciousnessSample {
                progress,
                consciousness,
                timestamp_ms,
            });
        }
    }

    /// Log an event that fired.
    pub fn record_event(&mut self, event: TriggeredEvent) {
        self.events.push(event);
    }

    /// Forget everything and start a new life.
    pub fn reset(&mut self) {
        self.frames = 0;
        self.history.clear();
        self.events.clear();
    }

    /// Samples kept so far.
    pub fn history(&self) -> &[ConsciousnessSample] {
        &self.history
    }

    /// Events fired so far.
    pub fn events(&self) -> &[TriggeredEvent] {
        &self.events
    }

    /// Frames seen since the last reset.
    pub const fn frames(&self) -> u32 {
        self.frames
    }

    /// Whether enough samples exist to score or narrate the life.
    pub fn has_enough_data(&self) -> bool {
        self.history.len() >= self.min_samples
    }

    /// Aggregate statistics, or `None` before the first sample.
    pub fn summary(&self) -> Option<LifeSummary> {
        let last = self.history.last()?;
        let mean = self
            .history
            .iter()
            .map(|s| s.consciousness)
            .sum::<f64>()
            / count_as_f64(self.history.len());
        let max = self
            .history
            .iter()
            .map(|s| s.consciousness)
            .fold(f64::NEG_INFINITY, f64::max);
        let min = self
            .history
            .iter()
            .map(|s| s.consciousness)
            .fold(f64::INFINITY, f64::min);

        let count = |outcome: Outcome| {
            u32::try_from(self.events.iter().filter(|e| e.outcome == outcome).count())
                .unwrap_or(u32::MAX)
        };

        Some(LifeSummary {
            average_consciousness: mean,
            max_consciousness: max,
            min_consciousness: min,
            final_consciousness: last.consciousness,
            total_events: u32::try_from(self.events.len()).unwrap_or(u32::MAX),
            transmuted: count(Outcome::Transmuted),
            fallen: count(Outcome::Fallen),
            neutral: count(Outcome::Neutral),
        })
    }

    /// Karma of the recorded life.
    pub fn karma(&self) -> Result<Karma, LifeError> {
        self.ensure_enough_data()?;
        Ok(scorer::score(&self.history, &self.events))
    }

    /// Payload for the story endpoint, carrying the given karma.
    pub fn story_request(&self, karma: Karma) -> Result<StoryRequest, LifeError> {
        self.ensure_enough_data()?;
        let final_consciousness = self.history.last().map_or(0.0, |s| s.consciousness);
        Ok(StoryRequest {
            history: self.history.clone(),
            events: self.events.clone(),
            karma,
            final_consciousness,
        })
    }

    fn ensure_enough_data(&self) -> Result<(), LifeError> {
        if self.has_enough_data() && !self.history.is_empty() {
            Ok(())
        } else {
            Err(LifeError::InsufficientData {
                recorded: self.history.len(),
                required: self.min_samples.max(1),
            })
        }
    }
}

impl Default for LifeRecorder {
    fn default() -> Self {
        Self::new(&RecordingConfig::default(), &ScoringConfig::default())
    }
}

fn count_as_f64(n: usize) -> f64 {
    u32::try_from(n).map_or(f64::from(u32::MAX), f64::from)
}
