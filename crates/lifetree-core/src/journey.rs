//! The closed life cycle: generate, play, record, score, generate again.
//!
//! [`Journey`] owns everything one player needs and advances one frame per
//! [`Journey::step`]. When the cursor runs past the end of the life the
//! life is scored, a [`LifeEnded`] report is handed back and the next life
//! starts immediately from the new karma. [`Pilot`] stands in for the
//! keyboard when nobody is at the controls.

use lifetree_types::{Karma, LifeEvent, LifeId, LifeSummary, StoryRequest, TriggeredEvent};
use rand::Rng;
use tracing::{debug, info};

use crate::config::{JourneyConfig, LifetreeConfig};
use crate::generator::EventGenerator;
use crate::playback::Playback;
use crate::recorder::LifeRecorder;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// Scripted consciousness driver.
///
/// Moves in fixed steps rounded to one decimal and clamped to `[-1, 1]`,
/// the same way the keyboard controller does.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pilot {
    value: f64,
    step: f64,
    change_chance: f64,
}

impl Pilot {
    /// A pilot starting at zero consciousness.
    pub const fn new(step: f64, change_chance: f64) -> Self {
        Self {
            value: 0.0,
            step,
            change_chance,
        }
    }

    /// Build from the journey configuration.
    pub const fn from_config(config: &JourneyConfig) -> Self {
        Self::new(config.pilot_step, config.pilot_change_chance)
    }

    /// Current consciousness.
    pub const fn value(&self) -> f64 {
        self.value
    }

    /// Move by `delta`, rounding to one decimal and clamping.
    pub fn nudge(&mut self, delta: f64) -> f64 {
        let next = ((self.value + delta) * 10.0).round() / 10.0;
        self.value = next.clamp(-1.0, 1.0);
        self.value
    }

    /// Raise consciousness by one step.
    pub fn raise(&mut self) -> f64 {
        self.nudge(self.step)
    }

    /// Lower consciousness by one step.
    pub fn lower(&mut self) -> f64 {
        self.nudge(-self.step)
    }

    /// Possibly nudge up or down this frame, then report the value.
    pub fn steer(&mut self, rng: &mut impl Rng) -> f64 {
        if rng.random_bool(self.change_chance.clamp(0.0, 1.0)) {
            if rng.random_bool(0.5) {
                self.raise();
            } else {
                self.lower();
            }
        }
        self.value
    }
}

impl Default for Pilot {
    fn default() -> Self {
        Self::from_config(&JourneyConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Journey
// ---------------------------------------------------------------------------

/// Report of a life that just ended.
#[derive(Debug, Clone, PartialEq)]
pub struct LifeEnded {
    /// The life that ended.
    pub life: LifeId,
    /// Karma carried into the next life.
    pub karma: Karma,
    /// Karma scored from this life, `None` when too little was recorded.
    pub scored: Option<Karma>,
    /// Statistics of the recorded life.
    pub summary: Option<LifeSummary>,
    /// Story payload, present only when the life could be scored.
    pub story: Option<StoryRequest>,
}

/// Outcome of one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Step {
    /// Events that fired on this frame.
    pub triggered: Vec<TriggeredEvent>,
    /// Set on the frame the life ended.
    pub ended: Option<LifeEnded>,
}

/// One player's endless sequence of lives.
#[derive(Debug)]
pub struct Journey<R: Rng> {
    generator: EventGenerator,
    rng: R,
    playback: Playback,
    recorder: LifeRecorder,
    speed: f64,
    progress: f64,
    karma: Karma,
    life: LifeId,
    lives_completed: u32,
}

impl<R: Rng> Journey<R> {
    /// Start a first life with neutral karma.
    pub fn new(config: &LifetreeConfig, generator: EventGenerator, mut rng: R) -> Self {
        let karma = Karma::NEUTRAL;
        let events = generator.generate(karma, &mut rng);
        let life = LifeId::new();
        info!(life = %life, karma = %karma, events = events.len(), "life started");

        Self {
            generator,
            rng,
            playback: Playback::new(events),
            recorder: LifeRecorder::new(&config.recording, &config.scoring),
            speed: config.journey.speed,
            progress: 0.0,
            karma,
            life,
            lives_completed: 0,
        }
    }

    /// Advance one frame at the given consciousness.
    pub fn step(&mut self, consciousness: f64) -> Step {
        let consciousness = consciousness.clamp(-1.0, 1.0);
        self.progress += self.speed;

        if self.progress > 1.0 {
            let triggered = self.fire_events(1.0, consciousness);
            return Step {
                triggered,
                ended: Some(self.end_life()),
            };
        }

        let triggered = self.fire_events(self.progress, consciousness);
        self.recorder.record(self.progress, consciousness);

        Step {
            triggered,
            ended: None,
        }
    }

    /// Fire the events reached at `progress` and record them.
    fn fire_events(&mut self, progress: f64, consciousness: f64) -> Vec<TriggeredEvent> {
        let triggered = self.playback.advance(progress, consciousness);
        for event in &triggered {
            debug!(
                life = %self.life,
                event = %event.name,
                age = event.age,
                outcome = %event.outcome,
                "event triggered"
            );
            self.recorder.record_event(event.clone());
        }
        triggered
    }

    /// Replace the current life's events with an external sequence.
    ///
    /// The universal events are restored and the list is sorted. Playback
    /// restarts from the beginning of the current life.
    pub fn replace_events(&mut self, events: Vec<LifeEvent>) {
        let events = self.generator.with_universal_events(events);
        debug!(life = %self.life, events = events.len(), "life events replaced");
        self.playback.replace_events(events);
    }

    /// Karma the current life was generated from.
    pub const fn karma(&self) -> Karma {
        self.karma
    }

    /// Identifier of the current life.
    pub const fn life(&self) -> LifeId {
        self.life
    }

    /// Cursor position of the current life.
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Lives that have ended so far.
    pub const fn lives_completed(&self) -> u32 {
        self.lives_completed
    }

    /// Playback state of the current life.
    pub const fn playback(&self) -> &Playback {
        &self.playback
    }

    fn end_life(&mut self) -> LifeEnded {
        let summary = self.recorder.summary();
        let scored = match self.recorder.karma() {
            Ok(karma) => Some(karma),
            Err(e) => {
                info!(life = %self.life, error = %e, "life not scored, keeping previous karma");
                None
            }
        };
        let karma = scored.unwrap_or(self.karma);
        let story = scored.and_then(|k| self.recorder.story_request(k).ok());

        info!(
            life = %self.life,
            karma = %karma,
            tone = karma.tone(),
            samples = self.recorder.history().len(),
            events = self.recorder.events().len(),
            "life ended"
        );

        let ended = LifeEnded {
            life: self.life,
            karma,
            scored,
            summary,
            story,
        };

        self.lives_completed = self.lives_completed.saturating_add(1);
        self.karma = karma;
        self.life = LifeId::new();
        self.progress = 0.0;
        self.recorder.reset();

        let events = self.generator.generate(karma, &mut self.rng);
        info!(life = %self.life, karma = %karma, events = events.len(), "life started");
        self.playback.replace_events(events);

        ended
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn journey(seed: u64) -> Journey<SmallRng> {
        Journey::new(
            &LifetreeConfig::default(),
            EventGenerator::default(),
            SmallRng::seed_from_u64(seed),
        )
    }

    fn play_life(journey: &mut Journey<SmallRng>, consciousness: f64) -> (Vec<TriggeredEvent>, LifeEnded) {
        let mut fired = Vec::new();
        loop {
            let step = journey.step(consciousness);
            fired.extend(step.triggered);
            if let Some(ended) = step.ended {
                return (fired, ended);
            }
        }
    }

    #[test]
    fn pilot_rounds_and_clamps() {
        let mut pilot = Pilot::new(0.1, 0.0);
        for _ in 0..3 {
            pilot.raise();
        }
        assert!((pilot.value() - 0.3).abs() < f64::EPSILON);

        for _ in 0..20 {
            pilot.lower();
        }
        assert!((pilot.value() + 1.0).abs() < f64::EPSILON);

        assert!((pilot.nudge(0.04) + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn pilot_without_chance_never_moves() {
        let mut pilot = Pilot::new(0.1, 0.0);
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(pilot.steer(&mut rng).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn pilot_with_certain_chance_always_moves() {
        let mut pilot = Pilot::new(0.1, 1.0);
        let mut rng = SmallRng::seed_from_u64(1);
        let before = pilot.value();
        let after = pilot.steer(&mut rng);
        assert!((after - before).abs() > 0.05);
    }

    #[test]
    fn a_life_fires_every_event_and_ends() {
        let mut journey = journey(7);
        let expected = journey.playback().events().len();
        let (fired, ended) = play_life(&mut journey, 0.0);

        assert_eq!(fired.len(), expected);
        assert_eq!(fired.first().map(|e| e.name.as_str()), Some("Birth"));
        assert_eq!(fired.last().map(|e| e.name.as_str()), Some("Death"));
        assert!(ended.scored.is_some());
        assert!(ended.story.is_some());
        assert_eq!(journey.lives_completed(), 1);
    }

    #[test]
    fn light_life_carries_light_karma() {
        let mut journey = journey(3);
        let first = journey.life();
        let (_, ended) = play_life(&mut journey, 0.8);

        assert_eq!(ended.life, first);
        assert_ne!(journey.life(), first);
        assert!(ended.karma.value() > 0.8);
        assert_eq!(journey.karma(), ended.karma);
        assert!(journey.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn short_life_keeps_previous_karma() {
        let mut config = LifetreeConfig::default();
        config.journey.speed = 0.05;
        let mut journey = Journey::new(&config, EventGenerator::default(), SmallRng::seed_from_u64(9));
        let (_, ended) = play_life(&mut journey, 0.9);

        assert!(ended.scored.is_none());
        assert!(ended.story.is_none());
        assert_eq!(ended.karma, Karma::NEUTRAL);
        assert!(ended.summary.is_some());
    }

    #[test]
    fn coarse_speed_still_fires_death() {
        let mut config = LifetreeConfig::default();
        config.journey.speed = 0.02;
        let mut journey = Journey::new(&config, EventGenerator::default(), SmallRng::seed_from_u64(11));
        let expected = journey.playback().events().len();
        let (fired, ended) = play_life(&mut journey, 0.5);

        assert_eq!(fired.len(), expected);
        assert_eq!(fired.last().map(|e| e.name.as_str()), Some("Death"));
        assert_eq!(
            ended.summary.map(|s| s.total_events),
            u32::try_from(expected).ok()
        );
    }

    #[test]
    fn replace_events_restores_universal_events() {
        let mut journey = journey(5);
        journey.replace_events(vec![LifeEvent::at_age(
            "Open a Bakery",
            31,
            lifetree_types::EventCategory::Dharmic,
        )]);
        let names: Vec<&str> = journey
            .playback()
            .events()
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Birth", "Coming of Age", "Open a Bakery", "Death"]);
    }
}
