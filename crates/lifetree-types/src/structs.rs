//! Core data model: life events, triggered events, consciousness samples,
//! karma, and life summaries.
//!
//! The serde field names match the JSON the browser front end and the
//! narrator service exchange (`t`, `age`, `type`, `p`, `c`), so the same
//! structs serve as both the in-memory model and the wire format.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventCategory, Outcome};

/// Oldest age an event can be placed at. Death happens here.
pub const MAX_AGE_YEARS: u8 = 99;

/// Years in one unit of life progress (`time = age / 100`).
const YEARS_PER_LIFE: f64 = 100.0;

// ---------------------------------------------------------------------------
// Karma
// ---------------------------------------------------------------------------

/// Karma carried from one life into the next, always within `[-1, 1]`.
///
/// Construct through [`Karma::new`], which clamps. Deserialization does not
/// clamp, so values arriving over the wire are clamped again by whoever
/// consumes them via [`Karma::value`].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct Karma(f64);

impl Karma {
    /// Karma of a first life, or of a life with nothing to say.
    pub const NEUTRAL: Self = Self(0.0);

    /// Create a karma value clamped to `[-1, 1]`. `NaN` becomes neutral.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self::NEUTRAL
        } else {
            Self(value.clamp(-1.0, 1.0))
        }
    }

    /// The clamped scalar.
    pub fn value(self) -> f64 {
        self.0.clamp(-1.0, 1.0)
    }

    /// Display tone used when presenting a finished life.
    ///
    /// `"luminous"` above 0.3, `"dark"` below -0.3, else `"balanced"`.
    pub fn tone(self) -> &'static str {
        let v = self.value();
        if v > 0.3 {
            "luminous"
        } else if v < -0.3 {
            "dark"
        } else {
            "balanced"
        }
    }
}

impl From<f64> for Karma {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl core::fmt::Display for Karma {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

// ---------------------------------------------------------------------------
// Life events
// ---------------------------------------------------------------------------

/// One event placed on a life's timeline.
///
/// `time` and `age_years` encode the same position; build events with
/// [`LifeEvent::at_age`] so they stay consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifeEvent {
    /// Position on the life axis in `[0, 1]`.
    #[serde(rename = "t")]
    pub time: f64,
    /// Human-readable event name, unique within one life.
    pub name: String,
    /// Age in years at which the event happens, `0..=99`.
    #[serde(rename = "age")]
    pub age_years: u8,
    /// Pool the event was drawn from.
    #[serde(rename = "type")]
    pub category: EventCategory,
    /// Whether playback has already fired this event in the current pass.
    #[serde(default)]
    pub triggered: bool,
}

impl LifeEvent {
    /// Build an untriggered event at the given age.
    ///
    /// Ages above [`MAX_AGE_YEARS`] are clamped to it.
    pub fn at_age(name: impl Into<String>, age_years: u8, category: EventCategory) -> Self {
        let age_years = age_years.min(MAX_AGE_YEARS);
        Self {
            time: time_for_age(age_years),
            name: name.into(),
            age_years,
            category,
            triggered: false,
        }
    }

    /// Whether this is one of the fixed universal milestones.
    pub fn is_universal(&self) -> bool {
        self.category == EventCategory::Universal
    }
}

/// Convert an age in years to a position on the life axis.
pub fn time_for_age(age_years: u8) -> f64 {
    f64::from(age_years) / YEARS_PER_LIFE
}

/// An event that fired during playback, tagged with how it was lived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TriggeredEvent {
    /// Event name.
    pub name: String,
    /// Age in years when it fired.
    pub age: u8,
    /// Position on the life axis.
    pub t: f64,
    /// Pool the event came from.
    #[serde(rename = "type")]
    pub category: EventCategory,
    /// Consciousness at the moment the event fired.
    pub consciousness: f64,
    /// Outcome derived from `consciousness`.
    pub outcome: Outcome,
}

impl TriggeredEvent {
    /// Fire `event` at the given consciousness, classifying the outcome.
    pub fn fire(event: &LifeEvent, consciousness: f64) -> Self {
        Self {
            name: event.name.clone(),
            age: event.age_years,
            t: event.time,
            category: event.category,
            consciousness,
            outcome: Outcome::classify(consciousness),
        }
    }
}

// ---------------------------------------------------------------------------
// Consciousness samples
// ---------------------------------------------------------------------------

/// One sub-sampled consciousness reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ConsciousnessSample {
    /// Life progress at sampling time, `[0, 1]`.
    #[serde(rename = "p")]
    pub progress: f64,
    /// Consciousness value, `[-1, 1]`.
    #[serde(rename = "c")]
    pub consciousness: f64,
    /// Wall-clock timestamp in milliseconds since the Unix epoch.
    #[serde(rename = "t", default)]
    pub timestamp_ms: i64,
}

/// Aggregate statistics of a recorded life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LifeSummary {
    /// Mean consciousness over all samples.
    pub average_consciousness: f64,
    /// Highest consciousness reached.
    pub max_consciousness: f64,
    /// Lowest consciousness reached.
    pub min_consciousness: f64,
    /// Consciousness of the last sample.
    pub final_consciousness: f64,
    /// Number of events that fired.
    pub total_events: u32,
    /// Events lived from the light.
    pub transmuted: u32,
    /// Events lived from the shadow.
    pub fallen: u32,
    /// Events lived in balance.
    pub neutral: u32,
}
