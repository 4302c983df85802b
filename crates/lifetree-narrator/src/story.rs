//! Template contexts built from the request bodies.
//!
//! The story prompt does not see raw samples. It gets consciousness
//! statistics, the fired events grouped by outcome, and a five-phase
//! trajectory of the life. Numbers are preformatted to two decimals.

use lifetree_core::KarmaBand;
use lifetree_types::{ConsciousnessSample, Karma, Outcome, StoryRequest, TriggeredEvent};
use serde::Serialize;

use crate::error::NarratorError;

/// Phases of a life, in order. The history is split evenly across them.
pub const PHASES: [&str; 5] = [
    "Childhood",
    "Youth",
    "Early adulthood",
    "Maturity",
    "Old age",
];

/// Below this many samples the trajectory is not described.
pub const MIN_TRAJECTORY_SAMPLES: usize = 10;

/// Phase averages above this are "in the light".
const LIGHT_PHASE: f64 = 0.3;

/// Phase averages below this are "in shadow".
const SHADOW_PHASE: f64 = -0.3;

/// Context of the event generation prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventsContext {
    /// Inherited karma, two decimals.
    pub karma: String,
    /// Band description of the inherited karma.
    pub karma_description: &'static str,
    /// Fewest events to ask for.
    pub min_events: usize,
    /// Most events to ask for.
    pub max_events: usize,
}

impl EventsContext {
    /// Context for a life inheriting `karma`.
    pub fn new(karma: Karma) -> Self {
        Self {
            karma: format!("{:.2}", karma.value()),
            karma_description: KarmaBand::of(karma).describe(),
            min_events: 20,
            max_events: 25,
        }
    }
}

/// One event line of the story prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventLine {
    /// Event name.
    pub name: String,
    /// Age when it fired.
    pub age: u8,
    /// Consciousness at that moment, two decimals.
    pub consciousness: String,
}

impl From<&TriggeredEvent> for EventLine {
    fn from(event: &TriggeredEvent) -> Self {
        Self {
            name: event.name.clone(),
            age: event.age,
            consciousness: format!("{:.2}", event.consciousness),
        }
    }
}

/// Context of the story prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoryContext {
    /// Mean consciousness.
    pub average: String,
    /// Highest consciousness.
    pub max: String,
    /// Lowest consciousness.
    pub min: String,
    /// Consciousness at death.
    pub final_consciousness: String,
    /// Karma for the next life.
    pub karma: String,
    /// Events lived from the light.
    pub transmuted: Vec<EventLine>,
    /// Events lived from the shadow.
    pub fallen: Vec<EventLine>,
    /// Events lived in balance.
    pub neutral: Vec<EventLine>,
    /// One line per phase, or a single line for short lives.
    pub trajectory: Vec<String>,
}

impl StoryContext {
    /// Build the context of a story request.
    ///
    /// An empty history is a bad request: there is nothing to tell.
    pub fn from_request(request: &StoryRequest) -> Result<Self, NarratorError> {
        let values: Vec<f64> = request.history.iter().map(|s| s.consciousness).collect();
        let average = mean(&values)
            .ok_or_else(|| NarratorError::BadRequest("history must not be empty".to_owned()))?;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);

        let group = |outcome: Outcome| -> Vec<EventLine> {
            request
                .events
                .iter()
                .filter(|e| e.outcome == outcome)
                .map(EventLine::from)
                .collect()
        };

        Ok(Self {
            average: format!("{average:.2}"),
            max: format!("{max:.2}"),
            min: format!("{min:.2}"),
            final_consciousness: format!("{:.2}", request.final_consciousness),
            karma: format!("{:.2}", request.karma.value()),
            transmuted: group(Outcome::Transmuted),
            fallen: group(Outcome::Fallen),
            neutral: group(Outcome::Neutral),
            trajectory: describe_trajectory(&request.history),
        })
    }
}

/// Describe the life in five phases of equal sample count.
///
/// The `len % 5` trailing samples are not part of any phase.
pub fn describe_trajectory(history: &[ConsciousnessSample]) -> Vec<String> {
    if history.len() < MIN_TRAJECTORY_SAMPLES {
        return vec!["Short or incomplete trajectory.".to_owned()];
    }

    let segment = history.len().checked_div(PHASES.len()).unwrap_or(1).max(1);
    history
        .chunks_exact(segment)
        .zip(PHASES)
        .map(|(chunk, phase)| {
            let values: Vec<f64> = chunk.iter().map(|s| s.consciousness).collect();
            let avg = mean(&values).unwrap_or(0.0);
            format!("{phase}: mostly {} ({avg:.2})", phase_label(avg))
        })
        .collect()
}

/// Label of a phase average.
pub fn phase_label(average: f64) -> &'static str {
    if average > LIGHT_PHASE {
        "in the light"
    } else if average < SHADOW_PHASE {
        "in shadow"
    } else {
        "in balance"
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let count = u32::try_from(values.len()).map_or(f64::from(u32::MAX), f64::from);
    Some(values.iter().sum::<f64>() / count)
}
