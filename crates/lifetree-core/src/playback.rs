//! Progress-cursor playback of a life's events.
//!
//! The cursor moves forward through `[0, 1]`. An event fires the first time
//! the cursor reaches or passes its `time`, and is tagged with the
//! consciousness of that frame. Moving the cursor backwards (a wrap) starts
//! a new pass and re-arms every event.

use lifetree_types::{LifeEvent, TriggeredEvent};

/// Fires events as the cursor crosses them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Playback {
    events: Vec<LifeEvent>,
    last_progress: Option<f64>,
}

impl Playback {
    /// Start a pass over `events`. Trigger flags are cleared.
    pub fn new(events: Vec<LifeEvent>) -> Self {
        let mut playback = Self::default();
        playback.replace_events(events);
        playback
    }

    /// Swap in a new event sequence and restart from the beginning.
    pub fn replace_events(&mut self, mut events: Vec<LifeEvent>) {
        for event in &mut events {
            event.triggered = false;
        }
        self.events = events;
        self.last_progress = None;
    }

    /// Observe the cursor at `progress` with the current consciousness.
    ///
    /// Returns the events that fired on this frame, in timeline order.
    pub fn advance(&mut self, progress: f64, consciousness: f64) -> Vec<TriggeredEvent> {
        if self.last_progress.is_some_and(|last| progress < last) {
            self.rearm();
        }
        let last = self.last_progress;

        let fired: Vec<TriggeredEvent> = self
            .events
            .iter_mut()
            .filter(|e| !e.triggered && e.time <= progress && last.is_none_or(|l| l < e.time))
            .map(|e| {
                e.triggered = true;
                TriggeredEvent::fire(e, consciousness)
            })
            .collect();

        self.last_progress = Some(progress);
        fired
    }

    /// Clear every trigger flag and forget the last cursor position.
    pub fn rearm(&mut self) {
        for event in &mut self.events {
            event.triggered = false;
        }
        self.last_progress = None;
    }

    /// The events of the current life with their trigger state.
    pub fn events(&self) -> &[LifeEvent] {
        &self.events
    }

    /// Events not yet fired in this pass.
    pub fn remaining(&self) -> usize {
        self.events.iter().filter(|e| !e.triggered).count()
    }
}
