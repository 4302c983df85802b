//! Event generation, karma scoring, and the life cycle for the Lifetree
//! journey.
//!
//! A life is a sequence of events on a `[0, 1]` progress axis. The
//! generator samples that sequence from the karma inherited from the
//! previous life; playback fires events as the cursor crosses them; the
//! recorder sub-samples consciousness; the scorer turns the record into
//! the karma of the next life.
//!
//! # Modules
//!
//! - [`bands`] -- Karma bands and the category probability table.
//! - [`catalog`] -- Universal events and the three sampled pools.
//! - [`config`] -- Configuration loading from `lifetree.yaml` into
//!   strongly-typed structs.
//! - [`error`] -- [`LifeError`].
//! - [`generator`] -- Bounded rejection sampling of a life's events.
//! - [`journey`] -- The closed life cycle and the scripted [`Pilot`].
//! - [`playback`] -- Progress-cursor event triggering.
//! - [`recorder`] -- Consciousness sampling, summaries, story payloads.
//! - [`scorer`] -- Time-weighted karma scoring.
//!
//! [`LifeError`]: error::LifeError
//! [`Pilot`]: journey::Pilot

pub mod bands;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generator;
pub mod journey;
pub mod playback;
pub mod recorder;
pub mod scorer;

pub use bands::{CategoryWeights, KarmaBand};
pub use catalog::EventCatalog;
pub use config::{ConfigError, LifetreeConfig};
pub use error::LifeError;
pub use generator::EventGenerator;
pub use journey::{Journey, LifeEnded, Pilot, Step};
pub use playback::Playback;
pub use recorder::LifeRecorder;
pub use scorer::score;
