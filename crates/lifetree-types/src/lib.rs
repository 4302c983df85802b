//! Shared type definitions for the Lifetree journey.
//!
//! Everything that crosses a crate or process boundary lives here: the
//! life event model, consciousness samples, karma, and the narrator wire
//! bodies. Types flow to `TypeScript` via `ts-rs` for the browser front end.
//!
//! # Modules
//!
//! - [`ids`] -- UUID v7 identifier wrappers
//! - [`enums`] -- Event categories and outcomes (with the outcome classifier)
//! - [`structs`] -- Life events, triggered events, samples, karma, summaries
//! - [`wire`] -- Narrator request/response bodies

pub mod enums;
pub mod ids;
pub mod structs;
pub mod wire;

pub use enums::{EventCategory, FALLEN_THRESHOLD, Outcome, TRANSMUTED_THRESHOLD};
pub use ids::LifeId;
pub use structs::{
    ConsciousnessSample, Karma, LifeEvent, LifeSummary, MAX_AGE_YEARS, TriggeredEvent,
    time_for_age,
};
pub use wire::{
    ErrorBody, GenerateEventsRequest, GenerateEventsResponse, Provider, StoryRequest,
    StoryResponse,
};
