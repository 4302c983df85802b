//! Enumeration types for the Lifetree journey.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event categories
// ---------------------------------------------------------------------------

/// The pool a life event is drawn from.
///
/// - `Universal`: fixed milestones present in every life (birth, coming of
///   age, death)
/// - `Standard`: ordinary life milestones
/// - `Karmic`: hard trials, favored after a life lived in shadow
/// - `Dharmic`: gifts and blessings, favored after a life lived in light
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum EventCategory {
    /// Always present at a fixed age.
    Universal,
    /// Ordinary milestone.
    Standard,
    /// Adverse trial.
    Karmic,
    /// Favorable gift.
    Dharmic,
}

impl EventCategory {
    /// The categories that can be sampled (everything but `Universal`).
    pub const SAMPLED: [Self; 3] = [Self::Standard, Self::Karmic, Self::Dharmic];

    /// Lowercase wire name, identical to the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Universal => "universal",
            Self::Standard => "standard",
            Self::Karmic => "karmic",
            Self::Dharmic => "dharmic",
        }
    }

    /// Case-insensitive lookup from the wire name.
    ///
    /// Returns `None` for anything that is not one of the four names.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "universal" => Some(Self::Universal),
            "standard" => Some(Self::Standard),
            "karmic" => Some(Self::Karmic),
            "dharmic" => Some(Self::Dharmic),
            _ => None,
        }
    }
}

impl core::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Consciousness above this value lives an event from the light.
pub const TRANSMUTED_THRESHOLD: f64 = 0.3;

/// Consciousness below this value lives an event from the shadow.
pub const FALLEN_THRESHOLD: f64 = -0.3;

/// How an event was lived, decided by consciousness at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// Lived from the light (consciousness > 0.3).
    Transmuted,
    /// Lived from the shadow (consciousness < -0.3).
    Fallen,
    /// Lived in balance.
    Neutral,
}

impl Outcome {
    /// Classify a consciousness value.
    ///
    /// Both thresholds are strict: exactly `0.3` and exactly `-0.3` are
    /// `Neutral`.
    pub fn classify(consciousness: f64) -> Self {
        if consciousness > TRANSMUTED_THRESHOLD {
            Self::Transmuted
        } else if consciousness < FALLEN_THRESHOLD {
            Self::Fallen
        } else {
            Self::Neutral
        }
    }

    /// Lowercase wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transmuted => "transmuted",
            Self::Fallen => "fallen",
            Self::Neutral => "neutral",
        }
    }
}

impl core::fmt::Display for Outcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_light_and_shadow() {
        assert_eq!(Outcome::classify(0.5), Outcome::Transmuted);
        assert_eq!(Outcome::classify(-0.5), Outcome::Fallen);
        assert_eq!(Outcome::classify(0.0), Outcome::Neutral);
    }

    #[test]
    fn classify_thresholds_are_strict() {
        assert_eq!(Outcome::classify(0.3), Outcome::Neutral);
        assert_eq!(Outcome::classify(-0.3), Outcome::Neutral);
        assert_eq!(Outcome::classify(0.31), Outcome::Transmuted);
        assert_eq!(Outcome::classify(-0.31), Outcome::Fallen);
    }

    #[test]
    fn classify_extremes() {
        assert_eq!(Outcome::classify(1.0), Outcome::Transmuted);
        assert_eq!(Outcome::classify(-1.0), Outcome::Fallen);
    }

    #[test]
    fn category_serializes_lowercase() {
        let json = serde_json::to_string(&EventCategory::Dharmic).unwrap_or_default();
        assert_eq!(json, "\"dharmic\"");
        let back: Result<EventCategory, _> = serde_json::from_str("\"karmic\"");
        assert!(matches!(back, Ok(EventCategory::Karmic)));
    }

    #[test]
    fn category_parse_is_case_insensitive() {
        assert_eq!(EventCategory::parse("Standard"), Some(EventCategory::Standard));
        assert_eq!(EventCategory::parse(" KARMIC "), Some(EventCategory::Karmic));
        assert_eq!(EventCategory::parse("cosmic"), None);
    }

    #[test]
    fn sampled_excludes_universal() {
        assert!(!EventCategory::SAMPLED.contains(&EventCategory::Universal));
    }
}
