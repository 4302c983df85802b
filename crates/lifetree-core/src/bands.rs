//! Karma bands and the category probability table.
//!
//! Inherited karma falls into one of three bands. Each band maps to a fixed
//! probability for every sampled category; the table is the only place the
//! thresholds and percentages live.
//!
//! | Band | Karma | Karmic | Standard | Dharmic |
//! |------|-------|--------|----------|---------|
//! | Dark | `< -0.2` | 50% | 30% | 20% |
//! | Neutral | `[-0.2, 0.2]` | 30% | 40% | 30% |
//! | Light | `> 0.2` | 20% | 30% | 50% |

use lifetree_types::{EventCategory, Karma};

/// Karma strictly below this is a dark inheritance.
pub const DARK_THRESHOLD: f64 = -0.2;

/// Karma strictly above this is a light inheritance.
pub const LIGHT_THRESHOLD: f64 = 0.2;

/// Coarse classification of inherited karma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KarmaBand {
    /// Previous life lived mostly in shadow: more trials.
    Dark,
    /// Previous life in balance.
    Neutral,
    /// Previous life lived mostly in light: more gifts.
    Light,
}

impl KarmaBand {
    /// Band for a karma value. Both thresholds are strict.
    pub fn of(karma: Karma) -> Self {
        let k = karma.value();
        if k < DARK_THRESHOLD {
            Self::Dark
        } else if k > LIGHT_THRESHOLD {
            Self::Light
        } else {
            Self::Neutral
        }
    }

    /// The category distribution for this band.
    pub const fn weights(self) -> CategoryWeights {
        match self {
            Self::Dark => CategoryWeights {
                entries: [
                    (EventCategory::Karmic, 0.5),
                    (EventCategory::Standard, 0.3),
                    (EventCategory::Dharmic, 0.2),
                ],
            },
            Self::Light => CategoryWeights {
                entries: [
                    (EventCategory::Dharmic, 0.5),
                    (EventCategory::Standard, 0.3),
                    (EventCategory::Karmic, 0.2),
                ],
            },
            Self::Neutral => CategoryWeights {
                entries: [
                    (EventCategory::Karmic, 0.3),
                    (EventCategory::Dharmic, 0.3),
                    (EventCategory::Standard, 0.4),
                ],
            },
        }
    }

    /// Short description used in logs and prompts.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Dark => "negative (previous life in shadow)",
            Self::Neutral => "neutral (previous life in balance)",
            Self::Light => "positive (previous life in light)",
        }
    }
}

/// Probabilities of the three sampled categories, in sampling order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryWeights {
    entries: [(EventCategory, f64); 3],
}

impl CategoryWeights {
    /// Probability assigned to `category`; zero for `Universal`.
    pub fn probability(&self, category: EventCategory) -> f64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(0.0, |&(_, p)| p)
    }

    /// Pick a category from a uniform roll in `[0, 1)`.
    ///
    /// Walks the cumulative distribution in table order; a roll at or past
    /// the final boundary lands on the last entry.
    pub fn pick(&self, roll: f64) -> EventCategory {
        let mut cumulative = 0.0;
        for &(category, p) in &self.entries {
            cumulative += p;
            if roll < cumulative {
                return category;
            }
        }
        self.entries
            .last()
            .map_or(EventCategory::Standard, |&(category, _)| category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_thresholds_are_strict() {
        assert_eq!(KarmaBand::of(Karma::new(-0.2)), KarmaBand::Neutral);
        assert_eq!(KarmaBand::of(Karma::new(0.2)), KarmaBand::Neutral);
        assert_eq!(KarmaBand::of(Karma::new(0.0)), KarmaBand::Neutral);
        assert_eq!(KarmaBand::of(Karma::new(-0.21)), KarmaBand::Dark);
        assert_eq!(KarmaBand::of(Karma::new(0.21)), KarmaBand::Light);
        assert_eq!(KarmaBand::of(Karma::new(-1.0)), KarmaBand::Dark);
        assert_eq!(KarmaBand::of(Karma::new(1.0)), KarmaBand::Light);
    }

    #[test]
    fn every_band_sums_to_one() {
        for band in [KarmaBand::Dark, KarmaBand::Neutral, KarmaBand::Light] {
            let w = band.weights();
            let total: f64 = EventCategory::SAMPLED.iter().map(|&c| w.probability(c)).sum();
            assert!((total - 1.0).abs() < 1e-9, "{band:?} sums to {total}");
            assert!(w.probability(EventCategory::Universal).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn table_values() {
        let dark = KarmaBand::Dark.weights();
        assert!((dark.probability(EventCategory::Karmic) - 0.5).abs() < 1e-12);
        assert!((dark.probability(EventCategory::Standard) - 0.3).abs() < 1e-12);
        assert!((dark.probability(EventCategory::Dharmic) - 0.2).abs() < 1e-12);

        let light = KarmaBand::Light.weights();
        assert!((light.probability(EventCategory::Dharmic) - 0.5).abs() < 1e-12);
        assert!((light.probability(EventCategory::Karmic) - 0.2).abs() < 1e-12);

        let neutral = KarmaBand::Neutral.weights();
        assert!((neutral.probability(EventCategory::Standard) - 0.4).abs() < 1e-12);
        assert!((neutral.probability(EventCategory::Karmic) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn pick_walks_the_cumulative_distribution() {
        let dark = KarmaBand::Dark.weights();
        assert_eq!(dark.pick(0.0), EventCategory::Karmic);
        assert_eq!(dark.pick(0.49), EventCategory::Karmic);
        assert_eq!(dark.pick(0.5), EventCategory::Standard);
        assert_eq!(dark.pick(0.79), EventCategory::Standard);
        assert_eq!(dark.pick(0.81), EventCategory::Dharmic);
        assert_eq!(dark.pick(0.999), EventCategory::Dharmic);

        let neutral = KarmaBand::Neutral.weights();
        assert_eq!(neutral.pick(0.1), EventCategory::Karmic);
        assert_eq!(neutral.pick(0.45), EventCategory::Dharmic);
        assert_eq!(neutral.pick(0.7), EventCategory::Standard);
    }

    #[test]
    fn pick_past_the_end_lands_on_last_entry() {
        assert_eq!(KarmaBand::Light.weights().pick(1.5), EventCategory::Karmic);
    }
}
