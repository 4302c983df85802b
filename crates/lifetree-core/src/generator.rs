//! Karma-conditioned life event generation.
//!
//! A life always contains the universal milestones. The rest is filled by
//! bounded rejection sampling: pick a category from the karma band's
//! distribution, pick a candidate uniformly from that category's pool, and
//! keep it only if its name is new and it does not crowd an event already
//! on the timeline. Sampling stops at the target size or after the attempt
//! budget is spent, whichever comes first. A short life is a normal result.
//!
//! The random source is always passed in, so a seeded generator reproduces
//! the same life exactly.

use std::collections::BTreeSet;

use lifetree_types::{EventCategory, Karma, LifeEvent};
use rand::Rng;
use tracing::debug;

use crate::bands::KarmaBand;
use crate::catalog::EventCatalog;
use crate::config::GenerationConfig;

/// Produces one life's event sequence from inherited karma.
#[derive(Debug, Clone, PartialEq)]
pub struct EventGenerator {
    catalog: EventCatalog,
    config: GenerationConfig,
}

impl EventGenerator {
    /// Create a generator over a catalog with the given parameters.
    pub const fn new(catalog: EventCatalog, config: GenerationConfig) -> Self {
        Self { catalog, config }
    }

    /// Generate the events of a new life.
    ///
    /// The result is sorted by `time`, contains every universal event
    /// exactly once, has no duplicate names, and keeps every pair of
    /// events at least `min_spacing` apart except pairs of universal
    /// events.
    pub fn generate(&self, karma: Karma, rng: &mut impl Rng) -> Vec<LifeEvent> {
        let band = KarmaBand::of(karma);
        let weights = band.weights();
        let target = self.pick_target(rng);

        let mut events: Vec<LifeEvent> = self.catalog.universal().to_vec();
        let mut names: BTreeSet<String> = events.iter().map(|e| e.name.clone()).collect();
        let mut attempts: u32 = 0;

        while attempts < self.config.max_attempts && events.len() < target {
            attempts = attempts.saturating_add(1);

            let category = weights.pick(rng.random::<f64>());
            let pool = self.catalog.pool(category);
            if pool.is_empty() {
                continue;
            }
            let Some(candidate) = pool.get(rng.random_range(0..pool.len())) else {
                continue;
            };

            if names.contains(&candidate.name)
                || crowds(&events, candidate.time, self.config.min_spacing)
            {
                continue;
            }

            names.insert(candidate.name.clone());
            events.push(LifeEvent {
                triggered: false,
                ..candidate.clone()
            });
        }

        sort_by_time(&mut events);

        debug!(
            karma = %karma,
            band = ?band,
            target,
            generated = events.len(),
            attempts,
            "life events generated"
        );

        events
    }

    /// Complete an externally produced event list into a playable life.
    ///
    /// Incoming universal events (by category or by name) are replaced by
    /// the catalog's own, later duplicates of a name are dropped, and the
    /// result is sorted by time. Spacing is not enforced on external
    /// events.
    pub fn with_universal_events(&self, external: Vec<LifeEvent>) -> Vec<LifeEvent> {
        let mut events: Vec<LifeEvent> = self.catalog.universal().to_vec();
        let mut names: BTreeSet<String> = events.iter().map(|e| e.name.clone()).collect();

        for mut event in external {
            if event.category == EventCategory::Universal || !names.insert(event.name.clone()) {
                continue;
            }
            event.triggered = false;
            events.push(event);
        }

        sort_by_time(&mut events);
        events
    }

    /// Target size of one life, drawn from `target_min..=target_max`.
    fn pick_target(&self, rng: &mut impl Rng) -> usize {
        let low = self.config.target_min.min(self.config.target_max);
        let high = self.config.target_min.max(self.config.target_max);
        if low == high {
            high
        } else {
            rng.random_range(low..=high)
        }
    }
}

impl Default for EventGenerator {
    fn default() -> Self {
        Self::new(EventCatalog::default(), GenerationConfig::default())
    }
}

/// Whether an event at `time` would sit closer than `min_spacing` to any
/// event already in `events`.
fn crowds(events: &[LifeEvent], time: f64, min_spacing: f64) -> bool {
    events.iter().any(|e| (e.time - time).abs() < min_spacing)
}

fn sort_by_time(events: &mut [LifeEvent]) {
    events.sort_by(|a, b| a.time.total_cmp(&b.time));
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn generator() -> EventGenerator {
        EventGenerator::default()
    }

    fn universal_times(events: &[LifeEvent]) -> Vec<f64> {
        events
            .iter()
            .filter(|e| e.is_universal())
            .map(|e| e.time)
            .collect()
    }

    #[test]
    fn sorted_with_all_universal_events() {
        let generator = generator();
        for seed in 0..50_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let events = generator.generate(Karma::NEUTRAL, &mut rng);

            assert!(events.windows(2).all(|w| match w {
                [a, b] => a.time <= b.time,
                _ => true,
            }));

            let times = universal_times(&events);
            assert_eq!(times.len(), 3, "seed {seed}");
            assert!(times.first().is_some_and(|t| t.abs() < 1e-12));
            assert!(times.get(1).is_some_and(|t| (t - 0.18).abs() < 1e-12));
            assert!(times.get(2).is_some_and(|t| (t - 0.99).abs() < 1e-12));
        }
    }

    #[test]
    fn names_unique_and_spacing_respected() {
        let generator = generator();
        for karma in [-0.9, -0.3, 0.0, 0.3, 0.9] {
            for seed in 0..30_u64 {
                let mut rng = SmallRng::seed_from_u64(seed);
                let events = generator.generate(Karma::new(karma), &mut rng);

                let names: BTreeSet<&str> = events.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(names.len(), events.len(), "duplicate name, seed {seed}");

                for (i, a) in events.iter().enumerate() {
                    for b in events.iter().skip(i.saturating_add(1)) {
                        if a.is_universal() && b.is_universal() {
                            continue;
                        }
                        assert!(
                            (a.time - b.time).abs() >= 0.03,
                            "{} and {} too close (seed {seed})",
                            a.name,
                            b.name
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn time_and_age_stay_consistent() {
        let mut rng = SmallRng::seed_from_u64(11);
        let events = generator().generate(Karma::new(0.5), &mut rng);
        for e in &events {
            assert!((e.time - f64::from(e.age_years) / 100.0).abs() < 1e-12);
            assert!(!e.triggered);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let generator = generator();
        let mut a = SmallRng::seed_from_u64(42);
        let mut b = SmallRng::seed_from_u64(42);
        assert_eq!(
            generator.generate(Karma::new(-0.4), &mut a),
            generator.generate(Karma::new(-0.4), &mut b)
        );
    }

    #[test]
    fn different_seeds_vary() {
        let generator = generator();
        let lives: BTreeSet<Vec<String>> = (0..20_u64)
            .map(|seed| {
                let mut rng = SmallRng::seed_from_u64(seed);
                generator
                    .generate(Karma::NEUTRAL, &mut rng)
                    .into_iter()
                    .map(|e| e.name)
                    .collect()
            })
            .collect();
        assert!(lives.len() > 1);
    }

    #[test]
    fn never_exceeds_target() {
        let config = GenerationConfig {
            target_min: 8,
            target_max: 8,
            ..GenerationConfig::default()
        };
        let generator = EventGenerator::new(EventCatalog::default(), config);
        for seed in 0..20_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            assert!(generator.generate(Karma::NEUTRAL, &mut rng).len() <= 8);
        }
    }

    #[test]
    fn target_range_bounds_the_size() {
        let config = GenerationConfig {
            target_min: 18,
            target_max: 25,
            ..GenerationConfig::default()
        };
        let generator = EventGenerator::new(EventCatalog::default(), config);
        for seed in 0..20_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let len = generator.generate(Karma::new(0.6), &mut rng).len();
            assert!((3..=25).contains(&len));
        }
    }

    #[test]
    fn zero_attempts_yields_only_universal_events() {
        let config = GenerationConfig {
            max_attempts: 0,
            ..GenerationConfig::default()
        };
        let generator = EventGenerator::new(EventCatalog::default(), config);
        let mut rng = SmallRng::seed_from_u64(3);
        let events = generator.generate(Karma::NEUTRAL, &mut rng);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(LifeEvent::is_universal));
    }

    #[test]
    fn empty_pools_still_yield_universal_events() {
        let catalog = EventCatalog::new(
            EventCatalog::default().universal().to_vec(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        );
        let generator = EventGenerator::new(catalog, GenerationConfig::default());
        let mut rng = SmallRng::seed_from_u64(5);
        assert_eq!(generator.generate(Karma::new(0.9), &mut rng).len(), 3);
    }

    #[test]
    fn repeated_neutral_generation_never_loses_universal_events() {
        let generator = generator();
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..500 {
            let events = generator.generate(Karma::NEUTRAL, &mut rng);
            assert_eq!(universal_times(&events).len(), 3);
        }
    }

    #[test]
    fn dark_karma_favors_trials() {
        let generator = generator();
        let mut karmic = 0_u32;
        let mut dharmic = 0_u32;
        for seed in 0..200_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for e in generator.generate(Karma::new(-0.8), &mut rng) {
                match e.category {
                    EventCategory::Karmic => karmic = karmic.saturating_add(1),
                    EventCategory::Dharmic => dharmic = dharmic.saturating_add(1),
                    _ => {}
                }
            }
        }
        assert!(karmic > dharmic, "karmic {karmic} vs dharmic {dharmic}");
    }

    #[test]
    fn light_karma_favors_gifts() {
        let generator = generator();
        let mut karmic = 0_u32;
        let mut dharmic = 0_u32;
        for seed in 0..200_u64 {
            let mut rng = SmallRng::seed_from_u64(seed);
            for e in generator.generate(Karma::new(0.8), &mut rng) {
                match e.category {
                    EventCategory::Karmic => karmic = karmic.saturating_add(1),
                    EventCategory::Dharmic => dharmic = dharmic.saturating_add(1),
                    _ => {}
                }
            }
        }
        assert!(dharmic > karmic, "dharmic {dharmic} vs karmic {karmic}");
    }

    #[test]
    fn with_universal_events_completes_external_lists() {
        let generator = generator();
        let external = vec![
            LifeEvent::at_age("Birth", 0, EventCategory::Standard),
            LifeEvent::at_age("Open a Bakery", 31, EventCategory::Dharmic),
            LifeEvent::at_age("Open a Bakery", 44, EventCategory::Dharmic),
            LifeEvent::at_age("Flood", 12, EventCategory::Karmic),
            LifeEvent::at_age("Heaven", 99, EventCategory::Universal),
        ];
        let events = generator.with_universal_events(external);

        let names: Vec<&str> = events.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Birth", "Flood", "Coming of Age", "Open a Bakery", "Death"]
        );
        assert!(events.iter().find(|e| e.name == "Birth").is_some_and(LifeEvent::is_universal));
    }
}
