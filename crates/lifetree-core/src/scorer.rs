//! Karma scoring.
//!
//! A finished life is reduced to one scalar: the time-weighted mean of its
//! consciousness samples, where later samples count linearly more, plus a
//! small bonus or penalty per event depending on how it was lived. The
//! result is clamped to `[-1, 1]`.
//!
//! Everything here is a pure function of its inputs.

use lifetree_types::{ConsciousnessSample, Karma, Outcome, TriggeredEvent};

/// Karma added for each event lived from the light.
pub const TRANSMUTED_BONUS: f64 = 0.05;

/// Karma removed for each event lived from the shadow.
pub const FALLEN_PENALTY: f64 = 0.05;

/// Weight of the sample at `index` out of `count`: `(index + 1) / count`.
pub fn sample_weight(index: usize, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    as_f64(index.saturating_add(1)) / as_f64(count)
}

/// Linearly time-weighted mean consciousness. `None` for no samples.
pub fn weighted_consciousness(samples: &[ConsciousnessSample]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let count = samples.len();
    let (weighted_sum, weight_total) = samples.iter().enumerate().fold(
        (0.0_f64, 0.0_f64),
        |(sum, total), (i, sample)| {
            let w = sample_weight(i, count);
            (sum + sample.consciousness * w, total + w)
        },
    );
    Some(weighted_sum / weight_total)
}

/// Net bonus contributed by the triggered events.
pub fn event_bonus(events: &[TriggeredEvent]) -> f64 {
    events
        .iter()
        .map(|e| match e.outcome {
            Outcome::Transmuted => TRANSMUTED_BONUS,
            Outcome::Fallen => -FALLEN_PENALTY,
            Outcome::Neutral => 0.0,
        })
        .sum()
}

/// Karma of a finished life.
///
/// Callers enforce the minimum sample count before scoring; with no
/// samples at all this returns neutral karma.
pub fn score(samples: &[ConsciousnessSample], events: &[TriggeredEvent]) -> Karma {
    weighted_consciousness(samples)
        .map_or(Karma::NEUTRAL, |mean| Karma::new(mean + event_bonus(events)))
}

/// Lossless for any realistic sample count; saturates past `u32::MAX`.
fn as_f64(n: usize) -> f64 {
    u32::try_from(n).map_or(f64::from(u32::MAX), f64::from)
}
