#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic narrative system that rolls crowd beats and interruptions.

use std::time::Duration;

use concert_core::{Command, Event, NarrativeMood, NarrativeTuning, Phase};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the narrative system.
#[derive(Clone, Debug)]
pub struct Config {
    tuning: NarrativeTuning,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tuning and seed.
    #[must_use]
    pub fn new(tuning: NarrativeTuning, rng_seed: u64) -> Self {
        Self { tuning, rng_seed }
    }
}

/// Result of a single narrative roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Roll {
    /// The roll hands control to the interruption arbiter.
    Crisis,
    /// The roll narrates a beat of the given mood.
    Beat(NarrativeMood),
}

/// Classifies a uniform draw in `[0, 1)` against the configured thresholds.
///
/// The interruption threshold depends on whether the arbiter still holds
/// unconsumed shuffled kinds; it is checked before the mood thresholds.
#[must_use]
pub fn classify(draw: f64, queue_pending: bool, tuning: &NarrativeTuning) -> Roll {
    let crisis_chance = if queue_pending {
        tuning.crisis_chance_fresh
    } else {
        tuning.crisis_chance_exhausted
    };

    if draw < crisis_chance {
        Roll::Crisis
    } else if draw > tuning.positive_above {
        Roll::Beat(NarrativeMood::Positive)
    } else if draw < tuning.negative_below {
        Roll::Beat(NarrativeMood::Negative)
    } else {
        Roll::Beat(NarrativeMood::Neutral)
    }
}

/// Pure system that rolls narrative events on a cadence coarser than the heartbeat.
#[derive(Debug)]
pub struct Narrative {
    tuning: NarrativeTuning,
    interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Narrative {
    /// Creates a new narrative system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval: Duration::from_millis(config.tuning.interval_millis),
            tuning: config.tuning,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Simulated time accrued toward the next roll.
    #[must_use]
    pub fn accumulated(&self) -> Duration {
        self.accumulator
    }

    /// Consumes world events to emit narration and interruption requests.
    ///
    /// Outside [`Phase::Running`] the system is suspended: nothing accrues and
    /// nothing is rolled, but the accrued time is kept so resuming needs no
    /// reconstruction. At most one interruption request is emitted per call.
    pub fn handle(
        &mut self,
        events: &[Event],
        phase: Phase,
        queue_pending: bool,
        out: &mut Vec<Command>,
    ) {
        if phase != Phase::Running || self.interval.is_zero() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt, .. } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            let draw: f64 = self.rng.gen();
            match classify(draw, queue_pending, &self.tuning) {
                Roll::Crisis => {
                    out.push(Command::RequestCrisis);
                    return;
                }
                Roll::Beat(mood) => {
                    let line = self.pick_line(mood);
                    out.push(Command::Narrate { mood, line });
                }
            }
        }
    }

    fn pick_line(&mut self, mood: NarrativeMood) -> &'static str {
        let lines = mood.lines();
        lines[self.rng.gen_range(0..lines.len())]
    }
}
