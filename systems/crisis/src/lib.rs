#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Interruption arbiter that selects crises and maps minigame scores to effects.

use std::collections::VecDeque;

use concert_core::{
    Command, CrisisResolution, CrisisTuning, CrisisVerdict, InterruptionKind, MinigameScore,
    Phase,
};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pre-shuffled permutation of every interruption kind, consumed front to back.
///
/// Once exhausted, kinds are drawn uniformly with replacement.
#[derive(Debug)]
pub struct InterruptionQueue {
    pending: VecDeque<InterruptionKind>,
    rng: ChaCha8Rng,
}

impl InterruptionQueue {
    /// Creates a queue holding a fresh shuffled permutation of every kind.
    #[must_use]
    pub fn shuffled(rng_seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
        let mut kinds = InterruptionKind::ALL;
        kinds.shuffle(&mut rng);
        Self {
            pending: kinds.into_iter().collect(),
            rng,
        }
    }

    /// Reports whether unconsumed shuffled kinds remain.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of unconsumed shuffled kinds.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Takes the next kind, falling back to a uniform draw once exhausted.
    pub fn next_kind(&mut self) -> InterruptionKind {
        if let Some(kind) = self.pending.pop_front() {
            return kind;
        }
        let index = self.rng.gen_range(0..InterruptionKind::ALL.len());
        InterruptionKind::ALL[index]
    }
}

/// Maps a minigame score onto the effect folded into the session.
///
/// Scores strictly above the threshold add `score * multiplier` and raise
/// hype; anything else only lowers hype.
#[must_use]
pub fn assess(score: MinigameScore, tuning: &CrisisTuning) -> CrisisResolution {
    let swing = i32::from(tuning.hype_swing);
    if score.get() > tuning.success_threshold {
        CrisisResolution {
            verdict: CrisisVerdict::Success,
            score_gain: u64::from(score.get()).saturating_mul(tuning.score_multiplier),
            hype_delta: swing,
        }
    } else {
        CrisisResolution {
            verdict: CrisisVerdict::Failure,
            score_gain: 0,
            hype_delta: -swing,
        }
    }
}

/// Pure system that guarantees at most one interruption and picks its kind.
#[derive(Debug)]
pub struct Arbiter {
    tuning: CrisisTuning,
    queue: InterruptionQueue,
}

impl Arbiter {
    /// Creates an arbiter with a freshly shuffled queue.
    #[must_use]
    pub fn new(tuning: CrisisTuning, rng_seed: u64) -> Self {
        Self {
            tuning,
            queue: InterruptionQueue::shuffled(rng_seed),
        }
    }

    /// Reports whether the shuffled permutation still holds unconsumed kinds.
    #[must_use]
    pub fn has_pending_kinds(&self) -> bool {
        self.queue.has_pending()
    }

    /// Read-only access to the interruption queue.
    #[must_use]
    pub fn queue(&self) -> &InterruptionQueue {
        &self.queue
    }

    /// Consumes crisis requests and emits at most one `Command::BeginCrisis`.
    ///
    /// Requests are dropped without consuming the queue while an interruption
    /// is already live or the session is not running.
    pub fn handle(
        &mut self,
        commands: &[Command],
        phase: Phase,
        crisis_active: bool,
        out: &mut Vec<Command>,
    ) {
        if crisis_active || phase != Phase::Running {
            return;
        }

        if commands
            .iter()
            .any(|command| matches!(command, Command::RequestCrisis))
        {
            let kind = self.queue.next_kind();
            out.push(Command::BeginCrisis { kind });
        }
    }

    /// Converts a minigame score into the resolution command for the world.
    #[must_use]
    pub fn resolve(&self, score: MinigameScore) -> Command {
        Command::ResolveCrisis {
            resolution: assess(score, &self.tuning),
        }
    }
}
