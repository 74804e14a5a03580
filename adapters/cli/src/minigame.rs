//! Simulated interruption player standing in for the interactive minigames.

use concert_core::{CrisisState, MinigamePort, MinigameScore};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::info;

const SCORE_SPREAD: i32 = 25;
const MINIGAME_STREAM: u64 = 1;

/// Scores every interruption around a fixed skill with seeded jitter.
#[derive(Debug)]
pub(crate) struct SimulatedMinigame {
    skill: u8,
    rng: ChaCha8Rng,
}

impl SimulatedMinigame {
    pub(crate) fn new(skill: u8, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(MINIGAME_STREAM);
        Self { skill, rng }
    }
}

impl MinigamePort for SimulatedMinigame {
    fn run_interruption(&mut self, crisis: &CrisisState) -> Option<MinigameScore> {
        let jitter = self.rng.gen_range(-SCORE_SPREAD..=SCORE_SPREAD);
        let raw = (i32::from(self.skill) + jitter).clamp(0, 100);
        let score = MinigameScore::new(u32::try_from(raw).unwrap_or_default()).ok()?;
        info!(kind = ?crisis.kind, score = score.get(), "minigame played");
        Some(score)
    }
}
