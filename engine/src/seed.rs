//! Derivation of independent per-session random streams from one engine seed.

use sha2::{Digest, Sha256};

/// Seeds for every random stream consumed by a single session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SessionSeeds {
    pub(crate) narrative: u64,
    pub(crate) interruptions: u64,
    pub(crate) luck: u64,
}

impl SessionSeeds {
    pub(crate) fn derive(engine_seed: u64, session_index: u64) -> Self {
        let stream = |label| stream_seed(engine_seed, session_index, label);
        Self {
            narrative: stream(concert_core::RNG_STREAM_NARRATIVE),
            interruptions: stream(concert_core::RNG_STREAM_INTERRUPTIONS),
            luck: stream(concert_core::RNG_STREAM_LUCK),
        }
    }
}

/// First eight digest bytes of `SHA-256(seed || index || label)`, little endian.
fn stream_seed(engine_seed: u64, session_index: u64, label: &str) -> u64 {
    let digest = Sha256::new()
        .chain_update(engine_seed.to_le_bytes())
        .chain_update(session_index.to_le_bytes())
        .chain_update(label.as_bytes())
        .finalize();
    digest
        .iter()
        .take(8)
        .rev()
        .fold(0, |seed, byte| (seed << 8) | u64::from(*byte))
}

#[cfg(test)]
mod tests {
    use super::SessionSeeds;

    #[test]
    fn streams_are_independent_and_stable() {
        let seeds = SessionSeeds::derive(7, 0);
        assert_eq!(seeds, SessionSeeds::derive(7, 0));
        assert_ne!(seeds.narrative, seeds.interruptions);
        assert_ne!(seeds.narrative, seeds.luck);
        assert_ne!(seeds.interruptions, seeds.luck);
    }

    #[test]
    fn stream_seed_reads_digest_prefix_little_endian() {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(7_u64.to_le_bytes());
        hasher.update(0_u64.to_le_bytes());
        hasher.update(concert_core::RNG_STREAM_LUCK.as_bytes());
        let digest = hasher.finalize();
        let mut prefix = [0_u8; 8];
        prefix.copy_from_slice(&digest[..8]);

        assert_eq!(SessionSeeds::derive(7, 0).luck, u64::from_le_bytes(prefix));
    }

    #[test]
    fn later_sessions_draw_fresh_streams() {
        assert_ne!(SessionSeeds::derive(7, 0), SessionSeeds::derive(7, 1));
        assert_ne!(SessionSeeds::derive(7, 0), SessionSeeds::derive(8, 0));
    }
}
