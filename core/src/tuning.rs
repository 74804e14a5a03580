//! Tuning surface shared by the world and every system.

use serde::{Deserialize, Serialize};

/// Aggregated knobs controlling every adjustable aspect of a concert session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Session length and log sizing.
    pub clock: ClockTuning,
    /// Cadence, probabilities, and stat effects of the narrative roll.
    pub narrative: NarrativeTuning,
    /// Score-to-effect mapping applied when an interruption resolves.
    pub crisis: CrisisTuning,
    /// Cooldowns and rewards of the manual player actions.
    pub actions: ActionTuning,
}

/// Countdown and log parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockTuning {
    /// Whole seconds on the countdown when a session starts.
    pub session_length_seconds: u32,
    /// Maximum number of narrated entries retained, most recent first.
    pub log_capacity: usize,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            session_length_seconds: 35,
            log_capacity: 10,
        }
    }
}

/// Narrative roll parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeTuning {
    /// Simulated milliseconds between two narrative rolls.
    pub interval_millis: u64,
    /// Interruption probability while the shuffled queue still holds unconsumed kinds.
    pub crisis_chance_fresh: f64,
    /// Interruption probability once the shuffled queue has been exhausted.
    pub crisis_chance_exhausted: f64,
    /// Rolls strictly above this value narrate a positive beat.
    pub positive_above: f64,
    /// Rolls strictly below this value narrate a negative beat.
    pub negative_below: f64,
    /// Hype gained by a positive beat and lost by a negative one.
    pub hype_step: u8,
    /// Score granted by a positive beat.
    pub score_bonus: u64,
}

impl Default for NarrativeTuning {
    fn default() -> Self {
        Self {
            interval_millis: 2_500,
            crisis_chance_fresh: 0.35,
            crisis_chance_exhausted: 0.08,
            positive_above: 0.6,
            negative_below: 0.3,
            hype_step: 5,
            score_bonus: 100,
        }
    }
}

/// Interruption resolution parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrisisTuning {
    /// Minigame scores strictly above this threshold resolve successfully.
    pub success_threshold: u8,
    /// Multiplier converting a successful minigame score into performance score.
    pub score_multiplier: u64,
    /// Hype gained on success and lost on failure.
    pub hype_swing: u8,
}

impl Default for CrisisTuning {
    fn default() -> Self {
        Self {
            success_threshold: 50,
            score_multiplier: 10,
            hype_swing: 20,
        }
    }
}

/// Manual action parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTuning {
    /// Seconds before the song can be switched again.
    pub song_switch_cooldown_seconds: u32,
    /// Seconds before stage effects can be triggered again.
    pub fx_cooldown_seconds: u32,
    /// Hype granted by triggering stage effects.
    pub fx_hype_boost: u8,
}

impl Default for ActionTuning {
    fn default() -> Self {
        Self {
            song_switch_cooldown_seconds: 5,
            fx_cooldown_seconds: 16,
            fx_hype_boost: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Tuning;

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let tuning: Tuning = toml::from_str(
            r#"
            [clock]
            session_length_seconds = 60

            [narrative]
            crisis_chance_fresh = 0.5
            "#,
        )
        .expect("parse tuning");

        assert_eq!(tuning.clock.session_length_seconds, 60);
        assert_eq!(tuning.clock.log_capacity, 10);
        assert!((tuning.narrative.crisis_chance_fresh - 0.5).abs() < f64::EPSILON);
        assert_eq!(tuning.narrative.interval_millis, 2_500);
        assert_eq!(tuning.actions, Tuning::default().actions);
    }

    #[test]
    fn empty_document_matches_default() {
        let tuning: Tuning = toml::from_str("").expect("parse tuning");
        assert_eq!(tuning, Tuning::default());
    }
}
