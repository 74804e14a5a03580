#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the concert performance engine.
//!
//! This crate defines the message surface that connects the host, the
//! authoritative world, and pure systems. The engine submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems
//! and the host to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command batches.

mod tuning;

use std::{fmt, num::NonZeroU32, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tuning::{ActionTuning, ClockTuning, CrisisTuning, NarrativeTuning, Tuning};

/// Simulated time covered by a single heartbeat.
pub const TICK: Duration = Duration::from_secs(1);

/// Label of the random stream feeding narrative rolls.
pub const RNG_STREAM_NARRATIVE: &str = "concert/narrative";
/// Label of the random stream shuffling and refilling the interruption queue.
pub const RNG_STREAM_INTERRUPTIONS: &str = "concert/interruptions";
/// Label of the random stream producing the final luck roll.
pub const RNG_STREAM_LUCK: &str = "concert/luck";

/// Coarse lifecycle of a concert session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No session exists, either never started or torn down.
    Idle,
    /// The heartbeat advances the countdown and rolls narrative events.
    Running,
    /// A mandatory interruption is live and the heartbeat is suspended.
    Interrupted,
    /// The outcome has been computed; the session only awaits disposal.
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Interrupted => "interrupted",
            Self::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Opens a new session for the provided gig.
    StartSession {
        /// Venue, pricing, setlist, and starting hype of the performance.
        gig: Gig,
    },
    /// Advances the countdown and cooldowns by one [`TICK`].
    Tick,
    /// Narrates a beat and applies its stat effect.
    Narrate {
        /// Classification that determines the stat effect.
        mood: NarrativeMood,
        /// Cosmetic line appended to the log.
        line: &'static str,
    },
    /// Asks the arbiter to open an interruption; the world ignores it.
    RequestCrisis,
    /// Opens a mandatory interruption of the provided kind.
    BeginCrisis {
        /// Interruption selected by the arbiter.
        kind: InterruptionKind,
    },
    /// Closes the live interruption and folds its effect into the session.
    ResolveCrisis {
        /// Effect derived from the externally scored minigame.
        resolution: CrisisResolution,
    },
    /// Moves to the next track of the setlist.
    SwitchSong,
    /// Fires stage effects for a hype boost.
    TriggerFx,
    /// Closes the session once the countdown has expired.
    FinishSession,
    /// Discards the session without computing an outcome.
    TearDown,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that a session opened.
    SessionStarted {
        /// Countdown length of the new session.
        time_left_seconds: u32,
        /// Baseline hype the session starts from.
        hype: Hype,
        /// Source of the opening track.
        opening_track_url: String,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Countdown remaining after the tick.
        time_left_seconds: u32,
    },
    /// Reports a narrated beat and the hype that resulted from it.
    NarrativeBeat {
        /// Classification of the beat.
        mood: NarrativeMood,
        /// Cosmetic line that was narrated.
        line: &'static str,
        /// Hype after the beat was applied.
        hype: Hype,
    },
    /// Announces that a mandatory interruption is now live.
    CrisisStarted {
        /// Interruption awaiting its minigame.
        crisis: CrisisState,
    },
    /// Confirms that the live interruption was resolved.
    CrisisResolved {
        /// Interruption that was resolved.
        kind: InterruptionKind,
        /// Effect that was applied.
        resolution: CrisisResolution,
        /// Hype after the resolution.
        hype: Hype,
        /// Score after the resolution.
        score: u64,
    },
    /// Confirms that the setlist advanced to another track.
    SongSwitched {
        /// Index of the track now playing.
        track_index: usize,
        /// Source of the track now playing.
        url: String,
    },
    /// Confirms that stage effects fired.
    EffectsTriggered {
        /// Hype after the boost.
        hype: Hype,
    },
    /// Reports that the countdown reached zero while the session is running.
    CountdownExpired,
    /// Confirms that the session closed and its outcome may be computed.
    SessionFinished,
    /// Confirms that the session was discarded without an outcome.
    SessionTornDown,
}

/// Audience approval meter bounded to `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Hype(u8);

impl Hype {
    /// Lowest possible hype.
    pub const MIN: Self = Self(0);
    /// Highest possible hype.
    pub const MAX: Self = Self(100);

    /// Creates a hype value, saturating anything above the maximum.
    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(u8::try_from(value.min(u32::from(Self::MAX.0))).unwrap_or(Self::MAX.0))
    }

    /// Retrieves the numeric representation of the hype.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Applies a signed change, clamping the result into `0..=100`.
    #[must_use]
    pub fn adjusted(self, delta: i32) -> Self {
        let value = (i32::from(self.0) + delta).clamp(0, i32::from(Self::MAX.0));
        Self(u8::try_from(value).unwrap_or(Self::MAX.0))
    }
}

/// Key identifying the city whose economy settles a venue's revenue.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CityKey(String);

impl CityKey {
    /// Creates a new city key.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Borrows the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Location hosting a ticketed performance. Immutable once a session starts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    capacity: NonZeroU32,
    rent_cost: u32,
    prestige: i32,
    city: CityKey,
}

impl Venue {
    /// Creates a venue, rejecting a zero capacity.
    pub fn new(
        capacity: u32,
        rent_cost: u32,
        prestige: i32,
        city: CityKey,
    ) -> Result<Self, SessionError> {
        let capacity = NonZeroU32::new(capacity).ok_or_else(|| {
            SessionError::InvalidArgument("venue capacity must be positive".to_owned())
        })?;
        Ok(Self {
            capacity,
            rent_cost,
            prestige,
            city,
        })
    }

    /// Maximum attendance.
    #[must_use]
    pub const fn capacity(&self) -> NonZeroU32 {
        self.capacity
    }

    /// Flat rent owed for the night.
    #[must_use]
    pub const fn rent_cost(&self) -> u32 {
        self.rent_cost
    }

    /// Standing of the venue on the circuit.
    #[must_use]
    pub const fn prestige(&self) -> i32 {
        self.prestige
    }

    /// City whose economy settles the venue's revenue.
    #[must_use]
    pub const fn city(&self) -> &CityKey {
        &self.city
    }
}

/// Price of a single ticket in whole currency units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketPrice(u32);

impl TicketPrice {
    /// Creates a new ticket price.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the price.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Single playable entry of a setlist.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// Display title of the track.
    pub title: String,
    /// Source handed to the audio port.
    pub url: String,
}

impl Track {
    /// Creates a new track description.
    #[must_use]
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Ordered tracks performed during a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setlist {
    tracks: Vec<Track>,
}

impl Setlist {
    /// Creates a setlist from the provided tracks.
    #[must_use]
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Tracks in performance order.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of tracks in the setlist.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Reports whether the setlist holds no tracks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at the provided position, wrapping around the end of the list.
    #[must_use]
    pub fn wrapping_track(&self, index: usize) -> Option<&Track> {
        if self.tracks.is_empty() {
            return None;
        }
        self.tracks.get(index % self.tracks.len())
    }
}

/// Everything required to open a session.
#[derive(Clone, Debug, PartialEq)]
pub struct Gig {
    /// Venue for ticketed shows; `None` for practice sessions.
    pub venue: Option<Venue>,
    /// Ticket price charged at the door.
    pub ticket_price: TicketPrice,
    /// Tracks performed during the session.
    pub setlist: Setlist,
    /// Starting hype derived from the venue and relationships.
    pub baseline_hype: Hype,
}

/// Kinds of mandatory interruption that can suspend a performance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum InterruptionKind {
    /// The monitors squeal and the mix must be rescued.
    MicFeedback,
    /// The performer blanks on a verse.
    ForgottenLyrics,
    /// A heckler demands a freestyle battle.
    HecklerBattle,
    /// The stage power flickers.
    PowerSurge,
    /// The pit surges toward the barrier.
    CrowdSurge,
}

impl InterruptionKind {
    /// Every interruption kind in canonical order.
    pub const ALL: [Self; 5] = [
        Self::MicFeedback,
        Self::ForgottenLyrics,
        Self::HecklerBattle,
        Self::PowerSurge,
        Self::CrowdSurge,
    ];

    /// Short headline shown while the interruption is live.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MicFeedback => "Mic feedback!",
            Self::ForgottenLyrics => "Lyrics gone!",
            Self::HecklerBattle => "Heckler!",
            Self::PowerSurge => "Power surge!",
            Self::CrowdSurge => "Crowd surge!",
        }
    }

    /// Longer prompt describing what the player must do.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::MicFeedback => "The monitors are screaming. Ride the faders back to a clean mix.",
            Self::ForgottenLyrics => "Your mind goes blank mid-verse. Rebuild the bars before the beat drops.",
            Self::HecklerBattle => "Someone up front wants smoke. Out-rhyme them before the crowd turns.",
            Self::PowerSurge => "The rig is flickering. Reroute power before the stage goes dark.",
            Self::CrowdSurge => "The pit is crushing the barrier. Calm the crowd down.",
        }
    }
}

/// The single live interruption of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CrisisState {
    /// Kind of interruption.
    pub kind: InterruptionKind,
    /// Short headline.
    pub label: &'static str,
    /// Longer prompt.
    pub message: &'static str,
}

impl CrisisState {
    /// Builds the crisis description for the provided kind.
    #[must_use]
    pub const fn for_kind(kind: InterruptionKind) -> Self {
        Self {
            kind,
            label: kind.label(),
            message: kind.message(),
        }
    }
}

/// Result reported by an interruption minigame, normalised to `0..=100`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MinigameScore(u8);

impl MinigameScore {
    /// Highest score a minigame may report.
    pub const MAX: u32 = 100;

    /// Creates a score, rejecting values outside `0..=100`.
    pub fn new(value: u32) -> Result<Self, SessionError> {
        if value > Self::MAX {
            return Err(SessionError::InvalidArgument(format!(
                "minigame score {value} exceeds {}",
                Self::MAX
            )));
        }
        u8::try_from(value)
            .map(Self)
            .map_err(|_| SessionError::InvalidArgument(format!("minigame score {value}")))
    }

    /// Retrieves the numeric representation of the score.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }
}

/// Classification of a resolved interruption.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrisisVerdict {
    /// The player handled the interruption.
    Success,
    /// The interruption hurt the show.
    Failure,
}

/// Effect folded into the session when an interruption resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CrisisResolution {
    /// Classification of the resolution.
    pub verdict: CrisisVerdict,
    /// Score added to the session.
    pub score_gain: u64,
    /// Signed hype change, clamped by the world.
    pub hype_delta: i32,
}

/// Classification of a narrated beat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NarrativeMood {
    /// The crowd loves it.
    Positive,
    /// Flavor only.
    Neutral,
    /// Something fell flat.
    Negative,
}

impl NarrativeMood {
    /// Cosmetic lines available for the mood.
    #[must_use]
    pub const fn lines(self) -> &'static [&'static str] {
        match self {
            Self::Positive => &[
                "The front row knows every word!",
                "Phones light up across the room.",
                "That drop shook the floor.",
            ],
            Self::Neutral => &[
                "Someone at the bar orders another round.",
                "The lights sweep over the crowd.",
                "The DJ nods along.",
            ],
            Self::Negative => &[
                "A few people drift toward the exit.",
                "The bass muddies the hook.",
                "Somebody yawns loudly.",
            ],
        }
    }
}

/// Manual actions the player may attempt during a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Move to the next track of the setlist.
    SwitchSong,
    /// Fire stage effects.
    TriggerFx,
}

impl fmt::Display for PlayerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SwitchSong => f.write_str("switch song"),
            Self::TriggerFx => f.write_str("trigger effects"),
        }
    }
}

/// Narrated entry retained for audit and display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LogEntry {
    /// Seconds elapsed since the session started.
    pub elapsed_seconds: u32,
    /// Narrated text.
    pub text: String,
}

/// Read-only snapshot of a live session used for display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Current lifecycle phase.
    pub phase: Phase,
    /// Countdown remaining.
    pub time_left_seconds: u32,
    /// Accumulated performance score.
    pub score: u64,
    /// Current hype.
    pub hype: Hype,
    /// Seconds until the song can be switched again.
    pub song_switch_cooldown_seconds: u32,
    /// Seconds until stage effects can fire again.
    pub fx_cooldown_seconds: u32,
    /// Index of the track now playing.
    pub track_index: usize,
    /// Live interruption, if any.
    pub crisis: Option<CrisisState>,
    /// Narrated entries, most recent first.
    pub log: Vec<LogEntry>,
}

/// Final session state handed to the outcome calculator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerformanceSummary {
    /// Venue of the show; `None` for practice sessions.
    pub venue: Option<Venue>,
    /// Ticket price charged at the door.
    pub ticket_price: TicketPrice,
    /// Accumulated performance score.
    pub score: u64,
    /// Hype when the countdown expired.
    pub hype: Hype,
}

/// Single uniform draw in `[0, 1)` classifying catastrophic bad luck.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct LuckRoll(f64);

impl LuckRoll {
    /// Creates a luck roll, rejecting values outside `[0, 1)`.
    pub fn new(value: f64) -> Result<Self, SessionError> {
        if (0.0..1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(SessionError::InvalidArgument(format!(
                "luck roll {value} outside [0, 1)"
            )))
        }
    }

    /// Retrieves the drawn value.
    #[must_use]
    pub const fn get(&self) -> f64 {
        self.0
    }
}

/// Performance skills that wear down after a successful show.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillStats {
    /// Rhythm and delivery.
    pub flow: u32,
    /// Writing.
    pub lyrics: u32,
    /// Stage presence.
    pub charisma: u32,
}

/// Standing with the people around the performer, each in `0..=100`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationships {
    /// Touring crew morale.
    pub crew: u8,
    /// Promoter goodwill.
    pub promoter: u8,
}

/// Host-owned player state read and rewritten by the outcome calculator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStanding {
    /// Cash on hand; negative values are debt.
    pub cash: i64,
    /// Fan count.
    pub fans: i64,
    /// Performance skills.
    pub skills: SkillStats,
    /// Relationships with crew and promoter.
    pub relationships: Relationships,
}

/// Reasons a performance is classified as a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureReason {
    /// The rarest bad-luck tier.
    Catastrophe,
    /// Bad luck independent of the crowd.
    BadLuck,
    /// The crowd never warmed up.
    LowHype,
}

impl FailureReason {
    /// Narrative shown to the player for the failure.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Catastrophe => {
                "The stage rig collapsed mid-set. The venue is demanding damages."
            }
            Self::BadLuck => "A blackout killed the show halfway through. Refunds all round.",
            Self::LowHype => "The crowd never got into it. Word spreads fast.",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Financial and fan outcome of a finished session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeResult {
    /// Change in cash; negative values are losses.
    pub cash_delta: i64,
    /// Change in fan count.
    pub fan_delta: i64,
    /// Whether the show counts as a success.
    pub success: bool,
    /// Why the show failed, if it did.
    pub failure_reason: Option<FailureReason>,
    /// Absolute player standing after the show.
    pub standing: PlayerStanding,
}

/// Taxonomy of errors signalled by session entry points.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// An input violated its contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A manual action was attempted before its cooldown elapsed.
    #[error("{action} is on cooldown for another {remaining_seconds}s")]
    OnCooldown {
        /// Action that was rejected.
        action: PlayerAction,
        /// Seconds until the action becomes available.
        remaining_seconds: u32,
    },
    /// A manual action was attempted while an interruption is live.
    #[error("{action} is unavailable while an interruption is live")]
    Suspended {
        /// Action that was rejected.
        action: PlayerAction,
    },
    /// A resolution arrived without a live interruption.
    #[error("no interruption is active")]
    NoActiveCrisis,
    /// The session was already finished.
    #[error("session already finished")]
    AlreadyFinished,
    /// No session exists.
    #[error("no session is active")]
    NoSession,
    /// A new session was requested while another is still in progress.
    #[error("a session is already in progress")]
    SessionInProgress,
    /// Finishing was requested before the countdown expired.
    #[error("countdown still running with {time_left_seconds}s left")]
    CountdownRunning {
        /// Countdown remaining.
        time_left_seconds: u32,
    },
    /// Finishing was requested while an interruption is live.
    #[error("an interruption must be resolved before finishing")]
    CrisisPending,
}

impl SessionError {
    /// Reports whether the error is recoverable feedback for the player rather
    /// than host misuse.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(self, Self::OnCooldown { .. } | Self::Suspended { .. })
    }
}

/// Failures reported by an audio backend.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    /// The backend could not be reached.
    #[error("audio backend unavailable: {0}")]
    Unavailable(String),
    /// The track could not be played.
    #[error("failed to play {url}: {reason}")]
    Playback {
        /// Source that failed.
        url: String,
        /// Backend-specific explanation.
        reason: String,
    },
}

/// Fire-and-forget playback collaborator.
pub trait AudioPort {
    /// Starts playing the provided source, replacing whatever is playing.
    fn play_track(&mut self, url: &str) -> Result<(), AudioError>;

    /// Stops playback.
    fn stop(&mut self) -> Result<(), AudioError>;
}

/// Audio port that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentAudio;

impl AudioPort for SilentAudio {
    fn play_track(&mut self, _url: &str) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Externally owned scored activity run while an interruption is live.
pub trait MinigamePort {
    /// Runs the minigame for the crisis, returning `None` when the host cancels it.
    fn run_interruption(&mut self, crisis: &CrisisState) -> Option<MinigameScore>;
}

/// Context supplied to the economics collaborator when settling revenue.
#[derive(Clone, Copy, Debug)]
pub struct SettlementContext<'a> {
    /// City of the venue; `None` for practice sessions.
    pub city: Option<&'a CityKey>,
    /// Rent owed to the venue.
    pub rent_cost: u32,
    /// Player state before the show.
    pub standing: &'a PlayerStanding,
}

/// Externally owned city economics applied to raw revenue.
pub trait Economics {
    /// Applies the city multiplier and expenses to raw revenue.
    fn settle(&self, raw_revenue: i64, context: &SettlementContext<'_>) -> i64;
}

#[cfg(test)]
mod tests {
    use super::{
        CityKey, FailureReason, Hype, InterruptionKind, LuckRoll, MinigameScore,
        OutcomeResult, PlayerStanding, SessionError, Setlist, Track, Venue,
    };
    use std::collections::HashSet;

    #[test]
    fn hype_clamps_into_bounds() {
        assert_eq!(Hype::new(250), Hype::MAX);
        assert_eq!(Hype::new(40).adjusted(-90), Hype::MIN);
        assert_eq!(Hype::new(95).adjusted(20), Hype::MAX);
        assert_eq!(Hype::new(50).adjusted(-5).get(), 45);
    }

    #[test]
    fn venue_rejects_zero_capacity() {
        let error = Venue::new(0, 100, 1, CityKey::new("atlanta")).expect_err("zero capacity");
        assert!(matches!(error, SessionError::InvalidArgument(_)));
    }

    #[test]
    fn minigame_score_rejects_out_of_range() {
        assert_eq!(MinigameScore::new(100).map(|score| score.get()), Ok(100));
        assert!(MinigameScore::new(101).is_err());
    }

    #[test]
    fn luck_roll_rejects_one_and_nan() {
        assert!(LuckRoll::new(0.0).is_ok());
        assert!(LuckRoll::new(1.0).is_err());
        assert!(LuckRoll::new(f64::NAN).is_err());
    }

    #[test]
    fn interruption_kinds_are_distinct() {
        let unique: HashSet<_> = InterruptionKind::ALL.iter().collect();
        assert_eq!(unique.len(), InterruptionKind::ALL.len());
    }

    #[test]
    fn setlist_wraps_around() {
        let setlist = Setlist::new(vec![Track::new("a", "a.mp3"), Track::new("b", "b.mp3")]);
        assert_eq!(setlist.wrapping_track(3).map(|track| track.title.as_str()), Some("b"));
        assert!(Setlist::default().wrapping_track(0).is_none());
    }

    #[test]
    fn only_cooldown_and_suspension_are_user_facing() {
        assert!(SessionError::Suspended {
            action: super::PlayerAction::TriggerFx
        }
        .is_user_facing());
        assert!(!SessionError::AlreadyFinished.is_user_facing());
        assert!(!SessionError::NoActiveCrisis.is_user_facing());
    }

    #[test]
    fn outcome_round_trips_through_bincode() {
        let outcome = OutcomeResult {
            cash_delta: -1_250,
            fan_delta: -200,
            success: false,
            failure_reason: Some(FailureReason::Catastrophe),
            standing: PlayerStanding {
                cash: -250,
                ..PlayerStanding::default()
            },
        };
        let bytes = bincode::serialize(&outcome).expect("serialize");
        let restored: OutcomeResult = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, outcome);
    }
}
