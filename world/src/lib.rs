#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative concert session state.
//!
//! The world owns at most one live session and mutates it exclusively through
//! [`apply`]. Every accepted command broadcasts the [`Event`] values that
//! describe what changed; rejected commands leave the state untouched and
//! return a [`SessionError`].

mod log;

use concert_core::{
    Command, CrisisResolution, CrisisState, CrisisVerdict, Event, Gig, Hype, InterruptionKind,
    NarrativeMood, Phase, PlayerAction, SessionError, Tuning, TICK,
};

use crate::log::NarrationLog;

/// Represents the authoritative concert world.
#[derive(Debug)]
pub struct World {
    tuning: Tuning,
    session: Option<Session>,
}

impl World {
    /// Creates an idle world using the default tuning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_tuning(Tuning::default())
    }

    /// Creates an idle world using the provided tuning.
    #[must_use]
    pub fn with_tuning(tuning: Tuning) -> Self {
        Self {
            tuning,
            session: None,
        }
    }

    fn live_session_mut(&mut self) -> Result<&mut Session, SessionError> {
        self.session.as_mut().ok_or(SessionError::NoSession)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// A live concert run.
#[derive(Debug)]
struct Session {
    phase: Phase,
    gig: Gig,
    time_left_seconds: u32,
    elapsed_seconds: u32,
    score: u64,
    hype: Hype,
    song_switch_cooldown_seconds: u32,
    fx_cooldown_seconds: u32,
    track_index: usize,
    crisis: Option<CrisisState>,
    log: NarrationLog,
}

impl Session {
    fn open(gig: Gig, tuning: &Tuning) -> Self {
        let mut log = NarrationLog::new(tuning.clock.log_capacity);
        let opening = match gig.venue.as_ref() {
            Some(venue) => format!("Lights up in {}.", venue.city().as_str()),
            None => "Practice session underway.".to_owned(),
        };
        log.record(0, opening);

        Self {
            phase: Phase::Running,
            time_left_seconds: tuning.clock.session_length_seconds,
            elapsed_seconds: 0,
            score: 0,
            hype: gig.baseline_hype,
            song_switch_cooldown_seconds: 0,
            fx_cooldown_seconds: 0,
            track_index: 0,
            crisis: None,
            log,
            gig,
        }
    }

    fn ensure_action_allowed(&self, action: PlayerAction) -> Result<(), SessionError> {
        match self.phase {
            Phase::Running => {}
            Phase::Interrupted => return Err(SessionError::Suspended { action }),
            Phase::Finished => return Err(SessionError::AlreadyFinished),
            Phase::Idle => return Err(SessionError::NoSession),
        }

        let remaining_seconds = match action {
            PlayerAction::SwitchSong => self.song_switch_cooldown_seconds,
            PlayerAction::TriggerFx => self.fx_cooldown_seconds,
        };
        if remaining_seconds > 0 {
            return Err(SessionError::OnCooldown {
                action,
                remaining_seconds,
            });
        }
        Ok(())
    }

    fn announce_expiry(&self, out_events: &mut Vec<Event>) {
        if self.phase == Phase::Running && self.time_left_seconds == 0 {
            out_events.push(Event::CountdownExpired);
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// A rejected command returns an error and leaves both the world and
/// `out_events` untouched.
pub fn apply(
    world: &mut World,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), SessionError> {
    match command {
        Command::StartSession { gig } => {
            if let Some(session) = world.session.as_ref() {
                if matches!(session.phase, Phase::Running | Phase::Interrupted) {
                    return Err(SessionError::SessionInProgress);
                }
            }
            let Some(opening_track) = gig.setlist.wrapping_track(0) else {
                return Err(SessionError::InvalidArgument(
                    "setlist must contain at least one track".to_owned(),
                ));
            };

            out_events.push(Event::SessionStarted {
                time_left_seconds: world.tuning.clock.session_length_seconds,
                hype: gig.baseline_hype,
                opening_track_url: opening_track.url.clone(),
            });
            let session = Session::open(gig, &world.tuning);
            session.announce_expiry(out_events);
            world.session = Some(session);
        }
        Command::Tick => {
            let Some(session) = world.session.as_mut() else {
                return Ok(());
            };
            if session.phase != Phase::Running {
                return Ok(());
            }
            if session.time_left_seconds == 0 {
                session.announce_expiry(out_events);
                return Ok(());
            }

            session.time_left_seconds -= 1;
            session.elapsed_seconds = session.elapsed_seconds.saturating_add(1);
            session.song_switch_cooldown_seconds =
                session.song_switch_cooldown_seconds.saturating_sub(1);
            session.fx_cooldown_seconds = session.fx_cooldown_seconds.saturating_sub(1);

            out_events.push(Event::TimeAdvanced {
                dt: TICK,
                time_left_seconds: session.time_left_seconds,
            });
            session.announce_expiry(out_events);
        }
        Command::Narrate { mood, line } => {
            let tuning = &world.tuning.narrative;
            let Some(session) = world.session.as_mut() else {
                return Err(SessionError::NoSession);
            };
            if session.phase != Phase::Running {
                return Ok(());
            }

            let step = i32::from(tuning.hype_step);
            match mood {
                NarrativeMood::Positive => {
                    session.hype = session.hype.adjusted(step);
                    session.score = session.score.saturating_add(tuning.score_bonus);
                }
                NarrativeMood::Negative => session.hype = session.hype.adjusted(-step),
                NarrativeMood::Neutral => {}
            }

            session.log.record(session.elapsed_seconds, line);
            out_events.push(Event::NarrativeBeat {
                mood,
                line,
                hype: session.hype,
            });
        }
        Command::RequestCrisis => {}
        Command::BeginCrisis { kind } => {
            let session = world.live_session_mut()?;
            if session.crisis.is_some() || session.phase != Phase::Running {
                return Ok(());
            }

            let crisis = CrisisState::for_kind(kind);
            session.crisis = Some(crisis);
            session.phase = Phase::Interrupted;
            session.log.record(session.elapsed_seconds, crisis.label);
            out_events.push(Event::CrisisStarted { crisis });
        }
        Command::ResolveCrisis { resolution } => {
            let Some(session) = world.session.as_mut() else {
                return Err(SessionError::NoActiveCrisis);
            };
            let Some(crisis) = session.crisis.take() else {
                return Err(SessionError::NoActiveCrisis);
            };

            session.score = session.score.saturating_add(resolution.score_gain);
            session.hype = session.hype.adjusted(resolution.hype_delta);
            session.phase = Phase::Running;
            session
                .log
                .record(session.elapsed_seconds, resolution_line(crisis.kind, resolution));

            out_events.push(Event::CrisisResolved {
                kind: crisis.kind,
                resolution,
                hype: session.hype,
                score: session.score,
            });
            session.announce_expiry(out_events);
        }
        Command::SwitchSong => {
            let cooldown = world.tuning.actions.song_switch_cooldown_seconds;
            let session = world.live_session_mut()?;
            session.ensure_action_allowed(PlayerAction::SwitchSong)?;

            let next_index = (session.track_index + 1) % session.gig.setlist.len().max(1);
            let Some(track) = session.gig.setlist.wrapping_track(next_index) else {
                return Err(SessionError::InvalidArgument(
                    "setlist must contain at least one track".to_owned(),
                ));
            };
            let url = track.url.clone();
            let line = format!("Switching it up: {}.", track.title);

            session.track_index = next_index;
            session.song_switch_cooldown_seconds = cooldown;
            session.log.record(session.elapsed_seconds, line);
            out_events.push(Event::SongSwitched {
                track_index: next_index,
                url,
            });
        }
        Command::TriggerFx => {
            let actions = &world.tuning.actions;
            let (cooldown, boost) = (actions.fx_cooldown_seconds, actions.fx_hype_boost);
            let session = world.live_session_mut()?;
            session.ensure_action_allowed(PlayerAction::TriggerFx)?;

            session.fx_cooldown_seconds = cooldown;
            session.hype = session.hype.adjusted(i32::from(boost));
            session.log.record(session.elapsed_seconds, "Pyro! The crowd roars.");
            out_events.push(Event::EffectsTriggered { hype: session.hype });
        }
        Command::FinishSession => {
            let session = world.live_session_mut()?;
            match session.phase {
                Phase::Finished => return Err(SessionError::AlreadyFinished),
                Phase::Interrupted => return Err(SessionError::CrisisPending),
                Phase::Running | Phase::Idle => {}
            }
            if session.time_left_seconds > 0 {
                return Err(SessionError::CountdownRunning {
                    time_left_seconds: session.time_left_seconds,
                });
            }

            session.phase = Phase::Finished;
            session.log.record(session.elapsed_seconds, "That's the show!");
            out_events.push(Event::SessionFinished);
        }
        Command::TearDown => {
            if world.session.take().is_some() {
                out_events.push(Event::SessionTornDown);
            }
        }
    }

    Ok(())
}

fn resolution_line(kind: InterruptionKind, resolution: CrisisResolution) -> String {
    match resolution.verdict {
        CrisisVerdict::Success => format!("{} Handled it like a pro.", kind.label()),
        CrisisVerdict::Failure => format!("{} The crowd noticed.", kind.label()),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use concert_core::{
        CrisisState, Hype, PerformanceSummary, Phase, SessionSnapshot, Tuning,
    };

    use super::World;

    /// Provides read-only access to the world's tuning.
    #[must_use]
    pub fn tuning(world: &World) -> &Tuning {
        &world.tuning
    }

    /// Current lifecycle phase; [`Phase::Idle`] when no session exists.
    #[must_use]
    pub fn phase(world: &World) -> Phase {
        world
            .session
            .as_ref()
            .map_or(Phase::Idle, |session| session.phase)
    }

    /// Countdown remaining, if a session exists.
    #[must_use]
    pub fn time_left_seconds(world: &World) -> Option<u32> {
        world
            .session
            .as_ref()
            .map(|session| session.time_left_seconds)
    }

    /// Current hype, if a session exists.
    #[must_use]
    pub fn hype(world: &World) -> Option<Hype> {
        world.session.as_ref().map(|session| session.hype)
    }

    /// Accumulated score, if a session exists.
    #[must_use]
    pub fn score(world: &World) -> Option<u64> {
        world.session.as_ref().map(|session| session.score)
    }

    /// The live interruption, if any.
    #[must_use]
    pub fn crisis(world: &World) -> Option<&CrisisState> {
        world
            .session
            .as_ref()
            .and_then(|session| session.crisis.as_ref())
    }

    /// Reports whether the countdown expired while the session is running.
    #[must_use]
    pub fn is_ready_to_finish(world: &World) -> bool {
        world
            .session
            .as_ref()
            .is_some_and(|session| session.phase == Phase::Running && session.time_left_seconds == 0)
    }

    /// Captures a read-only view of the session for display.
    #[must_use]
    pub fn snapshot(world: &World) -> Option<SessionSnapshot> {
        world.session.as_ref().map(|session| SessionSnapshot {
            phase: session.phase,
            time_left_seconds: session.time_left_seconds,
            score: session.score,
            hype: session.hype,
            song_switch_cooldown_seconds: session.song_switch_cooldown_seconds,
            fx_cooldown_seconds: session.fx_cooldown_seconds,
            track_index: session.track_index,
            crisis: session.crisis,
            log: session.log.to_vec(),
        })
    }

    /// Distills the session into the inputs of the outcome calculator.
    #[must_use]
    pub fn performance_summary(world: &World) -> Option<PerformanceSummary> {
        world.session.as_ref().map(|session| PerformanceSummary {
            venue: session.gig.venue.clone(),
            ticket_price: session.gig.ticket_price,
            score: session.score,
            hype: session.hype,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concert_core::{Setlist, TicketPrice, Track};

    fn gig(baseline: u32) -> Gig {
        Gig {
            venue: None,
            ticket_price: TicketPrice::new(20),
            setlist: Setlist::new(vec![
                Track::new("Opener", "opener.mp3"),
                Track::new("Closer", "closer.mp3"),
            ]),
            baseline_hype: Hype::new(baseline),
        }
    }

    fn started(baseline: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::StartSession { gig: gig(baseline) }, &mut events)
            .expect("start");
        world
    }

    #[test]
    fn start_rejects_empty_setlist() {
        let mut world = World::new();
        let mut events = Vec::new();
        let mut empty = gig(50);
        empty.setlist = Setlist::default();

        let result = apply(&mut world, Command::StartSession { gig: empty }, &mut events);

        assert!(matches!(result, Err(SessionError::InvalidArgument(_))));
        assert!(events.is_empty());
        assert_eq!(query::phase(&world), Phase::Idle);
    }

    #[test]
    fn start_initialises_counters() {
        let world = started(60);
        let snapshot = query::snapshot(&world).expect("session");

        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(snapshot.time_left_seconds, 35);
        assert_eq!(snapshot.score, 0);
        assert_eq!(snapshot.hype.get(), 60);
        assert_eq!(snapshot.log.len(), 1);
    }

    #[test]
    fn start_rejected_while_running() {
        let mut world = started(50);
        let mut events = Vec::new();
        let result = apply(&mut world, Command::StartSession { gig: gig(50) }, &mut events);
        assert_eq!(result, Err(SessionError::SessionInProgress));
    }

    #[test]
    fn tick_decrements_countdown_and_cooldowns() {
        let mut world = started(50);
        let mut events = Vec::new();
        apply(&mut world, Command::SwitchSong, &mut events).expect("switch");
        apply(&mut world, Command::Tick, &mut events).expect("tick");

        let snapshot = query::snapshot(&world).expect("session");
        assert_eq!(snapshot.time_left_seconds, 34);
        assert_eq!(snapshot.song_switch_cooldown_seconds, 4);
        assert_eq!(snapshot.fx_cooldown_seconds, 0);
    }

    #[test]
    fn crisis_suspends_ticks_and_actions() {
        let mut world = started(50);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::BeginCrisis {
                kind: InterruptionKind::PowerSurge,
            },
            &mut events,
        )
        .expect("crisis");
        events.clear();

        apply(&mut world, Command::Tick, &mut events).expect("tick");
        assert!(events.is_empty());
        assert_eq!(query::time_left_seconds(&world), Some(35));
        assert_eq!(
            apply(&mut world, Command::TriggerFx, &mut events),
            Err(SessionError::Suspended {
                action: PlayerAction::TriggerFx
            })
        );
    }

    #[test]
    fn second_crisis_is_ignored() {
        let mut world = started(50);
        let mut events = Vec::new();
        for kind in [InterruptionKind::MicFeedback, InterruptionKind::CrowdSurge] {
            apply(&mut world, Command::BeginCrisis { kind }, &mut events).expect("crisis");
        }

        assert_eq!(events.len(), 1);
        assert_eq!(
            query::crisis(&world).map(|crisis| crisis.kind),
            Some(InterruptionKind::MicFeedback)
        );
    }

    #[test]
    fn resolving_without_crisis_is_rejected() {
        let mut world = started(50);
        let mut events = Vec::new();
        let resolution = CrisisResolution {
            verdict: CrisisVerdict::Success,
            score_gain: 600,
            hype_delta: 20,
        };
        assert_eq!(
            apply(&mut world, Command::ResolveCrisis { resolution }, &mut events),
            Err(SessionError::NoActiveCrisis)
        );
    }

    #[test]
    fn switch_song_respects_cooldown() {
        let mut world = started(50);
        let mut events = Vec::new();
        apply(&mut world, Command::SwitchSong, &mut events).expect("switch");

        assert_eq!(
            apply(&mut world, Command::SwitchSong, &mut events),
            Err(SessionError::OnCooldown {
                action: PlayerAction::SwitchSong,
                remaining_seconds: 5
            })
        );

        for _ in 0..5 {
            apply(&mut world, Command::Tick, &mut events).expect("tick");
        }
        events.clear();
        apply(&mut world, Command::SwitchSong, &mut events).expect("switch again");
        assert_eq!(
            events,
            vec![Event::SongSwitched {
                track_index: 0,
                url: "opener.mp3".to_owned()
            }]
        );
    }

    #[test]
    fn trigger_fx_boosts_hype_up_to_cap() {
        let mut world = started(98);
        let mut events = Vec::new();
        apply(&mut world, Command::TriggerFx, &mut events).expect("fx");

        assert_eq!(query::hype(&world), Some(Hype::MAX));
        assert_eq!(
            query::snapshot(&world).map(|snapshot| snapshot.fx_cooldown_seconds),
            Some(16)
        );
    }

    #[test]
    fn finish_requires_expired_countdown() {
        let mut world = started(50);
        let mut events = Vec::new();
        assert_eq!(
            apply(&mut world, Command::FinishSession, &mut events),
            Err(SessionError::CountdownRunning {
                time_left_seconds: 35
            })
        );

        for _ in 0..35 {
            apply(&mut world, Command::Tick, &mut events).expect("tick");
        }
        assert!(events.ends_with(&[
            Event::TimeAdvanced {
                dt: TICK,
                time_left_seconds: 0
            },
            Event::CountdownExpired
        ]));
        assert!(query::is_ready_to_finish(&world));

        apply(&mut world, Command::FinishSession, &mut events).expect("finish");
        assert_eq!(
            apply(&mut world, Command::FinishSession, &mut events),
            Err(SessionError::AlreadyFinished)
        );
    }

    #[test]
    fn negative_narration_floors_hype_at_zero() {
        let mut world = started(3);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Narrate {
                mood: NarrativeMood::Negative,
                line: "Somebody yawns loudly.",
            },
            &mut events,
        )
        .expect("narrate");

        assert_eq!(query::hype(&world), Some(Hype::MIN));
        assert_eq!(query::score(&world), Some(0));
    }

    #[test]
    fn teardown_discards_session() {
        let mut world = started(50);
        let mut events = Vec::new();
        apply(&mut world, Command::TearDown, &mut events).expect("teardown");

        assert_eq!(events, vec![Event::SessionTornDown]);
        assert_eq!(query::phase(&world), Phase::Idle);
        assert_eq!(
            apply(&mut world, Command::FinishSession, &mut events),
            Err(SessionError::NoSession)
        );
    }
}
