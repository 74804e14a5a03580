#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Public session API of the concert performance engine.
//!
//! [`ConcertEngine`] owns the authoritative world together with the narrative,
//! crisis, and outcome systems. Hosts drive it through a handful of entry
//! points, each of which appends the events it produced to a caller-provided
//! buffer. Every random draw comes from streams derived from the seed injected
//! at construction, so identical seeds and host inputs replay identically.

mod seed;

use concert_core::{
    AudioPort, Command, CrisisState, Economics, Event, Gig, LuckRoll, MinigamePort,
    MinigameScore, OutcomeResult, Phase, PlayerStanding, SessionError, SessionSnapshot,
    SilentAudio, Tuning,
};
use concert_system_crisis::Arbiter;
use concert_system_narrative::{Config as NarrativeConfig, Narrative};
use concert_system_outcome::IdentityEconomics;
use concert_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use crate::seed::SessionSeeds;

/// Systems and random streams scoped to a single session.
struct SessionSystems {
    narrative: Narrative,
    arbiter: Arbiter,
    luck: ChaCha8Rng,
}

impl SessionSystems {
    fn new(tuning: &Tuning, seeds: SessionSeeds) -> Self {
        Self {
            narrative: Narrative::new(NarrativeConfig::new(
                tuning.narrative.clone(),
                seeds.narrative,
            )),
            arbiter: Arbiter::new(tuning.crisis.clone(), seeds.interruptions),
            luck: ChaCha8Rng::seed_from_u64(seeds.luck),
        }
    }
}

/// Phase controller coordinating the world, the systems, and the host ports.
pub struct ConcertEngine {
    seed: u64,
    sessions_started: u64,
    world: World,
    systems: Option<SessionSystems>,
    audio: Box<dyn AudioPort>,
    economics: Box<dyn Economics>,
}

impl ConcertEngine {
    /// Creates an engine with explicit tuning, seed, and collaborators.
    #[must_use]
    pub fn new(
        tuning: Tuning,
        seed: u64,
        audio: Box<dyn AudioPort>,
        economics: Box<dyn Economics>,
    ) -> Self {
        Self {
            seed,
            sessions_started: 0,
            world: World::with_tuning(tuning),
            systems: None,
            audio,
            economics,
        }
    }

    /// Creates an engine with default tuning, silent audio, and pass-through economics.
    #[must_use]
    pub fn with_defaults(seed: u64) -> Self {
        Self::new(
            Tuning::default(),
            seed,
            Box::new(SilentAudio),
            Box::new(IdentityEconomics),
        )
    }

    /// Tuning every session of this engine runs with.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        query::tuning(&self.world)
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        query::phase(&self.world)
    }

    /// Read-only view of the live session for display.
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        query::snapshot(&self.world)
    }

    /// The live interruption awaiting its minigame, if any.
    #[must_use]
    pub fn pending_crisis(&self) -> Option<&CrisisState> {
        query::crisis(&self.world)
    }

    /// Reports whether [`ConcertEngine::finish`] may be called now.
    #[must_use]
    pub fn is_ready_to_finish(&self) -> bool {
        query::is_ready_to_finish(&self.world)
    }

    /// Opens a session, seeding a fresh interruption queue and narrative stream.
    pub fn start(&mut self, gig: Gig, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::StartSession { gig }, &mut events)?;

        let session_index = self.sessions_started;
        self.sessions_started = self.sessions_started.saturating_add(1);
        self.systems = Some(SessionSystems::new(
            query::tuning(&self.world),
            SessionSeeds::derive(self.seed, session_index),
        ));

        for event in &events {
            if let Event::SessionStarted {
                time_left_seconds,
                hype,
                opening_track_url,
            } = event
            {
                info!(
                    session_index,
                    time_left_seconds,
                    hype = hype.get(),
                    "session started"
                );
                self.play(opening_track_url);
            }
        }
        out.extend(events);
        Ok(())
    }

    /// Advances one second of simulated time; a no-op unless running.
    ///
    /// The countdown, the narrative roll, and any interruption it opens are
    /// applied as one step. [`Event::CountdownExpired`] is only reported when
    /// the step ends with the session still running.
    pub fn tick(&mut self, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let Some(systems) = self.systems.as_mut() else {
            return Ok(());
        };

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events)?;

        let mut commands = Vec::new();
        systems.narrative.handle(
            &events,
            query::phase(&self.world),
            systems.arbiter.has_pending_kinds(),
            &mut commands,
        );
        for command in commands.iter().cloned() {
            world::apply(&mut self.world, command, &mut events)?;
        }

        let mut follow_up = Vec::new();
        systems.arbiter.handle(
            &commands,
            query::phase(&self.world),
            query::crisis(&self.world).is_some(),
            &mut follow_up,
        );
        for command in follow_up {
            world::apply(&mut self.world, command, &mut events)?;
        }

        // Expiry is announced again once the interruption resolves.
        if query::phase(&self.world) == Phase::Interrupted {
            events.retain(|event| *event != Event::CountdownExpired);
        }

        trace_events(&events);
        out.extend(events);
        Ok(())
    }

    /// Opens an interruption on behalf of the host.
    ///
    /// A no-op while an interruption is already live or the session is not running.
    pub fn trigger(&mut self, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let Some(systems) = self.systems.as_mut() else {
            return Err(SessionError::NoSession);
        };

        let mut commands = Vec::new();
        systems.arbiter.handle(
            &[Command::RequestCrisis],
            query::phase(&self.world),
            query::crisis(&self.world).is_some(),
            &mut commands,
        );

        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events)?;
        }
        trace_events(&events);
        out.extend(events);
        Ok(())
    }

    /// Folds a minigame score into the session and resumes the heartbeat.
    ///
    /// Emits [`Event::CountdownExpired`] when the countdown ran out during the
    /// interruption.
    pub fn resolve(
        &mut self,
        score: MinigameScore,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let Some(systems) = self.systems.as_ref() else {
            return Err(SessionError::NoActiveCrisis);
        };

        let mut events = Vec::new();
        world::apply(&mut self.world, systems.arbiter.resolve(score), &mut events)?;
        trace_events(&events);
        out.extend(events);
        Ok(())
    }

    /// Hands the live interruption to the minigame and applies its result.
    ///
    /// A cancelled minigame tears the session down.
    pub fn run_pending_crisis(
        &mut self,
        minigame: &mut dyn MinigamePort,
        out: &mut Vec<Event>,
    ) -> Result<(), SessionError> {
        let crisis = query::crisis(&self.world)
            .copied()
            .ok_or(SessionError::NoActiveCrisis)?;

        match minigame.run_interruption(&crisis) {
            Some(score) => self.resolve(score, out),
            None => {
                info!(kind = ?crisis.kind, "minigame cancelled; tearing session down");
                self.teardown(out)
            }
        }
    }

    /// Moves to the next track of the setlist.
    pub fn switch_song(&mut self, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::SwitchSong, &mut events)?;
        for event in &events {
            if let Event::SongSwitched { track_index, url } = event {
                debug!(track_index, "song switched");
                self.play(url);
            }
        }
        out.extend(events);
        Ok(())
    }

    /// Fires stage effects for a hype boost.
    pub fn trigger_fx(&mut self, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::TriggerFx, &mut events)?;
        trace_events(&events);
        out.extend(events);
        Ok(())
    }

    /// Closes the session and computes its outcome from a single luck draw.
    ///
    /// The draw is only committed once the session actually finishes, so a
    /// rejected call leaves the luck stream untouched.
    pub fn finish(
        &mut self,
        standing: &PlayerStanding,
        out: &mut Vec<Event>,
    ) -> Result<OutcomeResult, SessionError> {
        let mut luck_stream = self
            .systems
            .as_ref()
            .ok_or(SessionError::NoSession)?
            .luck
            .clone();
        let luck = LuckRoll::new(luck_stream.gen::<f64>())?;

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::FinishSession, &mut events)?;
        let summary = query::performance_summary(&self.world).ok_or(SessionError::NoSession)?;
        if let Some(systems) = self.systems.as_mut() {
            systems.luck = luck_stream;
        }

        let outcome = concert_system_outcome::calculate(
            &summary,
            standing,
            luck,
            self.economics.as_ref(),
        );

        info!(
            score = summary.score,
            hype = summary.hype.get(),
            luck = luck.get(),
            cash_delta = outcome.cash_delta,
            fan_delta = outcome.fan_delta,
            success = outcome.success,
            "session finished"
        );
        self.stop_audio();
        out.extend(events);
        Ok(outcome)
    }

    /// Discards the session without computing an outcome; idempotent.
    pub fn teardown(&mut self, out: &mut Vec<Event>) -> Result<(), SessionError> {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::TearDown, &mut events)?;
        self.systems = None;
        if !events.is_empty() {
            info!("session torn down");
            self.stop_audio();
        }
        out.extend(events);
        Ok(())
    }

    fn play(&mut self, url: &str) {
        if let Err(error) = self.audio.play_track(url) {
            warn!(%error, url, "audio playback failed; continuing silently");
        }
    }

    fn stop_audio(&mut self) {
        if let Err(error) = self.audio.stop() {
            warn!(%error, "failed to stop audio");
        }
    }
}

fn trace_events(events: &[Event]) {
    for event in events {
        match event {
            Event::NarrativeBeat { mood, line, hype } => {
                debug!(?mood, hype = hype.get(), line, "narrative beat");
            }
            Event::CrisisStarted { crisis } => {
                debug!(kind = ?crisis.kind, "interruption started");
            }
            Event::CrisisResolved {
                kind,
                resolution,
                hype,
                score,
            } => {
                debug!(
                    ?kind,
                    verdict = ?resolution.verdict,
                    hype = hype.get(),
                    score,
                    "interruption resolved"
                );
            }
            Event::EffectsTriggered { hype } => debug!(hype = hype.get(), "effects triggered"),
            Event::CountdownExpired => debug!("countdown expired"),
            _ => {}
        }
    }
}
