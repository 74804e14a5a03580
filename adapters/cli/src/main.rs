#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line host that plays a concert headlessly with a simulated minigame.

mod args;
mod config;
mod logging;
mod minigame;
mod report;

use anyhow::{bail, Context, Result};
use clap::Parser;
use concert_core::{
    AudioError, AudioPort, CityKey, Event, Gig, Hype, Phase, PlayerStanding, Relationships,
    SessionError, Setlist, SkillStats, TicketPrice, Track, Venue,
};
use concert_engine::ConcertEngine;
use tracing::info;

use crate::{
    args::Args,
    minigame::SimulatedMinigame,
    report::{Moment, ShowReport},
};

const FX_BELOW_HYPE: u8 = 70;
const SONG_LENGTH_SECONDS: u32 = 12;
const STARTING_SKILL: u32 = 50;
const STARTING_RELATIONSHIP: u8 = 50;
const DEFAULT_SETLIST: [&str; 3] = ["intro.ogg", "anthem.ogg", "encore.ogg"];

/// Audio port that only reports what would be playing.
#[derive(Debug, Default)]
struct TracingAudio;

impl AudioPort for TracingAudio {
    fn play_track(&mut self, url: &str) -> Result<(), AudioError> {
        info!(url, "now playing");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        info!("playback stopped");
        Ok(())
    }
}

/// Entry point for the concert command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.verbose);

    let config = config::load(args.tuning.as_deref())?;
    let gig = build_gig(&args)?;
    let standing = PlayerStanding {
        cash: args.cash,
        fans: args.fans,
        skills: SkillStats {
            flow: STARTING_SKILL,
            lyrics: STARTING_SKILL,
            charisma: STARTING_SKILL,
        },
        relationships: Relationships {
            crew: STARTING_RELATIONSHIP,
            promoter: STARTING_RELATIONSHIP,
        },
    };

    let mut engine = ConcertEngine::new(
        config.tuning,
        args.seed,
        Box::new(TracingAudio),
        Box::new(config.economics),
    );
    let mut minigame = SimulatedMinigame::new(args.skill, args.seed);
    let report = perform(&mut engine, gig, &standing, &mut minigame, args.seed)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        );
    } else {
        print!("{}", report::render_text(&report));
    }
    Ok(())
}

fn build_gig(args: &Args) -> Result<Gig> {
    let venue = if args.practice {
        None
    } else {
        Some(
            Venue::new(
                args.capacity,
                args.rent,
                args.prestige,
                CityKey::new(args.city.as_str()),
            )
            .context("invalid venue")?,
        )
    };

    let tracks = if args.tracks.is_empty() {
        DEFAULT_SETLIST
            .iter()
            .map(|url| Track::new(*url, *url))
            .collect()
    } else {
        args.tracks
            .iter()
            .map(|url| Track::new(url.as_str(), url.as_str()))
            .collect()
    };

    Ok(Gig {
        venue,
        ticket_price: TicketPrice::new(args.ticket_price),
        setlist: Setlist::new(tracks),
        baseline_hype: Hype::new(args.hype),
    })
}

fn perform(
    engine: &mut ConcertEngine,
    gig: Gig,
    standing: &PlayerStanding,
    minigame: &mut SimulatedMinigame,
    seed: u64,
) -> Result<ShowReport> {
    let mut events = Vec::new();
    let mut moments = Vec::new();

    engine.start(gig, &mut events).context("failed to start session")?;
    record(engine, &mut events, &mut moments);

    loop {
        if engine.pending_crisis().is_some() {
            engine.run_pending_crisis(minigame, &mut events)?;
        } else if engine.is_ready_to_finish() {
            break;
        } else if engine.phase() == Phase::Running {
            autopilot(engine, &mut events)?;
            engine.tick(&mut events)?;
        } else {
            bail!("session ended unexpectedly in phase {}", engine.phase());
        }
        record(engine, &mut events, &mut moments);
    }

    let outcome = engine.finish(standing, &mut events)?;
    record(engine, &mut events, &mut moments);
    let snapshot = engine
        .snapshot()
        .context("finished session has no snapshot")?;

    Ok(ShowReport {
        seed,
        final_score: snapshot.score,
        final_hype: snapshot.hype.get(),
        moments,
        outcome,
    })
}

/// Plays the manual actions a cautious performer would.
fn autopilot(engine: &mut ConcertEngine, events: &mut Vec<Event>) -> Result<(), SessionError> {
    let Some(snapshot) = engine.snapshot() else {
        return Ok(());
    };
    if snapshot.fx_cooldown_seconds == 0 && snapshot.hype.get() < FX_BELOW_HYPE {
        engine.trigger_fx(events)?;
    }
    if snapshot.song_switch_cooldown_seconds == 0
        && snapshot.time_left_seconds % SONG_LENGTH_SECONDS == 0
    {
        engine.switch_song(events)?;
    }
    Ok(())
}

fn record(engine: &ConcertEngine, events: &mut Vec<Event>, moments: &mut Vec<Moment>) {
    let time_left_seconds = engine
        .snapshot()
        .map_or(0, |snapshot| snapshot.time_left_seconds);
    moments.extend(events.drain(..).filter_map(|event| {
        report::describe(&event).map(|text| Moment {
            time_left_seconds,
            text,
        })
    }));
}
