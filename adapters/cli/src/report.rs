//! Text and JSON rendering of a finished show.

use concert_core::{CrisisVerdict, Event, OutcomeResult};
use serde::Serialize;

/// Narrated moment of the show, stamped with the countdown it happened at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub(crate) struct Moment {
    pub(crate) time_left_seconds: u32,
    pub(crate) text: String,
}

/// Everything printed once the show is over.
#[derive(Debug, Serialize)]
pub(crate) struct ShowReport {
    pub(crate) seed: u64,
    pub(crate) final_score: u64,
    pub(crate) final_hype: u8,
    pub(crate) moments: Vec<Moment>,
    pub(crate) outcome: OutcomeResult,
}

/// Turns an engine event into a line for the show feed, if it deserves one.
pub(crate) fn describe(event: &Event) -> Option<String> {
    match event {
        Event::SessionStarted { hype, .. } => {
            Some(format!("Lights down. The crowd is at {} hype.", hype.get()))
        }
        Event::NarrativeBeat { line, .. } => Some((*line).to_owned()),
        Event::CrisisStarted { crisis } => Some(format!("{} {}", crisis.label, crisis.message)),
        Event::CrisisResolved {
            resolution, hype, ..
        } => Some(match resolution.verdict {
            CrisisVerdict::Success => format!(
                "Saved it! +{} score, hype now {}.",
                resolution.score_gain,
                hype.get()
            ),
            CrisisVerdict::Failure => format!("That one hurt. Hype drops to {}.", hype.get()),
        }),
        Event::SongSwitched { url, .. } => Some(format!("Next up: {url}")),
        Event::EffectsTriggered { hype } => Some(format!("Pyro! Hype hits {}.", hype.get())),
        Event::SessionFinished => Some("That's the show!".to_owned()),
        Event::TimeAdvanced { .. }
        | Event::CountdownExpired
        | Event::SessionTornDown => None,
    }
}

/// Renders the report as human-readable text.
pub(crate) fn render_text(report: &ShowReport) -> String {
    let mut text = String::new();
    for moment in &report.moments {
        text.push_str(&format!("[{:>2}s] {}\n", moment.time_left_seconds, moment.text));
    }

    let outcome = &report.outcome;
    text.push('\n');
    text.push_str(&format!(
        "Final score {} at {} hype.\n",
        report.final_score, report.final_hype
    ));
    match outcome.failure_reason {
        Some(reason) => text.push_str(&format!("Flop: {reason}\n")),
        None => text.push_str("Success!\n"),
    }
    text.push_str(&format!(
        "Cash {:+} (now {}), fans {:+} (now {}).\n",
        outcome.cash_delta, outcome.standing.cash, outcome.fan_delta, outcome.standing.fans
    ));
    text.push_str(&format!(
        "Crew {} / promoter {}.\n",
        outcome.standing.relationships.crew, outcome.standing.relationships.promoter
    ));
    text
}
