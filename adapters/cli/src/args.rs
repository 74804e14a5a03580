//! Command-line arguments of the headless concert host.

use std::path::PathBuf;

use clap::Parser;

/// Plays one concert end to end and prints the narrated show and its outcome.
#[derive(Debug, Parser)]
#[command(name = "concert", version, about)]
pub(crate) struct Args {
    /// Seed for every random draw of the session.
    #[arg(long, default_value_t = 0)]
    pub(crate) seed: u64,

    /// Venue capacity.
    #[arg(long, default_value_t = 500)]
    pub(crate) capacity: u32,

    /// Flat rent owed to the venue.
    #[arg(long, default_value_t = 0)]
    pub(crate) rent: u32,

    /// Standing of the venue on the circuit.
    #[arg(long, default_value_t = 1)]
    pub(crate) prestige: i32,

    /// City whose economy settles the revenue.
    #[arg(long, default_value = "atlanta")]
    pub(crate) city: String,

    /// Ticket price in whole currency units.
    #[arg(long, default_value_t = 25)]
    pub(crate) ticket_price: u32,

    /// Starting hype (0-100).
    #[arg(long, default_value_t = 50, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub(crate) hype: u32,

    /// Play a practice session without a venue.
    #[arg(long)]
    pub(crate) practice: bool,

    /// Skill of the simulated minigame player (0-100).
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub(crate) skill: u8,

    /// Cash on hand before the show.
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub(crate) cash: i64,

    /// Fan count before the show.
    #[arg(long, default_value_t = 0)]
    pub(crate) fans: i64,

    /// Track source to perform; repeat for a longer setlist.
    #[arg(long = "track", value_name = "URL")]
    pub(crate) tracks: Vec<String>,

    /// TOML file overriding tuning and city economics.
    #[arg(long, value_name = "FILE")]
    pub(crate) tuning: Option<PathBuf>,

    /// Print the result as JSON instead of text.
    #[arg(long)]
    pub(crate) json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub(crate) verbose: u8,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn defaults_describe_a_small_paid_show() {
        let args = Args::try_parse_from(["concert"]).expect("defaults parse");
        assert_eq!(args.capacity, 500);
        assert_eq!(args.ticket_price, 25);
        assert!(!args.practice);
        assert!(args.tracks.is_empty());
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn repeated_flags_accumulate() {
        let args = Args::try_parse_from([
            "concert", "--track", "a.ogg", "--track", "b.ogg", "-vv", "--cash", "-300",
        ])
        .expect("parse");
        assert_eq!(args.tracks, ["a.ogg", "b.ogg"]);
        assert_eq!(args.verbose, 2);
        assert_eq!(args.cash, -300);
    }

    #[test]
    fn out_of_range_skill_is_rejected() {
        assert!(Args::try_parse_from(["concert", "--skill", "101"]).is_err());
        assert!(Args::try_parse_from(["concert", "--hype", "150"]).is_err());
    }
}
