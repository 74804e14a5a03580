#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure outcome calculator converting a finished performance into cash and fans.
//!
//! Every ratio is carried in basis points so the results match the floor of
//! the fractional formulas exactly for all integer inputs.

mod economics;

use concert_core::{
    Economics, FailureReason, LuckRoll, OutcomeResult, PerformanceSummary, PlayerStanding,
    Relationships, SettlementContext, SkillStats, Venue,
};

pub use economics::{CityEconomics, IdentityEconomics};

const BPS: i64 = 10_000;
const MIN_FILL_BPS: i64 = 1_000;
const PRICE_PENALTY_FREE_UP_TO: i64 = 50;
const PRICE_PENALTY_BPS_PER_UNIT: i64 = 20;
const SUCCESS_HYPE: u8 = 50;
const CATASTROPHE_BELOW: f64 = 0.05;
const BAD_LUCK_BELOW: f64 = 0.10;
const PRACTICE_BASE_CASH: i64 = 500;
const RELATIONSHIP_MAX: i32 = 100;
const SKILL_ATTRITION_PERCENT: u32 = 3;

/// Crew and promoter changes applied by each branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RelationshipShift {
    crew: i32,
    promoter: i32,
}

const BAD_LUCK_SHIFT: RelationshipShift = RelationshipShift {
    crew: -10,
    promoter: -15,
};
const SUCCESS_SHIFT: RelationshipShift = RelationshipShift {
    crew: 5,
    promoter: 5,
};

/// Classification of the single luck draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Luck {
    Catastrophe,
    Bad,
    Fair,
}

impl Luck {
    fn classify(roll: LuckRoll) -> Self {
        if roll.get() < CATASTROPHE_BELOW {
            Self::Catastrophe
        } else if roll.get() < BAD_LUCK_BELOW {
            Self::Bad
        } else {
            Self::Fair
        }
    }

    fn is_bad(self) -> bool {
        self != Self::Fair
    }
}

/// Ticket sales of a venue show before any branch adjustment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoxOffice {
    /// Share of capacity that attended, in basis points.
    pub fill_bps: i64,
    /// Tickets sold.
    pub attendance: i64,
    /// Ticket sales plus half the performance score.
    pub revenue: i64,
    /// Fans won before any failure adjustment.
    pub fans: i64,
}

impl BoxOffice {
    /// Computes ticket sales for the venue at the provided price, hype, and score.
    #[must_use]
    pub fn compute(venue: &Venue, ticket_price: u32, hype: u8, score: u64) -> Self {
        let price = i64::from(ticket_price);
        let hype = i64::from(hype);
        let capacity = i64::from(venue.capacity().get());

        let penalty_bps = (price - PRICE_PENALTY_FREE_UP_TO).max(0) * PRICE_PENALTY_BPS_PER_UNIT;
        let fill_bps = (hype * 100 - penalty_bps).clamp(MIN_FILL_BPS, BPS);
        let attendance = capacity * fill_bps / BPS;
        let revenue = attendance
            .saturating_mul(price)
            .saturating_add(score_as_i64(score) / 2);
        let fans = attendance * hype / 200;

        Self {
            fill_bps,
            attendance,
            revenue,
            fans,
        }
    }
}

/// Converts the final session state into cash and fan deltas.
///
/// The calculator first derives the absolute standing the player ends up
/// with, then diffs it once against `standing` to produce the deltas.
/// Draw-driven failures are ordinary results, never errors.
#[must_use]
pub fn calculate(
    summary: &PerformanceSummary,
    standing: &PlayerStanding,
    luck: LuckRoll,
    economics: &dyn Economics,
) -> OutcomeResult {
    let luck = Luck::classify(luck);
    let hype = summary.hype.get();
    let success = hype >= SUCCESS_HYPE && !luck.is_bad();
    let failure_reason = match luck {
        Luck::Catastrophe => Some(FailureReason::Catastrophe),
        Luck::Bad => Some(FailureReason::BadLuck),
        Luck::Fair if !success => Some(FailureReason::LowHype),
        Luck::Fair => None,
    };

    let context = SettlementContext {
        city: summary.venue.as_ref().map(Venue::city),
        rent_cost: summary.venue.as_ref().map_or(0, Venue::rent_cost),
        standing,
    };

    let (cash_gain, fan_gain) = match &summary.venue {
        Some(venue) => {
            let sales = BoxOffice::compute(venue, summary.ticket_price.get(), hype, summary.score);
            if luck.is_bad() {
                let capacity = i64::from(venue.capacity().get());
                (-(sales.revenue / 2), -(capacity / 5))
            } else if !success {
                (sales.revenue / 5, -(sales.fans / 2))
            } else {
                (economics.settle(sales.revenue, &context), sales.fans)
            }
        }
        None => {
            let raw = PRACTICE_BASE_CASH
                .saturating_add(score_as_i64(summary.score).saturating_mul(i64::from(hype)) / 100);
            (economics.settle(raw, &context), 0)
        }
    };

    let mut target = standing.clone();
    target.cash = target.cash.saturating_add(cash_gain);
    target.fans = target.fans.saturating_add(fan_gain);
    if luck.is_bad() {
        target.relationships = shifted(target.relationships, BAD_LUCK_SHIFT);
    } else if success {
        target.relationships = shifted(target.relationships, SUCCESS_SHIFT);
        target.skills = attrited(target.skills);
    }

    OutcomeResult {
        cash_delta: target.cash.saturating_sub(standing.cash),
        fan_delta: target.fans.saturating_sub(standing.fans),
        success,
        failure_reason,
        standing: target,
    }
}

fn score_as_i64(score: u64) -> i64 {
    i64::try_from(score).unwrap_or(i64::MAX)
}

fn shifted(relationships: Relationships, shift: RelationshipShift) -> Relationships {
    Relationships {
        crew: clamp_relationship(relationships.crew, shift.crew),
        promoter: clamp_relationship(relationships.promoter, shift.promoter),
    }
}

fn clamp_relationship(value: u8, delta: i32) -> u8 {
    let adjusted = (i32::from(value) + delta).clamp(0, RELATIONSHIP_MAX);
    u8::try_from(adjusted).unwrap_or(u8::MAX)
}

fn attrited(skills: SkillStats) -> SkillStats {
    SkillStats {
        flow: attrite(skills.flow),
        lyrics: attrite(skills.lyrics),
        charisma: attrite(skills.charisma),
    }
}

fn attrite(skill: u32) -> u32 {
    let loss = u64::from(skill) * u64::from(SKILL_ATTRITION_PERCENT);
    let loss = u32::try_from(loss.div_ceil(100)).unwrap_or(skill);
    skill.saturating_sub(loss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attrition_rounds_up() {
        assert_eq!(attrite(100), 97);
        assert_eq!(attrite(10), 9);
        assert_eq!(attrite(1), 0);
        assert_eq!(attrite(0), 0);
    }

    #[test]
    fn relationships_stay_in_bounds() {
        assert_eq!(clamp_relationship(98, 5), 100);
        assert_eq!(clamp_relationship(4, -15), 0);
    }

    #[test]
    fn luck_tiers_split_at_five_and_ten_percent() {
        let roll = |value| Luck::classify(LuckRoll::new(value).expect("roll"));
        assert_eq!(roll(0.049), Luck::Catastrophe);
        assert_eq!(roll(0.05), Luck::Bad);
        assert_eq!(roll(0.099), Luck::Bad);
        assert_eq!(roll(0.1), Luck::Fair);
    }
}
