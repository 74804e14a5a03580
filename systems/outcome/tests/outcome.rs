use concert_core::{
    CityKey, FailureReason, Hype, LuckRoll, PerformanceSummary, PlayerStanding, Relationships,
    SkillStats, TicketPrice, Venue,
};
use concert_system_outcome::{calculate, BoxOffice, CityEconomics, IdentityEconomics};
use proptest::prelude::*;

const FAIR: f64 = 0.5;

fn luck(value: f64) -> LuckRoll {
    LuckRoll::new(value).expect("valid roll")
}

fn venue(capacity: u32) -> Venue {
    Venue::new(capacity, 0, 3, CityKey::new("atlanta")).expect("venue")
}

fn show(venue: Option<Venue>, price: u32, hype: u32, score: u64) -> PerformanceSummary {
    PerformanceSummary {
        venue,
        ticket_price: TicketPrice::new(price),
        score,
        hype: Hype::new(hype),
    }
}

fn standing() -> PlayerStanding {
    PlayerStanding {
        cash: 2_000,
        fans: 1_000,
        skills: SkillStats {
            flow: 50,
            lyrics: 20,
            charisma: 7,
        },
        relationships: Relationships {
            crew: 60,
            promoter: 10,
        },
    }
}

#[test]
fn practice_session_pays_base_plus_score_share() {
    let result = calculate(
        &show(None, 0, 70, 1_000),
        &standing(),
        luck(FAIR),
        &IdentityEconomics,
    );

    assert_eq!(result.cash_delta, 1_200);
    assert_eq!(result.fan_delta, 0);
    assert!(result.success);
    assert_eq!(result.failure_reason, None);
    assert_eq!(result.standing.cash, 3_200);
}

#[test]
fn full_house_sells_by_hype() {
    let result = calculate(
        &show(Some(venue(1_000)), 50, 80, 0),
        &standing(),
        luck(FAIR),
        &IdentityEconomics,
    );

    let sales = BoxOffice::compute(&venue(1_000), 50, 80, 0);
    assert_eq!(sales.fill_bps, 8_000);
    assert_eq!(sales.attendance, 800);
    assert_eq!(sales.revenue, 40_000);
    assert_eq!(result.cash_delta, 40_000);
    assert_eq!(result.fan_delta, 320);
    assert!(result.success);
}

#[test]
fn bad_luck_refunds_half_and_loses_a_fifth_of_capacity() {
    let before = standing();
    let result = calculate(
        &show(Some(venue(1_000)), 50, 80, 0),
        &before,
        luck(0.07),
        &IdentityEconomics,
    );

    assert_eq!(result.cash_delta, -20_000);
    assert_eq!(result.fan_delta, -200);
    assert!(!result.success);
    assert_eq!(result.failure_reason, Some(FailureReason::BadLuck));
    assert_eq!(result.standing.relationships.crew, 50);
    assert_eq!(result.standing.relationships.promoter, 0);
    assert_eq!(result.standing.skills, before.skills);
}

#[test]
fn catastrophe_shares_bad_luck_financials() {
    let bad = calculate(
        &show(Some(venue(1_000)), 50, 80, 0),
        &standing(),
        luck(0.07),
        &IdentityEconomics,
    );
    let catastrophe = calculate(
        &show(Some(venue(1_000)), 50, 80, 0),
        &standing(),
        luck(0.01),
        &IdentityEconomics,
    );

    assert_eq!(catastrophe.failure_reason, Some(FailureReason::Catastrophe));
    assert_eq!(catastrophe.cash_delta, bad.cash_delta);
    assert_eq!(catastrophe.fan_delta, bad.fan_delta);
}

#[test]
fn low_hype_keeps_a_fifth_and_halves_fans_from_pre_adjustment_value() {
    let result = calculate(
        &show(Some(venue(1_000)), 50, 40, 0),
        &standing(),
        luck(FAIR),
        &IdentityEconomics,
    );

    // attendance 400, revenue 20_000, fans before adjustment 80
    assert_eq!(result.cash_delta, 4_000);
    assert_eq!(result.fan_delta, -40);
    assert_eq!(result.failure_reason, Some(FailureReason::LowHype));
    assert_eq!(result.standing.relationships, standing().relationships);
}

#[test]
fn expensive_tickets_thin_the_crowd() {
    let sales = BoxOffice::compute(&venue(1_000), 100, 80, 0);
    assert_eq!(sales.fill_bps, 7_000);
    assert_eq!(sales.attendance, 700);
}

#[test]
fn empty_room_still_fills_a_tenth() {
    let sales = BoxOffice::compute(&venue(1_000), 500, 5, 0);
    assert_eq!(sales.fill_bps, 1_000);
    assert_eq!(sales.attendance, 100);
}

#[test]
fn success_rewards_relationships_and_wears_skills() {
    let result = calculate(
        &show(Some(venue(200)), 20, 90, 300),
        &standing(),
        luck(FAIR),
        &IdentityEconomics,
    );

    assert!(result.success);
    assert_eq!(
        result.standing.relationships,
        Relationships {
            crew: 65,
            promoter: 15,
        }
    );
    assert_eq!(
        result.standing.skills,
        SkillStats {
            flow: 48,
            lyrics: 19,
            charisma: 6,
        }
    );
}

#[test]
fn city_economics_settle_successful_revenue() {
    let economics: CityEconomics = toml::from_str(
        r#"
            weekly_expenses = 500

            [city_multipliers_bps]
            atlanta = 15000
        "#,
    )
    .expect("economics");
    let rented = Venue::new(1_000, 1_000, 3, CityKey::new("atlanta")).expect("venue");

    let result = calculate(
        &show(Some(rented), 50, 80, 0),
        &standing(),
        luck(FAIR),
        &economics,
    );

    assert_eq!(result.cash_delta, 58_500);
}

#[test]
fn debt_is_not_clamped() {
    let broke = PlayerStanding {
        cash: -5_000,
        ..standing()
    };
    let result = calculate(
        &show(Some(venue(1_000)), 50, 80, 0),
        &broke,
        luck(0.02),
        &IdentityEconomics,
    );

    assert_eq!(result.standing.cash, -25_000);
    assert_eq!(result.cash_delta, -20_000);
}

proptest! {
    #[test]
    fn attendance_never_exceeds_capacity(
        capacity in 1_u32..100_000,
        price in 0_u32..2_000,
        hype in 0_u32..=100,
        score in 0_u64..1_000_000,
    ) {
        let sales = BoxOffice::compute(&venue(capacity), price, u8::try_from(hype).expect("hype"), score);
        prop_assert!(sales.attendance <= i64::from(capacity));
        prop_assert!(sales.attendance >= i64::from(capacity) / 10);
        prop_assert!((1_000..=10_000).contains(&sales.fill_bps));
    }

    #[test]
    fn deltas_match_standing_difference(
        hype in 0_u32..=100,
        draw in 0.0_f64..1.0,
        has_venue in any::<bool>(),
    ) {
        let summary = show(has_venue.then(|| venue(500)), 60, hype, 2_000);
        let before = standing();
        let result = calculate(&summary, &before, luck(draw), &IdentityEconomics);

        prop_assert_eq!(result.standing.cash - before.cash, result.cash_delta);
        prop_assert_eq!(result.standing.fans - before.fans, result.fan_delta);
        prop_assert_eq!(result.success, result.failure_reason.is_none());
    }
}
