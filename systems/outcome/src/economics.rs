//! Reference implementations of the city economics collaborator.

use std::collections::BTreeMap;

use concert_core::{Economics, SettlementContext};
use serde::{Deserialize, Serialize};

const MULTIPLIER_SCALE: i64 = 10_000;

/// Economics that hands raw revenue back untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityEconomics;

impl Economics for IdentityEconomics {
    fn settle(&self, raw_revenue: i64, _context: &SettlementContext<'_>) -> i64 {
        raw_revenue
    }
}

/// Per-city revenue multipliers with flat venue rent and weekly expenses.
///
/// Multipliers are expressed in basis points, so `15_000` pays out 1.5x.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityEconomics {
    /// Multiplier used for cities without an entry and for practice sessions.
    pub default_multiplier_bps: u32,
    /// Multipliers keyed by city.
    pub city_multipliers_bps: BTreeMap<String, u32>,
    /// Living expenses deducted from every settlement.
    pub weekly_expenses: i64,
}

impl Default for CityEconomics {
    fn default() -> Self {
        Self {
            default_multiplier_bps: 10_000,
            city_multipliers_bps: BTreeMap::new(),
            weekly_expenses: 0,
        }
    }
}

impl CityEconomics {
    /// Multiplier applied to revenue earned in the provided city.
    #[must_use]
    pub fn multiplier_bps(&self, city: Option<&str>) -> u32 {
        city.and_then(|key| self.city_multipliers_bps.get(key))
            .copied()
            .unwrap_or(self.default_multiplier_bps)
    }
}

impl Economics for CityEconomics {
    fn settle(&self, raw_revenue: i64, context: &SettlementContext<'_>) -> i64 {
        let multiplier = i64::from(self.multiplier_bps(context.city.map(|city| city.as_str())));
        raw_revenue
            .saturating_mul(multiplier)
            .div_euclid(MULTIPLIER_SCALE)
            .saturating_sub(i64::from(context.rent_cost))
            .saturating_sub(self.weekly_expenses)
    }
}
