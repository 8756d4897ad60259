//! Payout schedule — prize kinds resolved once at configuration load

use serde::{Deserialize, Serialize};

use crate::rules::{GameRules, RulesResult};

/// How a tier pays, decided once when the rules are loaded.
///
/// Round-time settlement dispatches on this variant instead of re-deriving
/// "is this the jackpot tier" from the level number on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrizeKind {
    /// Flat amount per winner, paid from house float
    Fixed(f64),
    /// Share of the jackpot pool split among the tier's winners
    Pooled {
        /// Fraction of the pool taken by the tier; `None` takes the whole pool
        percentage: Option<f64>,
        /// Flat top-up added to each winner's pool share
        top_up: Option<f64>,
        /// Whether winning this tier hits (and resets) the progressive pool
        jackpot_tier: bool,
    },
    /// Tier records winners but pays nothing
    NoPayout,
}

/// One resolved prize tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutTier {
    /// Tier rank (1 = highest)
    pub level: u32,
    /// Display name
    pub name: String,
    /// Matches required to qualify
    pub match_condition: u32,
    /// Resolved payout kind
    pub kind: PrizeKind,
}

/// All of a game's tiers with their payout kinds resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutSchedule {
    tiers: Vec<PayoutTier>,
}

impl PayoutSchedule {
    /// Resolve a validated rule set into a payout schedule.
    ///
    /// The top tier (`level == 1`) becomes the jackpot tier only while the
    /// jackpot policy is enabled; with the pool switched off it resolves
    /// like any other tier, so a fixed-prize top tier pays its fixed prize.
    pub fn resolve(rules: &GameRules) -> RulesResult<Self> {
        rules.validate()?;

        let mut tiers: Vec<PayoutTier> = rules
            .prize_levels
            .iter()
            .map(|tier| {
                let kind = if tier.level == 1 && rules.jackpot.enabled {
                    PrizeKind::Pooled {
                        percentage: tier.prize_percentage,
                        top_up: rules.jackpot.jackpot_fixed_prize,
                        jackpot_tier: true,
                    }
                } else if let Some(amount) = tier.fixed_prize {
                    PrizeKind::Fixed(amount)
                } else if let Some(percentage) = tier.prize_percentage {
                    PrizeKind::Pooled {
                        percentage: Some(percentage),
                        top_up: None,
                        jackpot_tier: false,
                    }
                } else {
                    PrizeKind::NoPayout
                };
                PayoutTier {
                    level: tier.level,
                    name: tier.name.clone(),
                    match_condition: tier.match_condition,
                    kind,
                }
            })
            .collect();
        tiers.sort_by_key(|t| t.level);

        log::debug!("resolved {} payout tiers for '{}'", tiers.len(), rules.name);
        Ok(Self { tiers })
    }

    /// Tier qualifying at exactly `matches` matched numbers, if any
    pub fn tier_for_matches(&self, matches: u32) -> Option<&PayoutTier> {
        self.tiers.iter().find(|t| t.match_condition == matches)
    }

    /// All tiers, ordered by level (top tier first)
    pub fn tiers(&self) -> &[PayoutTier] {
        &self.tiers
    }
}
