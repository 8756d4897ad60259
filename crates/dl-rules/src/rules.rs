//! Game rule model — immutable description of one number-draw game

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Game category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameType {
    Lottery,
    Scratch,
    Slot,
    Custom,
}

/// One prize tier of a game
///
/// `level` ranks tiers, 1 being the top tier. A tier pays either a flat
/// amount per winner (`fixed_prize`) or a fraction of the jackpot pool split
/// among its winners (`prize_percentage`); with neither set the tier records
/// winners but pays nothing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeLevel {
    /// Tier rank (1 = highest)
    pub level: u32,
    /// Display name (e.g., "First Prize")
    pub name: String,
    /// Number of matched numbers required to qualify
    pub match_condition: u32,
    /// Flat payout per winner
    #[serde(default)]
    pub fixed_prize: Option<f64>,
    /// Fraction of the jackpot pool split among winners
    #[serde(default)]
    pub prize_percentage: Option<f64>,
}

impl PrizeLevel {
    /// Flat-payout tier
    pub fn fixed(level: u32, name: impl Into<String>, match_condition: u32, prize: f64) -> Self {
        Self {
            level,
            name: name.into(),
            match_condition,
            fixed_prize: Some(prize),
            prize_percentage: None,
        }
    }

    /// Pool-percentage tier
    pub fn pooled(
        level: u32,
        name: impl Into<String>,
        match_condition: u32,
        percentage: f64,
    ) -> Self {
        Self {
            level,
            name: name.into(),
            match_condition,
            fixed_prize: None,
            prize_percentage: Some(percentage),
        }
    }
}

/// Progressive jackpot funding policy
///
/// Each wager is split three ways: a pool contribution, a return to the
/// seller who pre-funded the initial stake, and net sales. The split runs in
/// two phases gated on the cumulative seller return reaching
/// `initial_amount`; each phase has its own contribution rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JackpotPolicy {
    /// Whether the progressive pool participates at all
    pub enabled: bool,
    /// Starting pool balance, pre-funded by the seller
    pub initial_amount: f64,
    /// Phase-1 fraction of each ticket routed into the pool
    pub contribution_rate: f64,
    /// Phase-2 fraction, used once the seller is fully reimbursed
    pub post_return_contribution_rate: f64,
    /// Phase-1 fraction of each ticket returned to the seller
    pub return_rate: f64,
    /// Flat top-up added to every top-tier winner's pool share
    #[serde(default)]
    pub jackpot_fixed_prize: Option<f64>,
    /// Advertised pool floor (reporting only, not enforced at runtime)
    #[serde(default)]
    pub min_jackpot: f64,
}

impl JackpotPolicy {
    /// Policy with the pool switched off; every wager is net sales
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            initial_amount: 0.0,
            contribution_rate: 0.0,
            post_return_contribution_rate: 0.0,
            return_rate: 0.0,
            jackpot_fixed_prize: None,
            min_jackpot: 0.0,
        }
    }

    /// Progressive pool with typical funding rates
    pub fn progressive(initial_amount: f64) -> Self {
        Self {
            enabled: true,
            initial_amount,
            contribution_rate: 0.15,
            post_return_contribution_rate: 0.3,
            return_rate: 0.8,
            jackpot_fixed_prize: None,
            min_jackpot: 0.0,
        }
    }
}

impl Default for JackpotPolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Complete rule set for one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRules {
    /// Game category
    pub game_type: GameType,
    /// Game name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Inclusive number pool bounds (min, max)
    pub number_range: (u32, u32),
    /// How many numbers a draw (and each ticket) selects
    pub selection_count: u32,
    /// Price of one ticket
    pub ticket_price: f64,
    /// Prize tiers, top tier carrying `level == 1`
    pub prize_levels: Vec<PrizeLevel>,
    /// Jackpot funding policy
    #[serde(default)]
    pub jackpot: JackpotPolicy,
}

impl GameRules {
    /// Size of the number pool
    pub fn pool_size(&self) -> u32 {
        self.number_range.1 - self.number_range.0 + 1
    }

    /// Check every structural invariant of the rule set.
    ///
    /// All configuration errors surface here, before an engine is built;
    /// round-time code assumes a validated rule set and has no failure paths.
    pub fn validate(&self) -> RulesResult<()> {
        let (min, max) = self.number_range;
        if min < 1 || min >= max {
            return Err(RulesError::InvalidNumberRange { min, max });
        }
        if self.selection_count == 0 {
            return Err(RulesError::ZeroSelection);
        }
        if self.selection_count > self.pool_size() {
            return Err(RulesError::SelectionExceedsPool {
                selected: self.selection_count,
                pool: self.pool_size(),
            });
        }
        if self.ticket_price <= 0.0 || !self.ticket_price.is_finite() {
            return Err(RulesError::InvalidTicketPrice(self.ticket_price));
        }

        let mut seen_levels = Vec::with_capacity(self.prize_levels.len());
        let mut seen_matches = Vec::with_capacity(self.prize_levels.len());
        for tier in &self.prize_levels {
            if seen_levels.contains(&tier.level) {
                return Err(RulesError::DuplicateLevel(tier.level));
            }
            seen_levels.push(tier.level);
            if seen_matches.contains(&tier.match_condition) {
                return Err(RulesError::DuplicateMatchCondition(tier.match_condition));
            }
            seen_matches.push(tier.match_condition);

            if tier.match_condition > self.selection_count {
                return Err(RulesError::MatchExceedsSelection {
                    level: tier.level,
                    matches: tier.match_condition,
                    selection: self.selection_count,
                });
            }
            if tier.fixed_prize.is_some() && tier.prize_percentage.is_some() {
                return Err(RulesError::ConflictingPrize { level: tier.level });
            }
            if let Some(prize) = tier.fixed_prize {
                if prize < 0.0 {
                    return Err(RulesError::NegativeAmount {
                        field: "fixed_prize",
                        value: prize,
                    });
                }
            }
            if let Some(pct) = tier.prize_percentage {
                if !(0.0..=1.0).contains(&pct) {
                    return Err(RulesError::RateOutOfRange {
                        field: "prize_percentage",
                        value: pct,
                    });
                }
            }
            if tier.level == 1 && self.jackpot.enabled && tier.fixed_prize.is_some() {
                return Err(RulesError::FixedPrizeOnJackpotTier);
            }
        }

        self.validate_jackpot()
    }

    fn validate_jackpot(&self) -> RulesResult<()> {
        let jp = &self.jackpot;
        for (field, value) in [
            ("contribution_rate", jp.contribution_rate),
            (
                "post_return_contribution_rate",
                jp.post_return_contribution_rate,
            ),
            ("return_rate", jp.return_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RulesError::RateOutOfRange { field, value });
            }
        }
        for (field, value) in [
            ("initial_amount", jp.initial_amount),
            ("min_jackpot", jp.min_jackpot),
            ("jackpot_fixed_prize", jp.jackpot_fixed_prize.unwrap_or(0.0)),
        ] {
            if value < 0.0 {
                return Err(RulesError::NegativeAmount { field, value });
            }
        }
        // The phase-1 split must fit inside one ticket, or net sales would
        // go negative on every wager.
        if jp.enabled && jp.contribution_rate + jp.return_rate > 1.0 {
            return Err(RulesError::SplitExceedsTicket {
                combined: jp.contribution_rate + jp.return_rate,
            });
        }
        Ok(())
    }
}

/// Rule and configuration errors
#[derive(Error, Debug)]
pub enum RulesError {
    /// Inverted, zero-based, or single-number pool
    #[error("invalid number range [{min}, {max}]")]
    InvalidNumberRange {
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// A draw must select at least one number
    #[error("selection count must be at least 1")]
    ZeroSelection,

    /// More numbers selected than the pool holds
    #[error("selection count {selected} exceeds pool size {pool}")]
    SelectionExceedsPool {
        /// Requested selection count
        selected: u32,
        /// Pool size
        pool: u32,
    },

    /// Ticket price must be positive and finite
    #[error("invalid ticket price {0}")]
    InvalidTicketPrice(f64),

    /// Two tiers share a level rank
    #[error("duplicate prize level {0}")]
    DuplicateLevel(u32),

    /// Two tiers share a match condition
    #[error("duplicate match condition {0}")]
    DuplicateMatchCondition(u32),

    /// A tier requires more matches than numbers selected
    #[error("level {level} requires {matches} matches but only {selection} numbers are selected")]
    MatchExceedsSelection {
        /// Tier rank
        level: u32,
        /// Required matches
        matches: u32,
        /// Selection count
        selection: u32,
    },

    /// A tier carries both a fixed prize and a pool percentage
    #[error("level {level} sets both a fixed prize and a pool percentage")]
    ConflictingPrize {
        /// Tier rank
        level: u32,
    },

    /// Top tier of an enabled jackpot is always pool-funded
    #[error("the top tier of an enabled jackpot cannot carry a fixed prize")]
    FixedPrizeOnJackpotTier,

    /// A rate left the [0, 1] interval
    #[error("{field} {value} is outside [0, 1]")]
    RateOutOfRange {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// A monetary amount went negative
    #[error("{field} {value} is negative")]
    NegativeAmount {
        /// Offending field
        field: &'static str,
        /// Offending value
        value: f64,
    },

    /// Phase-1 contribution plus seller return exceeds the ticket
    #[error("combined contribution and return rates {combined} exceed 1.0")]
    SplitExceedsTicket {
        /// Sum of the two phase-1 rates
        combined: f64,
    },

    /// Simulation must run at least one round
    #[error("round count must be at least 1, got {0}")]
    InvalidRounds(u64),

    /// A (min, max) range is empty or zero-based
    #[error("invalid {field} range [{min}, {max}]")]
    InvalidRange {
        /// Offending field
        field: &'static str,
        /// Lower bound
        min: u32,
        /// Upper bound
        max: u32,
    },

    /// A configuration document failed to parse
    #[error("invalid configuration document: {0}")]
    InvalidDocument(String),
}

/// Result type for rule and configuration operations
pub type RulesResult<T> = Result<T, RulesError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn base_rules() -> GameRules {
        GameRules {
            game_type: GameType::Lottery,
            name: "Pick 6 of 42".to_string(),
            description: None,
            number_range: (1, 42),
            selection_count: 6,
            ticket_price: 20.0,
            prize_levels: vec![
                PrizeLevel::pooled(1, "First Prize", 6, 0.9),
                PrizeLevel::fixed(2, "Second Prize", 5, 50_000.0),
            ],
            jackpot: JackpotPolicy::progressive(30_000_000.0),
        }
    }

    #[test]
    fn test_valid_rules_pass() {
        assert!(base_rules().validate().is_ok());
    }

    #[test]
    fn test_pool_size() {
        assert_eq!(base_rules().pool_size(), 42);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut rules = base_rules();
        rules.number_range = (42, 1);
        assert!(matches!(
            rules.validate(),
            Err(RulesError::InvalidNumberRange { .. })
        ));
    }

    #[test]
    fn test_zero_based_range_rejected() {
        let mut rules = base_rules();
        rules.number_range = (0, 42);
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_selection_exceeding_pool_rejected() {
        let mut rules = base_rules();
        rules.number_range = (1, 5);
        assert!(matches!(
            rules.validate(),
            Err(RulesError::SelectionExceedsPool { .. })
        ));
    }

    #[test]
    fn test_non_positive_price_rejected() {
        let mut rules = base_rules();
        rules.ticket_price = 0.0;
        assert!(matches!(
            rules.validate(),
            Err(RulesError::InvalidTicketPrice(_))
        ));
    }

    #[test]
    fn test_duplicate_level_rejected() {
        let mut rules = base_rules();
        rules.prize_levels.push(PrizeLevel::fixed(1, "Dup", 4, 10.0));
        assert!(matches!(
            rules.validate(),
            Err(RulesError::DuplicateLevel(1))
        ));
    }

    #[test]
    fn test_duplicate_match_condition_rejected() {
        let mut rules = base_rules();
        rules.prize_levels.push(PrizeLevel::fixed(3, "Dup", 6, 10.0));
        assert!(matches!(
            rules.validate(),
            Err(RulesError::DuplicateMatchCondition(6))
        ));
    }

    #[test]
    fn test_match_condition_above_selection_rejected() {
        let mut rules = base_rules();
        rules.prize_levels.push(PrizeLevel::fixed(3, "Huge", 7, 10.0));
        assert!(matches!(
            rules.validate(),
            Err(RulesError::MatchExceedsSelection { .. })
        ));
    }

    #[test]
    fn test_conflicting_prize_rejected() {
        let mut rules = base_rules();
        rules.prize_levels[1].prize_percentage = Some(0.1);
        assert!(matches!(
            rules.validate(),
            Err(RulesError::ConflictingPrize { level: 2 })
        ));
    }

    #[test]
    fn test_rate_outside_unit_interval_rejected() {
        let mut rules = base_rules();
        rules.jackpot.contribution_rate = 1.5;
        assert!(matches!(
            rules.validate(),
            Err(RulesError::RateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_overcommitted_split_rejected() {
        let mut rules = base_rules();
        rules.jackpot.contribution_rate = 0.5;
        rules.jackpot.return_rate = 0.6;
        assert!(matches!(
            rules.validate(),
            Err(RulesError::SplitExceedsTicket { .. })
        ));
    }

    #[test]
    fn test_fixed_prize_on_enabled_top_tier_rejected() {
        let mut rules = base_rules();
        rules.prize_levels[0] = PrizeLevel::fixed(1, "First Prize", 6, 1000.0);
        assert!(matches!(
            rules.validate(),
            Err(RulesError::FixedPrizeOnJackpotTier)
        ));
    }

    #[test]
    fn test_fixed_top_tier_allowed_when_jackpot_disabled() {
        let mut rules = base_rules();
        rules.jackpot = JackpotPolicy::disabled();
        rules.prize_levels = vec![PrizeLevel::fixed(1, "First Prize", 6, 1000.0)];
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_serde_round_trip() {
        let rules = base_rules();
        let json = serde_json::to_string(&rules).unwrap();
        let back: GameRules = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, rules.name);
        assert_eq!(back.number_range, rules.number_range);
        assert_eq!(back.prize_levels.len(), rules.prize_levels.len());
        assert_eq!(back.jackpot.initial_amount, rules.jackpot.initial_amount);
    }
}
