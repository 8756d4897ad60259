//! Built-in game presets for common validation runs

use crate::config::SimulationConfig;
use crate::rules::{GameRules, GameType, JackpotPolicy, PrizeLevel};

/// A ready-to-run rule set paired with default run parameters
#[derive(Debug, Clone)]
pub struct GamePreset {
    /// Stable preset id
    pub id: String,
    /// Display name
    pub name: String,
    /// What the preset demonstrates
    pub description: String,
    /// Game rules
    pub rules: GameRules,
    /// Default run parameters
    pub simulation: SimulationConfig,
}

/// Get all built-in presets
pub fn all_presets() -> Vec<GamePreset> {
    vec![pick_6_of_42(), pick_2_of_37(), custom_small()]
}

/// Classic 6-of-42 lottery — five tiers over a progressive jackpot
pub fn pick_6_of_42() -> GamePreset {
    GamePreset {
        id: "pick_6_of_42".to_string(),
        name: "Pick 6 of 42".to_string(),
        description: "Classic lottery with a pool-funded top prize and four fixed tiers"
            .to_string(),
        rules: GameRules {
            game_type: GameType::Lottery,
            name: "Pick 6 of 42".to_string(),
            description: Some("Select 6 numbers from 1-42".to_string()),
            number_range: (1, 42),
            selection_count: 6,
            ticket_price: 20.0,
            prize_levels: vec![
                PrizeLevel::pooled(1, "First Prize", 6, 0.9),
                PrizeLevel::fixed(2, "Second Prize", 5, 50_000.0),
                PrizeLevel::fixed(3, "Third Prize", 4, 1_500.0),
                PrizeLevel::fixed(4, "Fourth Prize", 3, 60.0),
                PrizeLevel::fixed(5, "Fifth Prize", 2, 20.0),
            ],
            jackpot: JackpotPolicy {
                enabled: true,
                initial_amount: 30_000_000.0,
                contribution_rate: 0.15,
                post_return_contribution_rate: 0.3,
                return_rate: 0.8,
                jackpot_fixed_prize: None,
                min_jackpot: 10_000_000.0,
            },
        },
        simulation: SimulationConfig {
            rounds: 1000,
            players_range: (50_000, 100_000),
            bets_range: (5, 15),
            seed: None,
        },
    }
}

/// Simple 2-of-37 game — fixed prizes only, no pool
pub fn pick_2_of_37() -> GamePreset {
    GamePreset {
        id: "pick_2_of_37".to_string(),
        name: "Pick 2 of 37".to_string(),
        description: "Fixed-prize game for validating payout accounting without a pool"
            .to_string(),
        rules: GameRules {
            game_type: GameType::Lottery,
            name: "Pick 2 of 37".to_string(),
            description: Some("Select 2 numbers from 1-37".to_string()),
            number_range: (1, 37),
            selection_count: 2,
            ticket_price: 10.0,
            prize_levels: vec![
                PrizeLevel::fixed(1, "First Prize", 2, 500.0),
                PrizeLevel::fixed(2, "Second Prize", 1, 10.0),
            ],
            jackpot: JackpotPolicy::disabled(),
        },
        simulation: SimulationConfig {
            rounds: 10_000,
            players_range: (1000, 5000),
            bets_range: (1, 5),
            seed: None,
        },
    }
}

/// Small 3-of-10 sandbox for quick experiments
pub fn custom_small() -> GamePreset {
    GamePreset {
        id: "custom_small".to_string(),
        name: "Custom Small".to_string(),
        description: "3-of-10 sandbox with a single fixed tier".to_string(),
        rules: GameRules {
            game_type: GameType::Custom,
            name: "Custom Small".to_string(),
            description: None,
            number_range: (1, 10),
            selection_count: 3,
            ticket_price: 5.0,
            prize_levels: vec![PrizeLevel::fixed(1, "First Prize", 3, 100.0)],
            jackpot: JackpotPolicy::disabled(),
        },
        simulation: SimulationConfig {
            rounds: 1000,
            players_range: (100, 500),
            bets_range: (1, 3),
            seed: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payout::PayoutSchedule;

    #[test]
    fn test_all_presets_validate() {
        let presets = all_presets();
        assert_eq!(presets.len(), 3);
        for preset in &presets {
            preset.rules.validate().unwrap();
            preset.simulation.validate().unwrap();
        }
    }

    #[test]
    fn test_all_presets_resolve() {
        for preset in all_presets() {
            let schedule = PayoutSchedule::resolve(&preset.rules).unwrap();
            assert_eq!(schedule.tiers().len(), preset.rules.prize_levels.len());
        }
    }

    #[test]
    fn test_preset_ids_unique() {
        let presets = all_presets();
        for (i, a) in presets.iter().enumerate() {
            for b in &presets[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
