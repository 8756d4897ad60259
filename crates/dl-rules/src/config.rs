//! Simulation run configuration

use serde::{Deserialize, Serialize};

use crate::rules::{GameRules, RulesError, RulesResult};

/// Parameters of one simulation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of rounds to simulate
    pub rounds: u64,
    /// Inclusive range of players per round
    pub players_range: (u32, u32),
    /// Inclusive range of bets per player
    pub bets_range: (u32, u32),
    /// Fixed seed for reproducible runs; `None` draws from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

impl SimulationConfig {
    /// Check run parameters before an engine is built
    pub fn validate(&self) -> RulesResult<()> {
        if self.rounds == 0 {
            return Err(RulesError::InvalidRounds(self.rounds));
        }
        for (field, (min, max)) in [
            ("players", self.players_range),
            ("bets", self.bets_range),
        ] {
            if min < 1 || min > max {
                return Err(RulesError::InvalidRange { field, min, max });
            }
        }
        Ok(())
    }
}

/// A rule set paired with run parameters, the unit a host stores and loads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfiguration {
    /// Optional stable identifier assigned by the host
    #[serde(default)]
    pub id: Option<String>,
    /// Game rules
    pub game_rules: GameRules,
    /// Run parameters
    pub simulation_config: SimulationConfig,
}

impl GameConfiguration {
    /// Validate both halves
    pub fn validate(&self) -> RulesResult<()> {
        self.game_rules.validate()?;
        self.simulation_config.validate()
    }

    /// Parse and validate a JSON configuration document
    pub fn from_json(json: &str) -> RulesResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| RulesError::InvalidDocument(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a pretty JSON document
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
