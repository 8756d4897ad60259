//! Result data model — per-round, progress, and whole-run records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::summary::SimulationSummary;

/// Aggregated winners and payouts of one prize tier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeStatistics {
    /// Tier rank (1 = highest)
    pub level: u32,
    /// Tier name
    pub name: String,
    /// Winning tickets in this tier
    pub winners_count: u32,
    /// Total amount paid to this tier
    pub total_amount: f64,
    /// Reported win probability (the `1/2^matches` heuristic)
    pub probability: f64,
}

/// Outcome of one complete round, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    /// 1-based round number
    pub round_number: u64,
    /// Players who took part
    pub players_count: u32,
    /// Tickets bought across all players
    pub total_bets: u64,
    /// Total amount wagered
    pub total_bet_amount: f64,
    /// Total prize money paid out
    pub total_payout: f64,
    /// Payout / wagered, 0 when nothing was wagered
    pub rtp: f64,
    /// Jackpot pool balance after settlement
    pub jackpot_amount: f64,
    /// Per-tier statistics for every configured tier
    pub prize_stats: Vec<PrizeStatistics>,
    /// The round's winning numbers, sorted ascending
    pub winning_numbers: Vec<u32>,
    /// Distinct players holding at least one winning ticket
    pub winners_count: u32,
    /// Players without a winning ticket
    pub non_winners_count: u32,
}

/// Lifecycle status of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Engine built, loop not yet entered
    Created,
    /// Round loop in progress
    Running,
    /// Every requested round completed
    Completed,
    /// Cancelled at a round boundary
    Stopped,
    /// Round loop aborted; partial results preserved
    Error,
}

impl RunStatus {
    /// Lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Created => "created",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Stopped => "stopped",
            RunStatus::Error => "error",
        }
    }

    /// Whether the run has reached a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Completed | RunStatus::Stopped | RunStatus::Error
        )
    }
}

/// Snapshot handed to the progress callback on the reporting cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationProgress {
    /// Rounds completed so far
    pub current_round: u64,
    /// Rounds requested
    pub total_rounds: u64,
    /// Completion percentage in [0, 100]
    pub progress_percentage: f64,
    /// Wall-clock seconds since the run started
    pub elapsed_secs: f64,
    /// Linear extrapolation of the time left
    pub estimated_remaining_secs: Option<f64>,
    /// Current run status
    pub status: RunStatus,
}

/// Terminal record of one run: status, timings, and all produced data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Run identifier (UUID v4)
    pub simulation_id: String,
    /// Name of the simulated game
    pub game_name: String,
    /// Terminal status (completed, stopped, or error)
    pub status: RunStatus,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Wall-clock finish
    pub finished_at: DateTime<Utc>,
    /// Run duration in seconds
    pub duration_secs: f64,
    /// Rounds originally requested
    pub rounds_requested: u64,
    /// Whole-run summary; absent when no round completed
    pub summary: Option<SimulationSummary>,
    /// Every completed round, in order
    pub round_results: Vec<RoundResult>,
    /// Failure message when `status` is `Error`
    pub error_message: Option<String>,
}

impl SimulationResult {
    /// Rounds that actually completed
    pub fn rounds_completed(&self) -> u64 {
        self.round_results.len() as u64
    }

    /// Serialize the full record as a pretty JSON document
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
