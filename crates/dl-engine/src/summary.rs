//! Whole-run summary derivation

use dl_rules::{GameRules, PayoutSchedule, PrizeKind, exact_match_probability};
use serde::{Deserialize, Serialize};

use crate::funding::PoolLedger;
use crate::results::{PrizeStatistics, RoundResult};
use crate::round::MIN_WINNING_MATCHES;

/// Aggregate statistics over every recorded round of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Rounds recorded
    pub total_rounds: u64,
    /// Players across all rounds
    pub total_players: u64,
    /// Tickets across all rounds
    pub total_bets: u64,
    /// Amount wagered across all rounds
    pub total_bet_amount: f64,
    /// Prize money paid across all rounds
    pub total_payout: f64,
    /// Mean of the per-round RTP series
    pub average_rtp: f64,
    /// Population variance of the per-round RTP series
    pub rtp_variance: f64,
    /// Distinct winning players across all rounds
    pub total_winners: u64,
    /// Players without a winning ticket across all rounds
    pub total_non_winners: u64,
    /// Winners / players
    pub winning_rate: f64,
    /// Pool balance at the start of the run
    pub initial_jackpot: f64,
    /// Pool balance at the end of the run
    pub final_jackpot: f64,
    /// Cumulative top-tier winners, taken from the ledger counter
    pub jackpot_hits: u64,
    /// Per-tier totals with the per-round probability averaged
    pub prize_summary: Vec<PrizeStatistics>,
    /// Expected RTP from exact combinatorics, when it has a closed form
    pub theoretical_rtp: Option<f64>,
    /// `average_rtp - theoretical_rtp`
    pub rtp_deviation: Option<f64>,
}

impl SimulationSummary {
    /// Derive the summary from every recorded round.
    ///
    /// Returns `None` when no round completed. Jackpot hits come from the
    /// ledger's cumulative counter rather than the round data, since a
    /// single round can span a pool reset.
    pub fn aggregate(
        rules: &GameRules,
        schedule: &PayoutSchedule,
        rounds: &[RoundResult],
        ledger: &PoolLedger,
    ) -> Option<Self> {
        if rounds.is_empty() {
            return None;
        }

        let total_rounds = rounds.len() as u64;
        let total_players: u64 = rounds.iter().map(|r| r.players_count as u64).sum();
        let total_bets: u64 = rounds.iter().map(|r| r.total_bets).sum();
        let total_bet_amount: f64 = rounds.iter().map(|r| r.total_bet_amount).sum();
        let total_payout: f64 = rounds.iter().map(|r| r.total_payout).sum();
        let total_winners: u64 = rounds.iter().map(|r| r.winners_count as u64).sum();
        let total_non_winners: u64 = rounds.iter().map(|r| r.non_winners_count as u64).sum();

        let (average_rtp, rtp_variance) = mean_and_variance(rounds.iter().map(|r| r.rtp));
        let winning_rate = if total_players > 0 {
            total_winners as f64 / total_players as f64
        } else {
            0.0
        };

        let prize_summary = schedule
            .tiers()
            .iter()
            .map(|tier| {
                let winners: u32 = rounds
                    .iter()
                    .flat_map(|r| &r.prize_stats)
                    .filter(|s| s.level == tier.level)
                    .map(|s| s.winners_count)
                    .sum();
                let amount: f64 = rounds
                    .iter()
                    .flat_map(|r| &r.prize_stats)
                    .filter(|s| s.level == tier.level)
                    .map(|s| s.total_amount)
                    .sum();
                let (prob_sum, prob_n) = rounds
                    .iter()
                    .flat_map(|r| &r.prize_stats)
                    .filter(|s| s.level == tier.level)
                    .fold((0.0, 0u64), |(sum, n), s| (sum + s.probability, n + 1));
                PrizeStatistics {
                    level: tier.level,
                    name: tier.name.clone(),
                    winners_count: winners,
                    total_amount: amount,
                    probability: if prob_n > 0 {
                        prob_sum / prob_n as f64
                    } else {
                        0.0
                    },
                }
            })
            .collect();

        let theoretical_rtp = theoretical_rtp(rules, schedule);

        Some(Self {
            total_rounds,
            total_players,
            total_bets,
            total_bet_amount,
            total_payout,
            average_rtp,
            rtp_variance,
            total_winners,
            total_non_winners,
            winning_rate,
            initial_jackpot: ledger.initial_jackpot_amount(),
            final_jackpot: ledger.jackpot_pool(),
            jackpot_hits: ledger.jackpot_hits(),
            prize_summary,
            rtp_deviation: theoretical_rtp.map(|t| average_rtp - t),
            theoretical_rtp,
        })
    }
}

fn mean_and_variance(values: impl Iterator<Item = f64> + Clone) -> (f64, f64) {
    let n = values.clone().count();
    if n == 0 {
        return (0.0, 0.0);
    }
    let mean = values.clone().sum::<f64>() / n as f64;
    let variance = values.map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    (mean, variance)
}

/// Per-ticket expected RTP from exact hypergeometric probabilities.
///
/// Only fixed-prize tiers have a closed form under the phased funding model,
/// so this is `None` as soon as any tier pays from the pool. Tiers below the
/// minimum-match floor never pay and are excluded.
fn theoretical_rtp(rules: &GameRules, schedule: &PayoutSchedule) -> Option<f64> {
    let mut expected_payout = 0.0;
    for tier in schedule.tiers() {
        match tier.kind {
            PrizeKind::Fixed(amount) => {
                if tier.match_condition >= MIN_WINNING_MATCHES {
                    expected_payout += amount
                        * exact_match_probability(
                            rules.pool_size(),
                            rules.selection_count,
                            tier.match_condition,
                        );
                }
            }
            PrizeKind::NoPayout => {}
            PrizeKind::Pooled { .. } => return None,
        }
    }
    Some(expected_payout / rules.ticket_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dl_rules::{GameType, JackpotPolicy, PrizeLevel};

    fn fixed_game() -> (GameRules, PayoutSchedule) {
        let rules = GameRules {
            game_type: GameType::Lottery,
            name: "Pick 2 of 5".to_string(),
            description: None,
            number_range: (1, 5),
            selection_count: 2,
            ticket_price: 10.0,
            prize_levels: vec![PrizeLevel::fixed(1, "First Prize", 2, 50.0)],
            jackpot: JackpotPolicy::disabled(),
        };
        let schedule = PayoutSchedule::resolve(&rules).unwrap();
        (rules, schedule)
    }

    fn round(number: u64, rtp: f64, winners: u32, players: u32) -> RoundResult {
        RoundResult {
            round_number: number,
            players_count: players,
            total_bets: players as u64,
            total_bet_amount: players as f64 * 10.0,
            total_payout: rtp * players as f64 * 10.0,
            rtp,
            jackpot_amount: 0.0,
            prize_stats: vec![PrizeStatistics {
                level: 1,
                name: "First Prize".to_string(),
                winners_count: winners,
                total_amount: winners as f64 * 50.0,
                probability: 0.25,
            }],
            winning_numbers: vec![1, 2],
            winners_count: winners,
            non_winners_count: players - winners,
        }
    }

    #[test]
    fn test_empty_run_has_no_summary() {
        let (rules, schedule) = fixed_game();
        let ledger = PoolLedger::new(&rules.jackpot);
        assert!(SimulationSummary::aggregate(&rules, &schedule, &[], &ledger).is_none());
    }

    #[test]
    fn test_totals_and_rates() {
        let (rules, schedule) = fixed_game();
        let ledger = PoolLedger::new(&rules.jackpot);
        let rounds = vec![round(1, 0.5, 2, 10), round(2, 0.3, 1, 10)];

        let summary = SimulationSummary::aggregate(&rules, &schedule, &rounds, &ledger).unwrap();
        assert_eq!(summary.total_rounds, 2);
        assert_eq!(summary.total_players, 20);
        assert_eq!(summary.total_winners, 3);
        assert_eq!(summary.total_non_winners, 17);
        assert_relative_eq!(summary.winning_rate, 0.15);
        assert_relative_eq!(summary.average_rtp, 0.4);
        // Population variance of [0.5, 0.3].
        assert_relative_eq!(summary.rtp_variance, 0.01);
        assert_eq!(summary.prize_summary[0].winners_count, 3);
        assert_relative_eq!(summary.prize_summary[0].total_amount, 150.0);
        assert_relative_eq!(summary.prize_summary[0].probability, 0.25);
    }

    #[test]
    fn test_theoretical_rtp_for_all_fixed_tiers() {
        let (rules, schedule) = fixed_game();
        let ledger = PoolLedger::new(&rules.jackpot);
        let rounds = vec![round(1, 0.5, 2, 10)];

        let summary = SimulationSummary::aggregate(&rules, &schedule, &rounds, &ledger).unwrap();
        // P(match 2 in 2-of-5) = 1 / C(5,2) = 0.1; EV = 50 * 0.1 / 10.
        let expected = 0.5;
        assert_relative_eq!(summary.theoretical_rtp.unwrap(), expected);
        assert_relative_eq!(summary.rtp_deviation.unwrap(), 0.5 - expected);
    }

    #[test]
    fn test_theoretical_rtp_absent_with_pooled_tier() {
        let rules = GameRules {
            game_type: GameType::Lottery,
            name: "Pooled".to_string(),
            description: None,
            number_range: (1, 5),
            selection_count: 2,
            ticket_price: 10.0,
            prize_levels: vec![PrizeLevel::pooled(1, "First Prize", 2, 0.9)],
            jackpot: JackpotPolicy::progressive(1000.0),
        };
        let schedule = PayoutSchedule::resolve(&rules).unwrap();
        let ledger = PoolLedger::new(&rules.jackpot);
        let rounds = vec![round(1, 0.5, 2, 10)];

        let summary = SimulationSummary::aggregate(&rules, &schedule, &rounds, &ledger).unwrap();
        assert!(summary.theoretical_rtp.is_none());
        assert!(summary.rtp_deviation.is_none());
    }

    #[test]
    fn test_jackpot_counters_come_from_ledger() {
        let (rules, schedule) = fixed_game();
        let mut ledger = PoolLedger::new(&rules.jackpot);
        ledger.record_jackpot_hit(3);
        let rounds = vec![round(1, 0.0, 0, 10)];

        let summary = SimulationSummary::aggregate(&rules, &schedule, &rounds, &ledger).unwrap();
        assert_eq!(summary.jackpot_hits, 3);
    }
}
