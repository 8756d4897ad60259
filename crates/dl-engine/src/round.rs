//! Round simulator — one complete draw cycle

use std::collections::BTreeMap;

use dl_rules::{GameRules, PayoutSchedule, SimulationConfig, approx_match_probability};

use crate::funding::PoolLedger;
use crate::prize::settle_match_class;
use crate::results::{PrizeStatistics, RoundResult};
use crate::rng::DrawSource;

/// Minimum matched numbers for a ticket to count as winning.
///
/// Tickets below this floor never tally a winner, whatever tiers are
/// configured. Changing it changes the payout economics of every game.
pub const MIN_WINNING_MATCHES: u32 = 2;

/// Run one round: draw the winning numbers, play every ticket through the
/// funding split and match check, settle each winner class once, and
/// aggregate the round's statistics.
pub fn simulate_round(
    round_number: u64,
    rules: &GameRules,
    schedule: &PayoutSchedule,
    sim: &SimulationConfig,
    rng: &mut DrawSource,
    ledger: &mut PoolLedger,
) -> RoundResult {
    let (min, max) = rules.number_range;

    // DRAW
    let players_count = rng.pick_in_range(sim.players_range);
    let mut winning_numbers = rng.draw_distinct(min, max, rules.selection_count);
    winning_numbers.sort_unstable();

    // PLAY
    let mut total_bets: u64 = 0;
    let mut total_bet_amount = 0.0;
    let mut winners_by_matches: BTreeMap<u32, u32> = BTreeMap::new();
    let mut round_winners: u32 = 0;

    for _ in 0..players_count {
        let bets = rng.pick_in_range(sim.bets_range);
        total_bets += bets as u64;
        let mut player_won = false;

        for _ in 0..bets {
            let price = rules.ticket_price;
            total_bet_amount += price;
            ledger.allocate_ticket(&rules.jackpot, price);

            let picks = rng.draw_distinct(min, max, rules.selection_count);
            let matches = picks
                .iter()
                .filter(|&n| winning_numbers.contains(n))
                .count() as u32;

            if matches >= MIN_WINNING_MATCHES {
                *winners_by_matches.entry(matches).or_insert(0) += 1;
                if !player_won {
                    player_won = true;
                    round_winners += 1;
                }
            }
        }
    }

    // SETTLE, top match class first
    let mut payout_by_matches: BTreeMap<u32, f64> = BTreeMap::new();
    let mut total_payout = 0.0;
    for (&matches, &winners) in winners_by_matches.iter().rev() {
        let per_winner = settle_match_class(schedule, ledger, matches, winners);
        let tier_total = per_winner * winners as f64;
        payout_by_matches.insert(matches, tier_total);
        total_payout += tier_total;
    }

    // AGGREGATE
    let rtp = if total_bet_amount > 0.0 {
        total_payout / total_bet_amount
    } else {
        0.0
    };
    let prize_stats = schedule
        .tiers()
        .iter()
        .map(|tier| PrizeStatistics {
            level: tier.level,
            name: tier.name.clone(),
            winners_count: winners_by_matches
                .get(&tier.match_condition)
                .copied()
                .unwrap_or(0),
            total_amount: payout_by_matches
                .get(&tier.match_condition)
                .copied()
                .unwrap_or(0.0),
            probability: approx_match_probability(tier.match_condition),
        })
        .collect();

    RoundResult {
        round_number,
        players_count,
        total_bets,
        total_bet_amount,
        total_payout,
        rtp,
        jackpot_amount: ledger.jackpot_pool(),
        prize_stats,
        winning_numbers,
        winners_count: round_winners,
        non_winners_count: players_count - round_winners,
    }
}
