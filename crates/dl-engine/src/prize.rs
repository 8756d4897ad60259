//! Prize settlement — per-winner payouts and pool side effects

use dl_rules::{PayoutSchedule, PrizeKind};
use log::{debug, info};

use crate::funding::PoolLedger;

/// Settle one class of winners and return the payout per winner.
///
/// Called at most once per distinct match count per round, after every
/// ticket has been classified, so `winners` is final. Fixed tiers pay from
/// house float and leave the pool untouched. The jackpot tier takes its
/// share (or the entire pool), splits it per winner, adds any flat top-up,
/// and then refills the pool to the initial stake while restarting the
/// seller-return schedule. Other pooled tiers deduct their share from the
/// pool, with shortfalls absorbed by the funding buffer.
pub fn settle_match_class(
    schedule: &PayoutSchedule,
    ledger: &mut PoolLedger,
    matches: u32,
    winners: u32,
) -> f64 {
    if winners == 0 {
        return 0.0;
    }
    let Some(tier) = schedule.tier_for_matches(matches) else {
        return 0.0;
    };

    match &tier.kind {
        PrizeKind::Fixed(amount) => *amount,
        PrizeKind::NoPayout => 0.0,
        PrizeKind::Pooled {
            percentage,
            top_up,
            jackpot_tier: true,
        } => {
            let pool_share = match percentage {
                Some(pct) => ledger.jackpot_pool() * pct,
                None => ledger.jackpot_pool(),
            };
            let per_winner = pool_share / winners as f64 + top_up.unwrap_or(0.0);
            ledger.record_jackpot_hit(winners);
            info!(
                "jackpot hit: {winners} winner(s) at {matches} matches, {per_winner:.2} each; pool refilled to {:.2}",
                ledger.initial_jackpot_amount()
            );
            per_winner
        }
        PrizeKind::Pooled {
            percentage,
            jackpot_tier: false,
            ..
        } => {
            let Some(pct) = percentage else {
                return 0.0;
            };
            let total_share = ledger.jackpot_pool() * pct;
            let per_winner = total_share / winners as f64;
            ledger.deduct_pooled_share(total_share);
            debug!(
                "tier '{}': {winners} winner(s) share {total_share:.2} from the pool",
                tier.name
            );
            per_winner
        }
    }
}
