//! Funding ledger — per-ticket wager split and pool balances

use dl_rules::JackpotPolicy;
use log::debug;
use serde::{Deserialize, Serialize};

/// How one ticket's price was split
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FundingSplit {
    /// Amount routed into the jackpot pool
    pub jackpot_contribution: f64,
    /// Amount returned to the seller who pre-funded the initial stake
    pub seller_return: f64,
    /// Net sales remainder
    pub sales_amount: f64,
    /// Cumulative seller return after this ticket
    pub total_returned: f64,
    /// Cumulative net sales after this ticket
    pub total_sales: f64,
    /// Contribution rate applied to this ticket
    pub contribution_rate: f64,
    /// Whether the seller had been fully reimbursed after this ticket
    pub return_phase_completed: bool,
}

/// Mutable money state of one simulation run.
///
/// Owned exclusively by that run; every balance change flows through
/// [`PoolLedger::allocate_ticket`] or prize settlement.
#[derive(Debug, Clone)]
pub struct PoolLedger {
    jackpot_pool: f64,
    funding_pool: f64,
    total_returned_amount: f64,
    total_sales_amount: f64,
    jackpot_hits: u64,
    initial_jackpot_amount: f64,
}

impl PoolLedger {
    /// Fresh ledger with the pool at the policy's initial stake
    pub fn new(policy: &JackpotPolicy) -> Self {
        Self {
            jackpot_pool: policy.initial_amount,
            funding_pool: 0.0,
            total_returned_amount: 0.0,
            total_sales_amount: 0.0,
            jackpot_hits: 0,
            initial_jackpot_amount: policy.initial_amount,
        }
    }

    /// Split one ticket of the given price across pool contribution, seller
    /// return, and net sales, applying the contribution to the pool.
    ///
    /// Phase 1 runs while the seller is still owed part of the initial
    /// stake; the return is clamped so the seller is never overpaid. Phase 2
    /// switches to the post-return contribution rate and stops returning.
    /// A jackpot hit resets the returned amount, restarting phase 1.
    pub fn allocate_ticket(&mut self, policy: &JackpotPolicy, price: f64) -> FundingSplit {
        if !policy.enabled {
            self.total_sales_amount += price;
            return FundingSplit {
                jackpot_contribution: 0.0,
                seller_return: 0.0,
                sales_amount: price,
                total_returned: self.total_returned_amount,
                total_sales: self.total_sales_amount,
                contribution_rate: 0.0,
                return_phase_completed: true,
            };
        }

        let in_return_phase = self.total_returned_amount < self.initial_jackpot_amount;
        let contribution_rate = if in_return_phase {
            policy.contribution_rate
        } else {
            policy.post_return_contribution_rate
        };

        let jackpot_contribution = price * contribution_rate;
        self.jackpot_pool += jackpot_contribution;

        let seller_return = if in_return_phase {
            let potential = price * policy.return_rate;
            let remaining = self.initial_jackpot_amount - self.total_returned_amount;
            let actual = potential.min(remaining);
            self.total_returned_amount += actual;
            if self.total_returned_amount >= self.initial_jackpot_amount {
                debug!(
                    "seller fully reimbursed ({:.2}); switching to post-return contribution rate",
                    self.total_returned_amount
                );
            }
            actual
        } else {
            0.0
        };

        let sales_amount = price - jackpot_contribution - seller_return;
        self.total_sales_amount += sales_amount;

        FundingSplit {
            jackpot_contribution,
            seller_return,
            sales_amount,
            total_returned: self.total_returned_amount,
            total_sales: self.total_sales_amount,
            contribution_rate,
            return_phase_completed: self.total_returned_amount >= self.initial_jackpot_amount,
        }
    }

    /// Deduct a pooled tier's share; a shortfall moves into the funding
    /// buffer and the pool is clamped to zero.
    pub(crate) fn deduct_pooled_share(&mut self, share: f64) {
        self.jackpot_pool -= share;
        if self.jackpot_pool < 0.0 {
            self.funding_pool += self.jackpot_pool;
            self.jackpot_pool = 0.0;
        }
    }

    /// Top-tier hit: refill the pool to its starting stake, count the
    /// winners, and restart the seller-return schedule.
    pub(crate) fn record_jackpot_hit(&mut self, winners: u32) {
        self.jackpot_pool = self.initial_jackpot_amount;
        self.jackpot_hits += winners as u64;
        self.total_returned_amount = 0.0;
    }

    /// Current jackpot pool balance
    pub fn jackpot_pool(&self) -> f64 {
        self.jackpot_pool
    }

    /// Signed buffer absorbing pool shortfalls (non-positive)
    pub fn funding_pool(&self) -> f64 {
        self.funding_pool
    }

    /// Cumulative seller return since start or the last jackpot hit
    pub fn total_returned_amount(&self) -> f64 {
        self.total_returned_amount
    }

    /// Cumulative net sales, never reset
    pub fn total_sales_amount(&self) -> f64 {
        self.total_sales_amount
    }

    /// Cumulative top-tier winners across the run
    pub fn jackpot_hits(&self) -> u64 {
        self.jackpot_hits
    }

    /// The policy's initial pool stake
    pub fn initial_jackpot_amount(&self) -> f64 {
        self.initial_jackpot_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn phased_policy() -> JackpotPolicy {
        JackpotPolicy {
            enabled: true,
            initial_amount: 1000.0,
            contribution_rate: 0.2,
            post_return_contribution_rate: 0.4,
            return_rate: 0.6,
            jackpot_fixed_prize: None,
            min_jackpot: 0.0,
        }
    }

    #[test]
    fn test_disabled_policy_is_all_sales() {
        let policy = JackpotPolicy::disabled();
        let mut ledger = PoolLedger::new(&policy);

        let split = ledger.allocate_ticket(&policy, 10.0);
        assert_eq!(split.sales_amount, 10.0);
        assert_eq!(split.jackpot_contribution, 0.0);
        assert_eq!(split.seller_return, 0.0);
        assert!(split.return_phase_completed);
        assert_eq!(ledger.jackpot_pool(), 0.0);
        assert_eq!(ledger.total_sales_amount(), 10.0);
    }

    #[test]
    fn test_phase_one_split() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);

        let split = ledger.allocate_ticket(&policy, 10.0);
        assert_relative_eq!(split.jackpot_contribution, 2.0);
        assert_relative_eq!(split.seller_return, 6.0);
        assert_relative_eq!(split.sales_amount, 2.0);
        assert_eq!(split.contribution_rate, 0.2);
        assert!(!split.return_phase_completed);
        assert_relative_eq!(ledger.jackpot_pool(), 1002.0);
    }

    #[test]
    fn test_split_sums_to_price_in_both_phases() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);

        for _ in 0..300 {
            let split = ledger.allocate_ticket(&policy, 10.0);
            assert_relative_eq!(
                split.jackpot_contribution + split.seller_return + split.sales_amount,
                10.0,
                max_relative = 1e-12
            );
        }
    }

    #[test]
    fn test_return_clamped_at_phase_boundary() {
        // 166 tickets return 996; the 167th is owed only 4 of its 6.
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);

        for _ in 0..166 {
            let split = ledger.allocate_ticket(&policy, 10.0);
            assert!(!split.return_phase_completed);
        }
        assert_relative_eq!(ledger.total_returned_amount(), 996.0);

        let boundary = ledger.allocate_ticket(&policy, 10.0);
        assert_relative_eq!(boundary.seller_return, 4.0);
        assert_relative_eq!(boundary.sales_amount, 4.0);
        assert!(boundary.return_phase_completed);
        assert_relative_eq!(boundary.total_returned, 1000.0);
        assert_relative_eq!(ledger.total_returned_amount(), 1000.0);
    }

    #[test]
    fn test_phase_two_switches_contribution_rate() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);
        for _ in 0..167 {
            ledger.allocate_ticket(&policy, 10.0);
        }

        let split = ledger.allocate_ticket(&policy, 10.0);
        assert_eq!(split.contribution_rate, 0.4);
        assert_relative_eq!(split.jackpot_contribution, 4.0);
        assert_eq!(split.seller_return, 0.0);
        assert_relative_eq!(split.sales_amount, 6.0);
        assert!(split.return_phase_completed);
    }

    #[test]
    fn test_jackpot_hit_restarts_return_phase() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);
        for _ in 0..200 {
            ledger.allocate_ticket(&policy, 10.0);
        }
        assert_relative_eq!(ledger.total_returned_amount(), 1000.0);

        ledger.record_jackpot_hit(1);
        assert_eq!(ledger.total_returned_amount(), 0.0);
        assert_relative_eq!(ledger.jackpot_pool(), 1000.0);
        assert_eq!(ledger.jackpot_hits(), 1);

        let split = ledger.allocate_ticket(&policy, 10.0);
        assert_eq!(split.contribution_rate, 0.2);
        assert_relative_eq!(split.seller_return, 6.0);
    }

    #[test]
    fn test_shortfall_moves_into_funding_buffer() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);

        ledger.deduct_pooled_share(1200.0);
        assert_eq!(ledger.jackpot_pool(), 0.0);
        assert_relative_eq!(ledger.funding_pool(), -200.0);
    }

    #[test]
    fn test_sales_accumulate_monotonically() {
        let policy = phased_policy();
        let mut ledger = PoolLedger::new(&policy);
        let mut previous = 0.0;
        for _ in 0..400 {
            ledger.allocate_ticket(&policy, 10.0);
            assert!(ledger.total_sales_amount() >= previous);
            previous = ledger.total_sales_amount();
        }
    }
}
