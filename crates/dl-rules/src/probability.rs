//! Combinatorics helpers for draw games

/// C(n, r), the number of ways to choose `r` of `n` items.
///
/// Iterative with the smaller complement, exact in u128 for any realistic
/// number pool.
pub fn combinations(n: u64, r: u64) -> u128 {
    if r > n {
        return 0;
    }
    if r == 0 || r == n {
        return 1;
    }
    let r = r.min(n - r);
    let mut result: u128 = 1;
    for i in 0..r {
        result = result * (n - i) as u128 / (i + 1) as u128;
    }
    result
}

/// Hypergeometric probability of matching exactly `matches` of the drawn
/// numbers when both the draw and the ticket select `picks` numbers from a
/// pool of `pool` numbers.
pub fn exact_match_probability(pool: u32, picks: u32, matches: u32) -> f64 {
    if matches > picks || picks > pool {
        return 0.0;
    }
    let total = combinations(pool as u64, picks as u64);
    if total == 0 {
        return 0.0;
    }
    let favorable = combinations(picks as u64, matches as u64)
        * combinations((pool - picks) as u64, (picks - matches) as u64);
    favorable as f64 / total as f64
}

/// The cheap `1 / 2^matches` heuristic reported in per-round tier
/// statistics.
///
/// This is an approximation, not the hypergeometric probability — it is kept
/// because downstream reports depend on these numbers. Use
/// [`exact_match_probability`] for real combinatorics.
pub fn approx_match_probability(matches: u32) -> f64 {
    if matches == 0 {
        return 0.0;
    }
    1.0 / f64::powi(2.0, matches as i32)
}
