//! Quantity search
//!
//! For one value chain, enumerates per-player chip counts
//! `x1 > x2 > x3 > x4 > x5 >= 0` that add up to exactly `T` chips worth the
//! buy-in, for every stack size `T` in the configured range.
//!
//! # Algorithm
//!
//! 1. For each `T`, try every `x1` from `ceil(T * ratio)` upward (the
//!    smallest chip dominates the stack).
//! 2. Hand the rest to a single backtracking routine that walks the remaining
//!    denominations carrying two budgets: chips left and dollars left.
//! 3. Prune a branch when the dollar budget goes negative, or when even the
//!    largest chip cannot cover what is left.
//! 4. Accept when the chip budget is exactly used and the dollars left are
//!    within tolerance. Later denominations that were never reached stay zero.
//!
//! Quantities are capped by the physical inventory (`available / players`),
//! so every accepted stack can be dealt to every player.

use crate::distribution::chain::ValueChain;
use crate::distribution::config::SolverConfig;
use crate::distribution::solution::Solution;
use crate::models::chip::DENOMINATIONS;

/// Largest per-player count of each denomination the inventory supports
pub fn per_player_caps(available: &[u32; DENOMINATIONS], player_count: u32) -> [u32; DENOMINATIONS] {
    available.map(|a| a / player_count.max(1))
}

/// Search state for one value chain
pub struct QuantitySearch<'a> {
    chain: &'a ValueChain,
    caps: [u32; DENOMINATIONS],
    tolerance: f64,
}

impl<'a> QuantitySearch<'a> {
    pub fn new(chain: &'a ValueChain, caps: [u32; DENOMINATIONS], tolerance: f64) -> Self {
        Self {
            chain,
            caps,
            tolerance,
        }
    }

    /// All accepted stacks for this chain, in (T, x1, x2, ...) order
    pub fn run(&self, buy_in: f64, config: &SolverConfig) -> Vec<Solution> {
        let mut found = Vec::new();

        for total in config.min_chips_per_player..=config.max_chips_per_player {
            let smallest = self.chain.chip_values[0];
            let x1_max = total.min(self.caps[0]);

            for x1 in config.min_small_chips(total)..=x1_max {
                let value_left = buy_in - f64::from(x1) * smallest;
                if value_left <= -self.tolerance {
                    break;
                }
                let mut distribution = [0; DENOMINATIONS];
                distribution[0] = x1;
                self.descend(1, total - x1, value_left, &mut distribution, &mut found);
            }
        }

        found
    }

    /// Assign denomination `level` onward
    ///
    /// `distribution[level - 1]` bounds this level's count from above
    /// (strictly decreasing quantities).
    pub fn descend(
        &self,
        level: usize,
        chips_left: u32,
        value_left: f64,
        distribution: &mut [u32; DENOMINATIONS],
        found: &mut Vec<Solution>,
    ) {
        if chips_left == 0 || level == DENOMINATIONS {
            // At least two denominations must be in play
            if chips_left == 0 && level >= 2 && value_left.abs() < self.tolerance {
                found.push(Solution::from_chain(self.chain, *distribution));
            }
            return;
        }

        let largest = self.chain.chip_values[DENOMINATIONS - 1];
        if value_left > f64::from(chips_left) * largest + self.tolerance {
            return;
        }

        let previous = distribution[level - 1];
        let max_count = previous
            .saturating_sub(1)
            .min(chips_left)
            .min(self.caps[level]);
        let value = self.chain.chip_values[level];

        for count in 1..=max_count {
            let remaining = value_left - f64::from(count) * value;
            if remaining <= -self.tolerance {
                break;
            }
            distribution[level] = count;
            self.descend(level + 1, chips_left - count, remaining, distribution, found);
        }
        distribution[level] = 0;
    }
}
