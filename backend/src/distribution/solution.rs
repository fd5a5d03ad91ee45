//! Solution model
//!
//! A per-player starting stack: the value chain it was built on, how many of
//! each chip a player receives, and the resulting totals.

use crate::distribution::chain::ValueChain;
use crate::models::chip::{ChipColor, ChipType, DENOMINATIONS};
use serde::{Deserialize, Serialize};

/// One candidate starting stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Solution {
    /// Value of each denomination as a multiple of the smallest
    pub multipliers: [u32; DENOMINATIONS],

    /// Step from the previous denomination (first entry is always 1)
    pub individual_multipliers: [u32; DENOMINATIONS],

    /// Dollar value of each denomination
    pub chip_values: [f64; DENOMINATIONS],

    /// Chips of each denomination per player
    pub distribution: [u32; DENOMINATIONS],

    /// Chips per player
    pub total_chips: u32,

    /// Dollar value of one player's stack
    pub total_value: f64,
}

impl Solution {
    pub(crate) fn from_chain(chain: &ValueChain, distribution: [u32; DENOMINATIONS]) -> Self {
        let total_chips = distribution.iter().sum();
        let total_value = distribution
            .iter()
            .zip(chain.chip_values.iter())
            .map(|(&q, &v)| f64::from(q) * v)
            .sum();

        Self {
            multipliers: chain.multipliers,
            individual_multipliers: chain.individual_multipliers,
            chip_values: chain.chip_values,
            distribution,
            total_chips,
            total_value,
        }
    }

    /// Number of denominations actually handed out
    pub fn colors_used(&self) -> usize {
        self.distribution.iter().filter(|&&q| q > 0).count()
    }

    /// Share of the stack made up of the smallest chip
    pub fn small_chip_ratio(&self) -> f64 {
        if self.total_chips == 0 {
            return 0.0;
        }
        f64::from(self.distribution[0]) / f64::from(self.total_chips)
    }

    /// Chips needed to seat `player_count` players with this stack
    pub fn chips_required(&self, player_count: u32) -> [u32; DENOMINATIONS] {
        self.distribution.map(|q| q.saturating_mul(player_count))
    }

    /// The stack as `ChipType` rows, smallest denomination first
    pub fn starting_stack(&self) -> [ChipType; DENOMINATIONS] {
        std::array::from_fn(|i| {
            ChipType::new(ChipColor::ALL[i], self.chip_values[i], self.distribution[i])
        })
    }
}

/// Starting stack for the caller to display
///
/// With no solution every colour comes back with zero value and zero quantity.
pub fn starting_stack(solution: Option<&Solution>) -> [ChipType; DENOMINATIONS] {
    match solution {
        Some(solution) => solution.starting_stack(),
        None => ChipColor::ALL.map(|c| ChipType::new(c, 0.0, 0)),
    }
}
