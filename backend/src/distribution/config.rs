//! Solver configuration
//!
//! Every house rule the search depends on lives here rather than as a
//! literal, so tests can exercise the edges (e.g. a 15-chip-only search).

use crate::distribution::solver::DistributionError;
use crate::models::chip::DENOMINATIONS;
use serde::{Deserialize, Serialize};

/// Constraints and preferences for the chip distribution search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Fewest chips a player may start with
    pub min_chips_per_player: u32,

    /// Most chips a player may start with
    pub max_chips_per_player: u32,

    /// Stack size the selection step aims for
    pub preferred_total_chips: u32,

    /// Minimum share of the stack made up of the smallest chip (0.0-1.0)
    pub min_small_chip_ratio: f64,

    /// Step between consecutive chip values (each > 1)
    pub multipliers: Vec<u32>,

    /// Allowed gap between stack value and buy-in (dollars)
    pub value_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_chips_per_player: 15,
            max_chips_per_player: 35,
            preferred_total_chips: 25,
            min_small_chip_ratio: 0.4,
            multipliers: vec![2, 4, 5],
            value_tolerance: 0.001,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<(), DistributionError> {
        if self.min_chips_per_player > self.max_chips_per_player {
            return Err(DistributionError::InvalidConfig(format!(
                "min_chips_per_player ({}) exceeds max_chips_per_player ({})",
                self.min_chips_per_player, self.max_chips_per_player
            )));
        }
        if !(0.0..=1.0).contains(&self.min_small_chip_ratio) {
            return Err(DistributionError::InvalidConfig(format!(
                "min_small_chip_ratio must be within 0..=1, got {}",
                self.min_small_chip_ratio
            )));
        }
        if self.multipliers.is_empty() {
            return Err(DistributionError::InvalidConfig(
                "multipliers must not be empty".to_string(),
            ));
        }
        if let Some(m) = self.multipliers.iter().find(|&&m| m < 2) {
            return Err(DistributionError::InvalidConfig(format!(
                "multipliers must be at least 2, got {m}"
            )));
        }
        let largest = self.multipliers.iter().copied().max().unwrap_or(1);
        if largest.checked_pow((DENOMINATIONS - 1) as u32).is_none() {
            return Err(DistributionError::InvalidConfig(format!(
                "multiplier {largest} makes the largest chip value overflow"
            )));
        }
        if !self.value_tolerance.is_finite() || self.value_tolerance <= 0.0 {
            return Err(DistributionError::InvalidConfig(format!(
                "value_tolerance must be finite and positive, got {}",
                self.value_tolerance
            )));
        }
        Ok(())
    }

    /// Smallest count of the lowest chip allowed in a stack of `total` chips
    pub fn min_small_chips(&self, total: u32) -> u32 {
        (f64::from(total) * self.min_small_chip_ratio).ceil() as u32
    }
}
