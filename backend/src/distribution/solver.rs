//! Chip distribution solver
//!
//! Searches every value chain for per-player stacks worth exactly the buy-in,
//! then picks the most practical one.
//!
//! # Critical Invariants
//!
//! 1. **Exactness**: every returned stack is worth the buy-in within
//!    `value_tolerance`
//! 2. **Inventory**: `distribution[i] * player_count <= available[i]`
//! 3. **Monotone values**: chip values strictly increase by denomination
//! 4. **Determinism**: same request, same solutions, same order
//!
//! An empty result is a normal outcome (the buy-in is not reachable with
//! these blinds and this inventory), not an error.

use crate::distribution::chain::value_chains;
use crate::distribution::config::SolverConfig;
use crate::distribution::search::{per_player_caps, QuantitySearch};
use crate::distribution::select::{self, VariedSolution};
use crate::distribution::solution::Solution;
use crate::models::chip::{ChipSet, DENOMINATIONS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur before the search runs
#[derive(Debug, Error, PartialEq)]
pub enum DistributionError {
    #[error("Buy-in must be finite and positive, got {0}")]
    InvalidBuyIn(f64),

    #[error("Big blind must be finite and positive, got {0}")]
    InvalidBigBlind(f64),

    #[error("At least one player is required")]
    NoPlayers,

    #[error("Invalid solver config: {0}")]
    InvalidConfig(String),
}

/// Inputs to one search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionRequest {
    /// Dollar value of one player's starting stack
    pub buy_in: f64,

    /// Big blind; the smallest chip is worth half of it
    pub big_blind: f64,

    /// Players to seat
    pub player_count: u32,

    /// Physical chips of each colour, smallest denomination first
    pub available_chips: [u32; DENOMINATIONS],
}

impl DistributionRequest {
    pub fn new(
        buy_in: f64,
        big_blind: f64,
        player_count: u32,
        available_chips: [u32; DENOMINATIONS],
    ) -> Self {
        Self {
            buy_in,
            big_blind,
            player_count,
            available_chips,
        }
    }

    /// Request drawing on a chip-set preset
    pub fn with_chip_set(buy_in: f64, big_blind: f64, player_count: u32, set: ChipSet) -> Self {
        Self::new(buy_in, big_blind, player_count, set.quantities())
    }

    pub fn small_blind(&self) -> f64 {
        self.big_blind / 2.0
    }

    pub fn validate(&self) -> Result<(), DistributionError> {
        if !self.buy_in.is_finite() || self.buy_in <= 0.0 {
            return Err(DistributionError::InvalidBuyIn(self.buy_in));
        }
        if !self.big_blind.is_finite() || self.big_blind <= 0.0 {
            return Err(DistributionError::InvalidBigBlind(self.big_blind));
        }
        if self.player_count == 0 {
            return Err(DistributionError::NoPlayers);
        }
        Ok(())
    }
}

/// Chip distribution search with a fixed configuration
#[derive(Debug, Clone, Default)]
pub struct ChipDistributionSolver {
    config: SolverConfig,
}

impl ChipDistributionSolver {
    pub fn new(config: SolverConfig) -> Result<Self, DistributionError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Every stack that satisfies the request
    ///
    /// Ordered by value chain, then stack size, then quantities ascending.
    pub fn find_all(&self, request: &DistributionRequest) -> Result<Vec<Solution>, DistributionError> {
        request.validate()?;

        let chains = value_chains(request.small_blind(), &self.config.multipliers);
        let caps = per_player_caps(&request.available_chips, request.player_count);
        log::debug!(
            "searching {} value chains, per-player caps {:?}",
            chains.len(),
            caps
        );

        let solutions: Vec<Solution> = chains
            .iter()
            .flat_map(|chain| {
                QuantitySearch::new(chain, caps, self.config.value_tolerance)
                    .run(request.buy_in, &self.config)
            })
            .collect();

        log::debug!("found {} candidate stacks", solutions.len());
        Ok(solutions)
    }

    /// Most practical stack among `solutions`
    pub fn find_best(&self, solutions: &[Solution]) -> Option<Solution> {
        select::find_best_solution(solutions, self.config.preferred_total_chips)
    }

    /// Search and select in one step
    pub fn solve(&self, request: &DistributionRequest) -> Result<Option<Solution>, DistributionError> {
        let solutions = self.find_all(request)?;
        Ok(self.find_best(&solutions))
    }

    /// Best stack per alternative shape
    pub fn varieties(&self, solutions: &[Solution]) -> Vec<VariedSolution> {
        select::varied_solutions(solutions)
    }
}

/// Search with the default house rules
///
/// # Example
///
/// ```rust
/// use cashgame_core_rs::distribution::{find_all_solutions, find_best_solution};
///
/// let solutions = find_all_solutions(20.0, 1.0, 4, [400; 5]).unwrap();
/// let best = find_best_solution(&solutions).unwrap();
///
/// assert_eq!(best.total_chips, 25);
/// assert!((best.total_value - 20.0).abs() < 0.001);
/// ```
pub fn find_all_solutions(
    buy_in: f64,
    big_blind: f64,
    player_count: u32,
    available_chips: [u32; DENOMINATIONS],
) -> Result<Vec<Solution>, DistributionError> {
    ChipDistributionSolver::default().find_all(&DistributionRequest::new(
        buy_in,
        big_blind,
        player_count,
        available_chips,
    ))
}

/// Select with the default preferred stack size
pub fn find_best_solution(solutions: &[Solution]) -> Option<Solution> {
    ChipDistributionSolver::default().find_best(solutions)
}
