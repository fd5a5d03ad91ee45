//! Chip Distribution Module
//!
//! Given a buy-in, blinds, a player count and a physical chip inventory,
//! finds starting stacks every player can receive that are worth exactly the
//! buy-in, then picks the most practical one.
//!
//! - `chain.rs`: dollar values for the five denominations
//! - `search.rs`: backtracking over per-player quantities
//! - `select.rs`: best stack and alternative shapes
//! - `solver.rs`: request validation and the public entry points
//! - `cache.rs`: memoized results for repeated requests
//!
//! The search is exhaustive over the configured value chains and stack sizes,
//! so the same request always yields the same solutions in the same order.

pub mod cache;
pub mod chain;
pub mod config;
pub mod search;
pub mod select;
pub mod solution;
pub mod solver;

// Re-export public API
pub use cache::{SolutionCache, DEFAULT_CACHE_LIMIT};
pub use chain::{value_chains, ValueChain};
pub use config::SolverConfig;
pub use select::{varied_solutions, VariedSolution, Variety};
pub use solution::{starting_stack, Solution};
pub use solver::{
    find_all_solutions, find_best_solution, ChipDistributionSolver, DistributionError,
    DistributionRequest,
};
