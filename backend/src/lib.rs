//! Cash Game Core - Rust Engine
//!
//! Bookkeeping for a home poker cash game: who bought in for what, who owes
//! whom at the end, and how to split the chip case at the start.
//!
//! # Architecture
//!
//! - **models**: Domain types (Balance, Transfer, Session, ChipType)
//! - **settlement**: Debt settlement engine (strict and threshold plans)
//! - **distribution**: Chip distribution solver
//!
//! # Critical Invariants
//!
//! 1. Money is f64 dollars (a $0.25 big blind makes $0.125 chips)
//! 2. Every computation is deterministic for a given input order
//! 3. Settlement never produces a negative or non-finite payment

// Module declarations
pub mod distribution;
pub mod models;
pub mod settlement;

// Re-exports for convenience
pub use distribution::{
    find_all_solutions, find_best_solution, starting_stack, varied_solutions,
    ChipDistributionSolver, DistributionError, DistributionRequest, Solution, SolutionCache,
    SolverConfig, VariedSolution, Variety,
};
pub use models::{
    balance::{Balance, PlayerId, Side},
    chip::{recommended_big_blind, ChipColor, ChipSet, ChipType},
    session::{
        player_stats, GameHistoryEntry, PlayerEntry, PlayerHistory, PlayerStats, Session,
        SessionError,
    },
    transfer::{Transfer, WriteOff},
};
pub use settlement::{
    settle, settle_session, SettlementConfig, SettlementError, SettlementOutcome, SettlementPlan,
    Tolerance,
};
