//! Domain models for the cash-game core

pub mod balance;
pub mod chip;
pub mod session;
pub mod transfer;

// Re-exports
pub use balance::{Balance, PlayerId, Side};
pub use chip::{recommended_big_blind, ChipColor, ChipSet, ChipType, DENOMINATIONS};
pub use session::{
    player_stats, GameHistoryEntry, PlayerEntry, PlayerHistory, PlayerStats, Session, SessionError,
};
pub use transfer::{Transfer, WriteOff};
