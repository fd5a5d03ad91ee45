//! Settlement Module
//!
//! Turns end-of-session net balances into a short list of payments.
//!
//! - Exact matches first (a debtor and creditor that cancel settle in one payment)
//! - Then the closest creditor for each remaining debtor
//! - Then a sweep of whatever is left
//!
//! Every plan is computed twice: strictly, and with small residuals written off
//! up to a caller-chosen threshold. See `engine.rs` for the entry point and
//! `passes.rs` for the passes themselves.
//!
//! This is a heuristic minimizer. It does not guarantee the fewest possible
//! payments in every topology, but it is deterministic for a given input order.
//!
//! # Example
//!
//! ```rust
//! use cashgame_core_rs::{settle, Balance, SettlementConfig};
//!
//! let balances = vec![
//!     Balance::new("alice", 50.50),
//!     Balance::new("bob", -50.0),
//!     Balance::new("carol", 0.0),
//!     Balance::new("dave", -0.50),
//! ];
//!
//! let config = SettlementConfig::default().with_threshold(1.0);
//! let outcome = settle(&balances, &config).unwrap();
//!
//! assert!(outcome.simplification_possible);
//! assert_eq!(outcome.simplified.payment_count(), 1);
//! assert_eq!(outcome.strict.payment_count(), 2);
//! ```

pub mod engine;
pub mod passes;

// Re-export public API
pub use engine::{settle, settle_session, SettlementConfig, SettlementError, SettlementOutcome};
pub use passes::{SettlementPlan, Tolerance};
