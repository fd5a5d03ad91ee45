//! Settlement engine entry point
//!
//! Runs the greedy passes twice, once strict and once threshold-aware, so the
//! caller can show both plans and how many payments the write-offs save.
//!
//! # Critical Invariants
//!
//! 1. **Accounting**: every input balance ends up paid, written off, or listed
//!    as unsettled; nothing is dropped silently.
//! 2. **Monotonicity**: the simplified plan never has more payments than the
//!    strict plan, and raising the threshold never adds payments.
//! 3. **No mutation**: caller balances are read only; passes work on copies.

use crate::models::balance::Balance;
use crate::models::session::Session;
use crate::models::transfer::Transfer;
use crate::settlement::passes::{build_plan, build_plan_with_breakpoint, SettlementPlan, Tolerance};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors that can occur before any settlement pass runs
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("Balance for player {player} is not finite: {amount}")]
    NonFiniteBalance { player: String, amount: f64 },

    #[error("Player {0} appears more than once")]
    DuplicatePlayer(String),

    #[error("Write-off threshold must be finite and non-negative, got {0}")]
    InvalidThreshold(f64),

    #[error("Strict epsilon must be finite and positive, got {0}")]
    InvalidEpsilon(f64),
}

/// Settlement behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Return the threshold plan as `transactions()` instead of the strict one
    pub use_threshold: bool,

    /// Residuals at or below this amount may be written off (dollars)
    pub threshold: f64,

    /// Amounts below this count as zero in the strict plan (dollars)
    pub epsilon: f64,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            use_threshold: false,
            threshold: 0.01,
            epsilon: 0.01,
        }
    }
}

impl SettlementConfig {
    /// Enable write-offs at `threshold`
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.use_threshold = true;
        self.threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), SettlementError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SettlementError::InvalidThreshold(self.threshold));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(SettlementError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

/// Both settlement plans and how they compare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    /// Plan with no write-offs
    pub strict: SettlementPlan,

    /// Plan with residuals up to the threshold written off
    pub simplified: SettlementPlan,

    /// Whether `transactions()` returns the simplified plan
    pub use_threshold: bool,

    /// True iff the simplified plan needs fewer payments
    pub simplification_possible: bool,

    /// Strict payment count minus simplified payment count
    pub transaction_difference: usize,

    /// Total amount forgiven by the simplified plan
    pub total_write_off: f64,
}

impl SettlementOutcome {
    /// The plan the caller asked for
    pub fn transactions(&self) -> &[Transfer] {
        if self.use_threshold {
            &self.simplified.transfers
        } else {
            &self.strict.transfers
        }
    }

    pub fn simplified_transactions(&self) -> &[Transfer] {
        &self.simplified.transfers
    }
}

/// Compute settlement payments for a set of net balances
///
/// # Example
///
/// ```rust
/// use cashgame_core_rs::{settle, Balance, SettlementConfig};
///
/// let balances = vec![
///     Balance::new("alice", 50.0),
///     Balance::new("bob", -30.0),
///     Balance::new("carol", -20.0),
/// ];
///
/// let outcome = settle(&balances, &SettlementConfig::default()).unwrap();
/// assert_eq!(outcome.strict.payment_count(), 2);
/// assert_eq!(outcome.total_write_off, 0.0);
/// ```
pub fn settle(
    balances: &[Balance],
    config: &SettlementConfig,
) -> Result<SettlementOutcome, SettlementError> {
    config.validate()?;
    validate_balances(balances)?;

    let strict = build_plan(balances, Tolerance::Strict(config.epsilon));
    let mut simplified = fewest_payments_up_to(balances, config.threshold);

    if simplified.payment_count() > strict.payment_count() {
        log::warn!(
            "threshold plan needs {} payments vs {} strict; using strict plan",
            simplified.payment_count(),
            strict.payment_count()
        );
        simplified = strict.clone();
    }

    let transaction_difference = strict.payment_count() - simplified.payment_count();
    let total_write_off = simplified.total_write_off();

    log::debug!(
        "settled {} balances: {} strict payments, {} simplified, {:.2} written off",
        balances.len(),
        strict.payment_count(),
        simplified.payment_count(),
        total_write_off
    );

    Ok(SettlementOutcome {
        strict,
        simplified,
        use_threshold: config.use_threshold,
        simplification_possible: transaction_difference > 0,
        transaction_difference,
        total_write_off,
    })
}

/// Settle a tallied session
///
/// Players without a recorded cash-out are left out.
pub fn settle_session(
    session: &Session,
    config: &SettlementConfig,
) -> Result<SettlementOutcome, SettlementError> {
    settle(&session.balances(), config)
}

/// Threshold plan with the fewest payments for any threshold in `[0, threshold]`
///
/// A plan only changes where the threshold crosses an amount the passes
/// compared, so walking those breakpoints visits every distinct plan once.
/// Ties keep the later plan: the plan at `threshold` itself wins unless a
/// smaller threshold needs strictly fewer payments.
fn fewest_payments_up_to(balances: &[Balance], threshold: f64) -> SettlementPlan {
    let (mut best, mut next) = build_plan_with_breakpoint(balances, Tolerance::Threshold(0.0));
    let mut best_level = 0.0;
    let mut last_level = 0.0;
    let mut last_count = best.payment_count();

    while let Some(level) = next.filter(|&b| b <= threshold) {
        let (plan, following) = build_plan_with_breakpoint(balances, Tolerance::Threshold(level));
        last_level = level;
        last_count = plan.payment_count();
        if last_count <= best.payment_count() {
            best = plan;
            best_level = level;
        }
        next = following;
    }

    if best_level < last_level {
        log::info!(
            "threshold {:.2} plan needs {} payments vs {} at {:.2}; using the smaller threshold",
            best_level,
            best.payment_count(),
            last_count,
            threshold
        );
    }
    best
}

fn validate_balances(balances: &[Balance]) -> Result<(), SettlementError> {
    let mut seen = HashSet::with_capacity(balances.len());
    for balance in balances {
        if !balance.amount.is_finite() {
            return Err(SettlementError::NonFiniteBalance {
                player: balance.player.clone(),
                amount: balance.amount,
            });
        }
        if !seen.insert(balance.player.as_str()) {
            return Err(SettlementError::DuplicatePlayer(balance.player.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nan_balance() {
        let balances = vec![Balance::new("alice", f64::NAN)];
        let err = settle(&balances, &SettlementConfig::default()).unwrap_err();
        assert!(matches!(err, SettlementError::NonFiniteBalance { .. }));
    }

    #[test]
    fn test_rejects_duplicate_player() {
        let balances = vec![Balance::new("alice", 5.0), Balance::new("alice", -5.0)];
        assert_eq!(
            settle(&balances, &SettlementConfig::default()),
            Err(SettlementError::DuplicatePlayer("alice".to_string()))
        );
    }

    #[test]
    fn test_rejects_negative_threshold() {
        let config = SettlementConfig::default().with_threshold(-1.0);
        assert_eq!(
            settle(&[], &config),
            Err(SettlementError::InvalidThreshold(-1.0))
        );
    }

    #[test]
    fn test_empty_input_gives_empty_plans() {
        let outcome = settle(&[], &SettlementConfig::default()).unwrap();
        assert!(outcome.strict.is_empty());
        assert!(outcome.simplified.is_empty());
        assert!(!outcome.simplification_possible);
        assert_eq!(outcome.transaction_difference, 0);
    }

    #[test]
    fn test_raising_threshold_never_adds_payments() {
        // At exactly 10 the greedy passes need 3 payments; at 5 they need 2
        let balances: Vec<Balance> = [2079, -349, -1274, -2390, -389, 1212, 1111]
            .iter()
            .enumerate()
            .map(|(i, c)| Balance::new(format!("p{i}"), f64::from(*c) / 100.0))
            .collect();
        assert_eq!(
            build_plan(&balances, Tolerance::Threshold(10.0)).payment_count(),
            3
        );

        let at_five = settle(&balances, &SettlementConfig::default().with_threshold(5.0)).unwrap();
        let at_ten = settle(&balances, &SettlementConfig::default().with_threshold(10.0)).unwrap();

        assert_eq!(at_five.simplified.payment_count(), 2);
        assert_eq!(at_ten.simplified.payment_count(), 2);
        assert!(at_ten
            .simplified
            .transfers
            .iter()
            .all(|t| t.write_off_amount() <= 10.0));
    }

    #[test]
    fn test_transactions_follow_use_threshold() {
        let balances = vec![
            Balance::new("alice", 50.5),
            Balance::new("bob", -50.0),
            Balance::new("dave", -0.5),
        ];

        let strict = settle(&balances, &SettlementConfig::default()).unwrap();
        assert_eq!(strict.transactions(), strict.strict.transfers.as_slice());

        let simplified = settle(&balances, &SettlementConfig::default().with_threshold(1.0)).unwrap();
        assert_eq!(
            simplified.transactions(),
            simplified.simplified.transfers.as_slice()
        );
    }
}
