//! Balance model
//!
//! A player's net position at the end of a session.
//! - Positive amount: creditor (the table owes them)
//! - Negative amount: debtor (they owe the table)
//! - Zero: already square
//!
//! Balances are derived as `final_amount - total_buy_in` by the caller (or by
//! [`crate::models::session::Session::balances`]); the settlement engine
//! never recomputes them.

use serde::{Deserialize, Serialize};

/// Player identifier as handed in by the caller
pub type PlayerId = String;

/// Which side of the table a player's position sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    /// Owes money (negative balance)
    Debtor,

    /// Is owed money (positive balance)
    Creditor,
}

/// A player's signed net balance
///
/// # Example
/// ```
/// use cashgame_core_rs::{Balance, Side};
///
/// let b = Balance::new("alice", -12.5);
/// assert_eq!(b.side(), Some(Side::Debtor));
/// assert_eq!(b.magnitude(), 12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Player identifier
    pub player: PlayerId,

    /// Signed amount in dollars
    pub amount: f64,
}

impl Balance {
    pub fn new(player: impl Into<PlayerId>, amount: f64) -> Self {
        Self {
            player: player.into(),
            amount,
        }
    }

    /// Build a balance from a player's buy-in total and cash-out
    pub fn from_result(player: impl Into<PlayerId>, total_buy_in: f64, final_amount: f64) -> Self {
        Self::new(player, final_amount - total_buy_in)
    }

    /// Side of the table, or `None` when the balance is exactly zero
    pub fn side(&self) -> Option<Side> {
        if self.amount > 0.0 {
            Some(Side::Creditor)
        } else if self.amount < 0.0 {
            Some(Side::Debtor)
        } else {
            None
        }
    }

    /// Unsigned size of the position
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

/// Sum of all balances; ~0 for a well-formed session
pub fn net_total(balances: &[Balance]) -> f64 {
    balances.iter().map(|b| b.amount).sum()
}
