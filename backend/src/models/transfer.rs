//! Transfer model
//!
//! One line of a settlement plan. Either:
//! - a **payment** from a debtor to a creditor, optionally carrying a small
//!   forgiven residual, or
//! - a standalone **write-off** of a residual that had no counterparty left.
//!
//! Serialized with a `kind` tag (`"payment"` / `"writeOff"`) so consumers never
//! have to string-compare a pseudo-player to spot write-offs.
//!
//! Transfer ids are UUIDv5 values derived from the plan they belong to, so the
//! same input always produces the same ids.

use crate::models::balance::{PlayerId, Side};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deterministic transfer ids
const TRANSFER_NAMESPACE: Uuid = Uuid::from_u128(0x6b1f_3c2e_9a47_4d0b_8e15_c0a1_d7f2_5e93);

/// A residual amount forgiven instead of being paid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WriteOff {
    /// Player whose remaining position is forgiven
    pub player: PlayerId,

    /// Side the forgiven amount came from
    pub side: Side,

    /// Forgiven amount (always >= 0)
    pub amount: f64,
}

/// A single entry of a settlement plan
///
/// # Example
/// ```
/// use cashgame_core_rs::Transfer;
///
/// let t = Transfer::payment("strict", 0, "bob", "alice", 30.0, None);
/// assert!(t.is_payment());
/// assert_eq!(t.amount(), 30.0);
/// assert_eq!(t.from(), Some("bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Transfer {
    /// Money moves from `from` (debtor) to `to` (creditor)
    Payment {
        id: String,
        from: PlayerId,
        to: PlayerId,
        amount: f64,
        #[serde(
            rename = "writeOff",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        write_off: Option<WriteOff>,
    },

    /// A residual forgiven with no counterparty
    WriteOff {
        id: String,
        player: PlayerId,
        side: Side,
        amount: f64,
    },
}

impl Transfer {
    /// Create a payment
    ///
    /// `plan` and `seq` identify the plan and position the payment occupies;
    /// together with the parties they determine the id.
    pub fn payment(
        plan: &str,
        seq: usize,
        from: impl Into<PlayerId>,
        to: impl Into<PlayerId>,
        amount: f64,
        write_off: Option<WriteOff>,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        Self::Payment {
            id: transfer_id(plan, seq, &from, &to),
            from,
            to,
            amount,
            write_off,
        }
    }

    /// Create a standalone write-off
    pub fn write_off(plan: &str, seq: usize, write_off: WriteOff) -> Self {
        let WriteOff {
            player,
            side,
            amount,
        } = write_off;
        Self::WriteOff {
            id: transfer_id(plan, seq, &player, "write-off"),
            player,
            side,
            amount,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Payment { id, .. } | Self::WriteOff { id, .. } => id,
        }
    }

    pub fn is_payment(&self) -> bool {
        matches!(self, Self::Payment { .. })
    }

    /// Money moved by this entry (0 for a standalone write-off)
    pub fn amount(&self) -> f64 {
        match self {
            Self::Payment { amount, .. } => *amount,
            Self::WriteOff { .. } => 0.0,
        }
    }

    /// Paying player, for payments
    pub fn from(&self) -> Option<&str> {
        match self {
            Self::Payment { from, .. } => Some(from),
            Self::WriteOff { .. } => None,
        }
    }

    /// Receiving player, for payments
    pub fn to(&self) -> Option<&str> {
        match self {
            Self::Payment { to, .. } => Some(to),
            Self::WriteOff { .. } => None,
        }
    }

    /// Forgiven residual attached to this entry, if any
    pub fn write_off_detail(&self) -> Option<WriteOff> {
        match self {
            Self::Payment { write_off, .. } => write_off.clone(),
            Self::WriteOff {
                player,
                side,
                amount,
                ..
            } => Some(WriteOff {
                player: player.clone(),
                side: *side,
                amount: *amount,
            }),
        }
    }

    /// Forgiven amount carried by this entry (0 if none)
    pub fn write_off_amount(&self) -> f64 {
        match self {
            Self::Payment { write_off, .. } => write_off.as_ref().map_or(0.0, |w| w.amount),
            Self::WriteOff { amount, .. } => *amount,
        }
    }

    /// Attach (or grow) the forgiven residual on a payment
    ///
    /// No-op on standalone write-offs.
    pub(crate) fn absorb(&mut self, player: &str, side: Side, amount: f64) {
        if let Self::Payment { write_off, .. } = self {
            // Paying min(debtor, creditor) zeroes one side exactly, so a
            // payment only ever carries one player's residual.
            match write_off {
                Some(existing) => existing.amount += amount,
                None => {
                    *write_off = Some(WriteOff {
                        player: player.to_string(),
                        side,
                        amount,
                    });
                }
            }
        }
    }
}

fn transfer_id(plan: &str, seq: usize, a: &str, b: &str) -> String {
    let name = format!("{plan}/{seq}/{a}/{b}");
    Uuid::new_v5(&TRANSFER_NAMESPACE, name.as_bytes()).to_string()
}
