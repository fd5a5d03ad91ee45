//! Greedy settlement passes
//!
//! A plan is built in three passes over owned working copies of the
//! debtor/creditor positions:
//!
//! 1. **Exact match**: pair debtors and creditors whose amounts cancel.
//! 2. **Near match**: each remaining debtor pays the creditor whose amount is
//!    closest to its own (smallest difference, not largest amount).
//! 3. **Sweep**: whatever is left is paid off in list order.
//!
//! The same passes run in two modes. `Tolerance::Strict` treats anything under
//! a fixed epsilon as settled and never forgives money. `Tolerance::Threshold`
//! treats anything at or under the caller's threshold as settled and records
//! the forgiven residual as a write-off.
//!
//! `build_plan_with_breakpoint` also reports the smallest amount a threshold
//! comparison rejected. Below that amount every comparison resolves the same
//! way, so the plan does not change.

use crate::models::balance::{Balance, PlayerId, Side};
use crate::models::transfer::{Transfer, WriteOff};
use serde::{Deserialize, Serialize};
use std::cell::Cell;

// ============================================================================
// Tolerance
// ============================================================================

/// Comparison rule for one settlement pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tolerance {
    /// Amounts strictly below epsilon count as zero; nothing is forgiven
    Strict(f64),

    /// Amounts at or below the threshold count as zero and are written off
    Threshold(f64),
}

impl Tolerance {
    /// Does `x` count as nothing under this rule?
    pub fn within(&self, x: f64) -> bool {
        match *self {
            Tolerance::Strict(epsilon) => x < epsilon,
            Tolerance::Threshold(threshold) => x <= threshold,
        }
    }

    pub fn forgives(&self) -> bool {
        matches!(self, Tolerance::Threshold(_))
    }

    /// Plan label, also feeds transfer ids
    pub fn label(&self) -> &'static str {
        match self {
            Tolerance::Strict(_) => "strict",
            Tolerance::Threshold(_) => "threshold",
        }
    }
}

// ============================================================================
// Plan
// ============================================================================

/// Output of one settlement mode
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Payments and write-offs in the order they were decided
    pub transfers: Vec<Transfer>,

    /// Positions left over with no counterparty
    ///
    /// Empty for a zero-sum input settled in strict mode. Signed like
    /// [`Balance`]: debtors negative, creditors positive.
    pub unsettled: Vec<Balance>,
}

impl SettlementPlan {
    /// Number of money-moving entries
    pub fn payment_count(&self) -> usize {
        self.transfers.iter().filter(|t| t.is_payment()).count()
    }

    pub fn payments(&self) -> impl Iterator<Item = &Transfer> {
        self.transfers.iter().filter(|t| t.is_payment())
    }

    /// Sum of all forgiven amounts
    pub fn total_write_off(&self) -> f64 {
        self.transfers.iter().map(Transfer::write_off_amount).sum()
    }

    /// Sum of all payment amounts
    pub fn total_paid(&self) -> f64 {
        self.transfers.iter().map(Transfer::amount).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.unsettled.is_empty()
    }
}

// ============================================================================
// Working state
// ============================================================================

/// A tolerance that remembers the smallest amount it rejected
///
/// Every threshold-dependent decision in the passes goes through `within`.
struct Gauge {
    tolerance: Tolerance,
    next_breakpoint: Cell<Option<f64>>,
}

impl Gauge {
    fn new(tolerance: Tolerance) -> Self {
        Self {
            tolerance,
            next_breakpoint: Cell::new(None),
        }
    }

    fn within(&self, x: f64) -> bool {
        let inside = self.tolerance.within(x);
        if !inside && self.next_breakpoint.get().map_or(true, |b| x < b) {
            self.next_breakpoint.set(Some(x));
        }
        inside
    }

    fn forgives(&self) -> bool {
        self.tolerance.forgives()
    }
}

/// A player's remaining unsigned position during a pass
#[derive(Debug, Clone)]
struct Position {
    player: PlayerId,
    amount: f64,
}

/// Accumulates transfers for one plan
struct PlanBuilder {
    label: &'static str,
    transfers: Vec<Transfer>,
}

impl PlanBuilder {
    fn new(label: &'static str) -> Self {
        Self {
            label,
            transfers: Vec::new(),
        }
    }

    fn pay(&mut self, from: &str, to: &str, amount: f64, write_off: Option<WriteOff>) {
        let seq = self.transfers.len();
        self.transfers
            .push(Transfer::payment(self.label, seq, from, to, amount, write_off));
    }

    fn forgive(&mut self, player: &str, side: Side, amount: f64) {
        let seq = self.transfers.len();
        self.transfers.push(Transfer::write_off(
            self.label,
            seq,
            WriteOff {
                player: player.to_string(),
                side,
                amount,
            },
        ));
    }

    /// Attach a residual to the most recent payment
    fn absorb_into_last(&mut self, player: &str, side: Side, amount: f64) {
        if let Some(last) = self.transfers.last_mut() {
            last.absorb(player, side, amount);
        }
    }
}

/// Write-off payload for a matched pair whose amounts differ by `diff`
///
/// The larger side absorbs the difference.
fn pair_residual(debtor: &Position, creditor: &Position) -> Option<WriteOff> {
    let diff = (debtor.amount - creditor.amount).abs();
    if diff <= 0.0 {
        return None;
    }
    let (player, side) = if debtor.amount > creditor.amount {
        (&debtor.player, Side::Debtor)
    } else {
        (&creditor.player, Side::Creditor)
    };
    Some(WriteOff {
        player: player.clone(),
        side,
        amount: diff,
    })
}

// ============================================================================
// Passes
// ============================================================================

/// Build a settlement plan for `balances` under `tolerance`
///
/// Balances are assumed validated (finite, unique players).
pub fn build_plan(balances: &[Balance], tolerance: Tolerance) -> SettlementPlan {
    build_plan_with_breakpoint(balances, tolerance).0
}

/// Build a plan and report where it would next change
///
/// Returns the smallest amount the tolerance rejected. The same plan is
/// produced for every threshold from the current one up to (excluding) that
/// breakpoint; `None` means it never changes again.
pub fn build_plan_with_breakpoint(
    balances: &[Balance],
    tolerance: Tolerance,
) -> (SettlementPlan, Option<f64>) {
    let gauge = Gauge::new(tolerance);
    let mut builder = PlanBuilder::new(tolerance.label());
    let (mut debtors, mut creditors) = partition(balances, &gauge, &mut builder);

    exact_match(&mut debtors, &mut creditors, &gauge, &mut builder);

    debtors.retain(|p| !gauge.within(p.amount));
    creditors.retain(|p| !gauge.within(p.amount));

    sort_descending(&mut debtors);
    sort_descending(&mut creditors);

    near_match(&mut debtors, &mut creditors, &gauge, &mut builder);
    if gauge.forgives() {
        forgive_residuals(&mut debtors, Side::Debtor, &gauge, &mut builder);
        forgive_residuals(&mut creditors, Side::Creditor, &gauge, &mut builder);
    }
    sweep(&mut debtors, &mut creditors, &gauge, &mut builder);

    let unsettled = debtors
        .iter()
        .filter(|p| !gauge.within(p.amount))
        .map(|p| Balance::new(p.player.clone(), -p.amount))
        .chain(
            creditors
                .iter()
                .filter(|p| !gauge.within(p.amount))
                .map(|p| Balance::new(p.player.clone(), p.amount)),
        )
        .collect();

    let plan = SettlementPlan {
        transfers: builder.transfers,
        unsettled,
    };
    (plan, gauge.next_breakpoint.get())
}

/// Split balances into debtor and creditor positions, preserving input order
///
/// In threshold mode, non-zero balances already within the threshold are
/// written off here and never enter the passes.
fn partition(
    balances: &[Balance],
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) -> (Vec<Position>, Vec<Position>) {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for balance in balances {
        let Some(side) = balance.side() else {
            continue;
        };
        let amount = balance.magnitude();

        if gauge.forgives() && gauge.within(amount) {
            builder.forgive(&balance.player, side, amount);
            continue;
        }

        let position = Position {
            player: balance.player.clone(),
            amount,
        };
        match side {
            Side::Debtor => debtors.push(position),
            Side::Creditor => creditors.push(position),
        }
    }

    (debtors, creditors)
}

/// Pair each debtor with the first unmatched creditor whose amount cancels it
fn exact_match(
    debtors: &mut [Position],
    creditors: &mut [Position],
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) {
    let mut creditor_matched = vec![false; creditors.len()];

    for debtor in debtors.iter_mut() {
        let found = creditors.iter().enumerate().position(|(j, creditor)| {
            !creditor_matched[j] && gauge.within((debtor.amount - creditor.amount).abs())
        });
        let Some(j) = found else {
            continue;
        };
        let creditor = &mut creditors[j];

        if gauge.forgives() {
            let amount = debtor.amount.min(creditor.amount);
            builder.pay(
                &debtor.player,
                &creditor.player,
                amount,
                pair_residual(debtor, creditor),
            );
        } else {
            builder.pay(&debtor.player, &creditor.player, debtor.amount, None);
        }

        creditor_matched[j] = true;
        debtor.amount = 0.0;
        creditor.amount = 0.0;
    }
}

/// Each open debtor pays the open creditor closest to its own amount
fn near_match(
    debtors: &mut [Position],
    creditors: &mut [Position],
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) {
    if debtors.is_empty() || creditors.is_empty() {
        return;
    }

    for debtor in debtors.iter_mut() {
        if gauge.within(debtor.amount) {
            continue;
        }

        let mut best: Option<(usize, f64)> = None;
        for (j, creditor) in creditors.iter().enumerate() {
            if gauge.within(creditor.amount) {
                continue;
            }
            let difference = (debtor.amount - creditor.amount).abs();
            if best.map_or(true, |(_, d)| difference < d) {
                best = Some((j, difference));
            }
        }
        let Some((j, difference)) = best else {
            continue;
        };
        let creditor = &mut creditors[j];
        let amount = debtor.amount.min(creditor.amount);

        if gauge.forgives() && gauge.within(difference) {
            builder.pay(
                &debtor.player,
                &creditor.player,
                amount,
                pair_residual(debtor, creditor),
            );
            debtor.amount = 0.0;
            creditor.amount = 0.0;
            continue;
        }

        builder.pay(&debtor.player, &creditor.player, amount, None);
        debtor.amount -= amount;
        creditor.amount -= amount;

        if gauge.forgives() {
            absorb_leftover(debtor, Side::Debtor, gauge, builder);
            absorb_leftover(creditor, Side::Creditor, gauge, builder);
        }
    }
}

/// Pay off what is left in list order until one side runs out
fn sweep(
    debtors: &mut [Position],
    creditors: &mut [Position],
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) {
    let mut d = 0;
    let mut c = 0;

    while d < debtors.len() && c < creditors.len() {
        while d < debtors.len() && gauge.within(debtors[d].amount) {
            d += 1;
        }
        while c < creditors.len() && gauge.within(creditors[c].amount) {
            c += 1;
        }
        if d >= debtors.len() || c >= creditors.len() {
            break;
        }

        let debtor = &mut debtors[d];
        let creditor = &mut creditors[c];
        let amount = debtor.amount.min(creditor.amount);

        builder.pay(&debtor.player, &creditor.player, amount, None);
        debtor.amount -= amount;
        creditor.amount -= amount;

        if gauge.forgives() {
            absorb_leftover(debtor, Side::Debtor, gauge, builder);
            absorb_leftover(creditor, Side::Creditor, gauge, builder);
        }
    }
}

/// Fold a small leftover into the payment that produced it
fn absorb_leftover(
    position: &mut Position,
    side: Side,
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) {
    if position.amount > 0.0 && gauge.within(position.amount) {
        builder.absorb_into_last(&position.player, side, position.amount);
        position.amount = 0.0;
    }
}

/// Write off small leftovers that have no payment to ride on
fn forgive_residuals(
    positions: &mut [Position],
    side: Side,
    gauge: &Gauge,
    builder: &mut PlanBuilder,
) {
    for position in positions.iter_mut() {
        if position.amount > 0.0 && gauge.within(position.amount) {
            builder.forgive(&position.player, side, position.amount);
            position.amount = 0.0;
        }
    }
}

/// Stable sort, largest amount first
fn sort_descending(positions: &mut [Position]) {
    positions.sort_by(|a, b| b.amount.total_cmp(&a.amount));
}
