//! Settlement Engine Tests
//!
//! End-to-end scenarios for `settle`: strict plans, threshold plans, write-off
//! accounting and the comparison fields the results screen shows.

use cashgame_core_rs::{
    settle, settle_session, Balance, Session, SettlementConfig, SettlementError, Side, Transfer,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn balances(entries: &[(&str, f64)]) -> Vec<Balance> {
    entries.iter().map(|(p, a)| Balance::new(*p, *a)).collect()
}

/// (from, to, amount) for every payment, in plan order
fn payments(transfers: &[Transfer]) -> Vec<(String, String, f64)> {
    transfers
        .iter()
        .filter(|t| t.is_payment())
        .map(|t| {
            (
                t.from().unwrap_or_default().to_string(),
                t.to().unwrap_or_default().to_string(),
                t.amount(),
            )
        })
        .collect()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// ============================================================================
// Strict Plans
// ============================================================================

#[test]
fn test_one_creditor_two_debtors() {
    let outcome = settle(
        &balances(&[("A", 50.0), ("B", -30.0), ("C", -20.0)]),
        &SettlementConfig::default(),
    )
    .unwrap();

    assert_eq!(
        payments(outcome.transactions()),
        vec![
            ("B".to_string(), "A".to_string(), 30.0),
            ("C".to_string(), "A".to_string(), 20.0),
        ]
    );
    assert_eq!(outcome.total_write_off, 0.0);
    assert!(!outcome.simplification_possible);
    assert_eq!(outcome.transaction_difference, 0);
}

#[test]
fn test_exact_pairs_then_sweep() {
    // C/A and D/B cancel after the near pass; D's leftover 5 goes to A
    let outcome = settle(
        &balances(&[("A", 40.0), ("B", 25.0), ("C", -35.0), ("D", -30.0)]),
        &SettlementConfig::default(),
    )
    .unwrap();

    assert_eq!(
        payments(&outcome.strict.transfers),
        vec![
            ("C".to_string(), "A".to_string(), 35.0),
            ("D".to_string(), "B".to_string(), 25.0),
            ("D".to_string(), "A".to_string(), 5.0),
        ]
    );
    assert!(outcome.strict.unsettled.is_empty());
}

#[test]
fn test_zero_balances_are_ignored() {
    let outcome = settle(
        &balances(&[("A", 0.0), ("B", 0.0), ("C", 10.0), ("D", -10.0)]),
        &SettlementConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.strict.transfers.len(), 1);
    assert!(outcome
        .strict
        .transfers
        .iter()
        .all(|t| t.from() != Some("A") && t.to() != Some("A")));
}

#[test]
fn test_strict_never_writes_off() {
    let outcome = settle(
        &balances(&[("A", 100.0), ("B", -99.99)]),
        &SettlementConfig::default(),
    )
    .unwrap();

    assert_eq!(outcome.strict.total_write_off(), 0.0);
    assert_eq!(outcome.strict.payment_count(), 1);
    // Input is a cent off zero-sum; the cent has nowhere to go
    assert_eq!(outcome.strict.unsettled.len(), 1);
    assert_eq!(outcome.strict.unsettled[0].player, "A");
}

// ============================================================================
// Threshold Plans
// ============================================================================

#[test]
fn test_near_exact_absorbed_as_write_offs() {
    let config = SettlementConfig::default().with_threshold(1.0);
    let outcome = settle(
        &balances(&[("A", 50.50), ("B", -50.0), ("C", 0.0), ("D", -0.50)]),
        &config,
    )
    .unwrap();

    assert_eq!(outcome.strict.payment_count(), 2);
    assert_eq!(outcome.simplified.payment_count(), 1);
    assert!(outcome.simplification_possible);
    assert_eq!(outcome.transaction_difference, 1);
    assert_close(outcome.total_write_off, 1.0);

    // D's 0.50 is forgiven outright
    match &outcome.simplified.transfers[0] {
        Transfer::WriteOff {
            player,
            side,
            amount,
            ..
        } => {
            assert_eq!(player, "D");
            assert_eq!(*side, Side::Debtor);
            assert_close(*amount, 0.5);
        }
        other => panic!("expected write-off, got {other:?}"),
    }

    // B pays 50 and A's extra 0.50 rides on that payment
    let payment = &outcome.simplified.transfers[1];
    assert_eq!(payment.from(), Some("B"));
    assert_eq!(payment.to(), Some("A"));
    assert_eq!(payment.amount(), 50.0);
    let residual = payment.write_off_detail().unwrap();
    assert_eq!(residual.player, "A");
    assert_eq!(residual.side, Side::Creditor);
    assert_close(residual.amount, 0.5);

    assert_eq!(outcome.transactions(), outcome.simplified_transactions());
}

#[test]
fn test_threshold_absorbs_one_cent_mismatch() {
    let config = SettlementConfig::default().with_threshold(1.0);
    let outcome = settle(&balances(&[("A", 100.0), ("B", -99.99)]), &config).unwrap();

    assert_eq!(outcome.simplified.payment_count(), 1);
    assert!(outcome.simplified.unsettled.is_empty());
    assert!((outcome.total_write_off - 0.01).abs() < 1e-6);
    // Same payment count as strict: nothing simplified
    assert!(!outcome.simplification_possible);
}

#[test]
fn test_threshold_rematches_pairs() {
    // At 1.0, C/A and D/B become near-exact pairs
    let config = SettlementConfig::default().with_threshold(1.0);
    let outcome = settle(
        &balances(&[("A", 10.02), ("B", 9.99), ("C", -10.0), ("D", -10.01)]),
        &config,
    )
    .unwrap();

    assert_eq!(outcome.simplified.payment_count(), 2);
    let pairs: Vec<_> = payments(&outcome.simplified.transfers)
        .into_iter()
        .map(|(from, to, _)| (from, to))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("C".to_string(), "A".to_string()),
            ("D".to_string(), "B".to_string()),
        ]
    );
    assert!((outcome.total_write_off - 0.04).abs() < 1e-6);
}

#[test]
fn test_use_threshold_off_still_reports_simplified_plan() {
    let config = SettlementConfig {
        use_threshold: false,
        threshold: 1.0,
        ..SettlementConfig::default()
    };
    let outcome = settle(
        &balances(&[("A", 50.50), ("B", -50.0), ("D", -0.50)]),
        &config,
    )
    .unwrap();

    assert_eq!(outcome.transactions(), outcome.strict.transfers.as_slice());
    assert_eq!(outcome.simplified.payment_count(), 1);
    assert!(outcome.simplification_possible);
}

#[test]
fn test_all_balances_under_threshold() {
    let config = SettlementConfig::default().with_threshold(5.0);
    let outcome = settle(&balances(&[("A", 3.0), ("B", -2.0), ("C", -1.0)]), &config).unwrap();

    assert_eq!(outcome.simplified.payment_count(), 0);
    assert_eq!(outcome.simplified.transfers.len(), 3);
    assert_close(outcome.total_write_off, 6.0);
    assert_eq!(outcome.transaction_difference, outcome.strict.payment_count());
}

#[test]
fn test_write_offs_can_strand_the_other_side() {
    // Both creditors fall under the threshold; nobody is left to pay C's 1.80
    let config = SettlementConfig::default().with_threshold(1.0);
    let outcome = settle(&balances(&[("A", 0.9), ("B", 0.9), ("C", -1.8)]), &config).unwrap();

    assert_eq!(outcome.strict.payment_count(), 2);
    assert_eq!(outcome.simplified.payment_count(), 0);

    let forgiven: Vec<_> = outcome
        .simplified
        .transfers
        .iter()
        .filter_map(Transfer::write_off_detail)
        .map(|w| (w.player, w.side))
        .collect();
    assert_eq!(
        forgiven,
        vec![
            ("A".to_string(), Side::Creditor),
            ("B".to_string(), Side::Creditor),
        ]
    );
    assert_close(outcome.total_write_off, 1.8);

    assert_eq!(outcome.simplified.unsettled.len(), 1);
    assert_eq!(outcome.simplified.unsettled[0].player, "C");
    assert_close(outcome.simplified.unsettled[0].amount, -1.8);
}

#[test]
fn test_larger_threshold_keeps_fewer_payments() {
    let table = balances(&[
        ("p0", 20.79),
        ("p1", -3.49),
        ("p2", -12.74),
        ("p3", -23.90),
        ("p4", -3.89),
        ("p5", 12.12),
        ("p6", 11.11),
    ]);

    let mut previous = usize::MAX;
    for threshold in [0.0, 1.0, 5.0, 10.0, 20.0] {
        let config = SettlementConfig::default().with_threshold(threshold);
        let count = settle(&table, &config).unwrap().simplified.payment_count();
        assert!(
            count <= previous,
            "{count} payments at threshold {threshold}, {previous} below it"
        );
        previous = count;
    }

    let at_ten = settle(&table, &SettlementConfig::default().with_threshold(10.0)).unwrap();
    assert_eq!(at_ten.simplified.payment_count(), 2);
}

// ============================================================================
// Identity and Serialization
// ============================================================================

#[test]
fn test_transfer_ids_are_deterministic_and_unique() {
    let input = balances(&[("A", 30.0), ("B", 30.0), ("C", -20.0), ("D", -20.0), ("E", -20.0)]);
    let first = settle(&input, &SettlementConfig::default()).unwrap();
    let second = settle(&input, &SettlementConfig::default()).unwrap();
    assert_eq!(first, second);

    let mut ids: Vec<_> = first.strict.transfers.iter().map(Transfer::id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), first.strict.transfers.len());
}

#[test]
fn test_transfer_kind_tag_in_json() {
    let config = SettlementConfig::default().with_threshold(1.0);
    let outcome = settle(
        &balances(&[("A", 50.50), ("B", -50.0), ("D", -0.50)]),
        &config,
    )
    .unwrap();

    let json = serde_json::to_value(&outcome.simplified.transfers).unwrap();
    assert_eq!(json[0]["kind"], "writeOff");
    assert_eq!(json[0]["side"], "debtor");
    assert_eq!(json[1]["kind"], "payment");
    assert_eq!(json[1]["writeOff"]["player"], "A");

    let back: Vec<Transfer> = serde_json::from_value(json).unwrap();
    assert_eq!(back, outcome.simplified.transfers);
}

// ============================================================================
// Input Validation
// ============================================================================

#[test]
fn test_rejects_infinite_balance() {
    let result = settle(
        &balances(&[("A", f64::INFINITY), ("B", -10.0)]),
        &SettlementConfig::default(),
    );
    assert!(matches!(
        result,
        Err(SettlementError::NonFiniteBalance { ref player, .. }) if player == "A"
    ));
}

#[test]
fn test_rejects_zero_epsilon() {
    let config = SettlementConfig {
        epsilon: 0.0,
        ..SettlementConfig::default()
    };
    assert_eq!(
        settle(&[], &config),
        Err(SettlementError::InvalidEpsilon(0.0))
    );
}

// ============================================================================
// Session Integration
// ============================================================================

#[test]
fn test_settle_session_uses_player_ids() {
    let mut session = Session::start(["Alice", "Bob", "Carol"], 20.0).unwrap();
    let ids: Vec<String> = session.players().iter().map(|p| p.id.clone()).collect();

    session.add_funds(&ids[1], 10.0).unwrap();
    session.record_cash_out(&ids[0], 50.0).unwrap();
    session.record_cash_out(&ids[1], 0.0).unwrap();
    session.record_cash_out(&ids[2], 20.0).unwrap();
    session.verify_tally().unwrap();

    let outcome = settle_session(&session, &SettlementConfig::default()).unwrap();
    assert_eq!(
        payments(outcome.transactions()),
        vec![(ids[1].clone(), ids[0].clone(), 30.0)]
    );
}
