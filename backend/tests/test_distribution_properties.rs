//! Chip Distribution Property Tests
//!
//! Random buy-ins, blinds, table sizes and inventories; every returned stack
//! must be dealable and worth exactly the buy-in.

use cashgame_core_rs::{
    find_all_solutions, find_best_solution, ChipDistributionSolver, Solution, SolverConfig,
};
use proptest::prelude::*;

const BIG_BLINDS: [f64; 5] = [0.25, 0.5, 1.0, 2.0, 5.0];

fn check_solution(
    solution: &Solution,
    buy_in: f64,
    players: u32,
    available: [u32; 5],
) -> Result<(), TestCaseError> {
    let config = SolverConfig::default();

    prop_assert!((solution.total_value - buy_in).abs() < config.value_tolerance);
    prop_assert!(solution.total_chips >= config.min_chips_per_player);
    prop_assert!(solution.total_chips <= config.max_chips_per_player);
    prop_assert!(solution.distribution[0] >= config.min_small_chips(solution.total_chips));

    // Strictly decreasing while in use, zero afterwards
    let used = solution.colors_used();
    prop_assert!(used >= 2);
    for pair in solution.distribution[..used].windows(2) {
        prop_assert!(pair[0] > pair[1]);
    }
    prop_assert!(solution.distribution[used..].iter().all(|&q| q == 0));

    for (i, needed) in solution.chips_required(players).iter().enumerate() {
        prop_assert!(*needed <= available[i]);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_stack_is_exact_and_dealable(
        buy_in in 1u32..=200,
        blind in 0usize..BIG_BLINDS.len(),
        players in 1u32..=10,
        available in prop::array::uniform5(0u32..=400),
    ) {
        let buy_in = f64::from(buy_in);
        let solutions = find_all_solutions(buy_in, BIG_BLINDS[blind], players, available).unwrap();

        for solution in &solutions {
            check_solution(solution, buy_in, players, available)?;
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn best_is_a_closest_candidate(
        buy_in in 1u32..=200,
        blind in 0usize..BIG_BLINDS.len(),
        players in 1u32..=10,
        available in prop::array::uniform5(0u32..=400),
    ) {
        let solutions =
            find_all_solutions(f64::from(buy_in), BIG_BLINDS[blind], players, available).unwrap();
        let preferred = ChipDistributionSolver::default().config().preferred_total_chips;

        match find_best_solution(&solutions) {
            None => prop_assert!(solutions.is_empty()),
            Some(best) => {
                prop_assert!(solutions.contains(&best));
                let closest = solutions
                    .iter()
                    .map(|s| s.total_chips.abs_diff(preferred))
                    .min()
                    .unwrap_or_default();
                prop_assert_eq!(best.total_chips.abs_diff(preferred), closest);
            }
        }
    }
}
