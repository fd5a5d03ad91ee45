//! Picking stacks out of the candidate set
//!
//! `find_best_solution` encodes the table's taste: the preferred stack size,
//! and at that size fewer colours first. `varied_solutions` offers a few
//! alternative shapes for hosts who want something different.

use crate::distribution::solution::Solution;
use crate::models::chip::DENOMINATIONS;
use serde::{Deserialize, Serialize};

fn distance(solution: &Solution, preferred: u32) -> u32 {
    solution.total_chips.abs_diff(preferred)
}

/// Candidates ordered by closeness to `preferred` chips (stable)
fn by_distance(solutions: &[Solution], preferred: u32) -> Vec<&Solution> {
    let mut ordered: Vec<&Solution> = solutions.iter().collect();
    ordered.sort_by_key(|s| distance(s, preferred));
    ordered
}

/// Choose the most practical stack
///
/// In order, the first non-empty group wins:
/// 1. exactly `preferred` chips using at most 3 colours
/// 2. exactly `preferred` chips using exactly 4 colours
/// 3. exactly `preferred` chips
/// 4. whatever is closest to `preferred`
///
/// Returns `None` for an empty candidate set. The input is not reordered.
pub fn find_best_solution(solutions: &[Solution], preferred: u32) -> Option<Solution> {
    let ordered = by_distance(solutions, preferred);

    let preference: [&dyn Fn(&Solution) -> bool; 3] = [
        &|s: &Solution| s.total_chips == preferred && s.colors_used() <= 3,
        &|s: &Solution| s.total_chips == preferred && s.colors_used() == 4,
        &|s: &Solution| s.total_chips == preferred,
    ];

    preference
        .iter()
        .find_map(|accepts| ordered.iter().find(|s| accepts(**s)))
        .or_else(|| ordered.first())
        .map(|s| (*s).clone())
}

/// Alternative stack shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variety {
    /// Around 25 chips
    Standard,

    /// 20 chips or fewer
    Compact,

    /// 28 chips or more
    MoreSmallChips,

    /// No black chips, but green is used
    SkipBlack,

    /// Exactly three colours
    ThreeColors,
}

impl Variety {
    pub const ALL: [Variety; 5] = [
        Variety::Standard,
        Variety::Compact,
        Variety::MoreSmallChips,
        Variety::SkipBlack,
        Variety::ThreeColors,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Variety::Standard => "Standard",
            Variety::Compact => "Compact",
            Variety::MoreSmallChips => "More Small Chips",
            Variety::SkipBlack => "Skip Black",
            Variety::ThreeColors => "Three Colors",
        }
    }

    /// Stack size this variety aims for
    pub fn preferred_chips(&self) -> u32 {
        match self {
            Variety::Compact => 17,
            Variety::MoreSmallChips => 30,
            Variety::Standard | Variety::SkipBlack | Variety::ThreeColors => 25,
        }
    }

    pub fn accepts(&self, solution: &Solution) -> bool {
        let chips = solution.total_chips;
        match self {
            Variety::Standard => (23..=27).contains(&chips),
            Variety::Compact => chips <= 20,
            Variety::MoreSmallChips => chips >= 28,
            Variety::SkipBlack => {
                solution.distribution[DENOMINATIONS - 1] == 0
                    && solution.distribution[DENOMINATIONS - 2] > 0
            }
            Variety::ThreeColors => solution.colors_used() == 3,
        }
    }
}

/// A stack picked for one variety
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariedSolution {
    pub variety: Variety,
    pub solution: Solution,
}

/// Best stack for each variety that has any candidate
pub fn varied_solutions(solutions: &[Solution]) -> Vec<VariedSolution> {
    Variety::ALL
        .iter()
        .filter_map(|&variety| {
            solutions
                .iter()
                .filter(|s| variety.accepts(s))
                .min_by_key(|s| distance(s, variety.preferred_chips()))
                .map(|s| VariedSolution {
                    variety,
                    solution: s.clone(),
                })
        })
        .collect()
}
