//! Chip value chains
//!
//! A chain fixes the dollar value of all five denominations. The smallest chip
//! is worth the small blind; each larger chip is the previous one times a
//! step drawn from the configured multiplier set. With steps {2, 4, 5} that is
//! 3^4 = 81 chains, every one strictly increasing.

use crate::models::chip::DENOMINATIONS;

/// One assignment of dollar values to the five denominations
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChain {
    /// Step from the previous denomination (first entry is always 1)
    pub individual_multipliers: [u32; DENOMINATIONS],

    /// Value of each denomination as a multiple of the smallest
    pub multipliers: [u32; DENOMINATIONS],

    /// Dollar value of each denomination
    pub chip_values: [f64; DENOMINATIONS],
}

impl ValueChain {
    /// `None` when the largest denomination's multiple does not fit a `u32`
    fn new(base_value: f64, steps: [u32; DENOMINATIONS - 1]) -> Option<Self> {
        let mut individual_multipliers = [1; DENOMINATIONS];
        let mut multipliers = [1u32; DENOMINATIONS];
        for (k, step) in steps.iter().enumerate() {
            individual_multipliers[k + 1] = *step;
            multipliers[k + 1] = multipliers[k].checked_mul(*step)?;
        }
        let chip_values = multipliers.map(|m| base_value * f64::from(m));

        Some(Self {
            individual_multipliers,
            multipliers,
            chip_values,
        })
    }
}

/// Every chain rooted at `base_value`
///
/// The step for the second denomination varies slowest, the step for the
/// largest denomination fastest. Chains whose multiples overflow `u32` are
/// skipped; `SolverConfig::validate` rejects step sets that would produce one.
pub fn value_chains(base_value: f64, steps: &[u32]) -> Vec<ValueChain> {
    let n = steps.len();
    if n == 0 {
        return Vec::new();
    }
    let count = n.pow((DENOMINATIONS - 1) as u32);

    (0..count)
        .filter_map(|index| {
            let mut digits = [0u32; DENOMINATIONS - 1];
            let mut rest = index;
            for slot in digits.iter_mut().rev() {
                *slot = steps[rest % n];
                rest /= n;
            }
            ValueChain::new(base_value, digits)
        })
        .collect()
}
