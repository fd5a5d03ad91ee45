//! Solution cache
//!
//! The setup screen re-runs the solver whenever the host nudges a field back
//! and forth. Requests are keyed bit-exactly, so a hit returns precisely what
//! a fresh search would. The cache holds at most `limit` requests and drops
//! the oldest one first.
//!
//! # Usage
//!
//! ```rust
//! use cashgame_core_rs::distribution::{ChipDistributionSolver, DistributionRequest, SolutionCache};
//!
//! let solver = ChipDistributionSolver::default();
//! let mut cache = SolutionCache::new();
//! let request = DistributionRequest::new(20.0, 1.0, 4, [400; 5]);
//!
//! let first = cache.get_or_solve(&solver, &request).unwrap().len();
//! let second = cache.get_or_solve(&solver, &request).unwrap().len();
//!
//! assert_eq!(first, second);
//! assert_eq!(cache.hits(), 1);
//! ```

use crate::distribution::solution::Solution;
use crate::distribution::solver::{ChipDistributionSolver, DistributionError, DistributionRequest};
use crate::models::chip::DENOMINATIONS;
use std::collections::{HashMap, VecDeque};

/// Requests kept by `SolutionCache::new`
pub const DEFAULT_CACHE_LIMIT: usize = 64;

/// Hashable identity of a request (f64 fields by bit pattern)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct RequestKey {
    buy_in: u64,
    big_blind: u64,
    player_count: u32,
    available_chips: [u32; DENOMINATIONS],
}

impl From<&DistributionRequest> for RequestKey {
    fn from(request: &DistributionRequest) -> Self {
        Self {
            buy_in: request.buy_in.to_bits(),
            big_blind: request.big_blind.to_bits(),
            player_count: request.player_count,
            available_chips: request.available_chips,
        }
    }
}

/// Memoized `find_all` results
///
/// One cache belongs to one solver configuration; call `clear` if the
/// configuration changes.
#[derive(Debug, Clone)]
pub struct SolutionCache {
    entries: HashMap<RequestKey, Vec<Solution>>,
    /// Keys in insertion order, oldest first
    order: VecDeque<RequestKey>,
    limit: usize,
    hits: usize,
    misses: usize,
}

impl Default for SolutionCache {
    fn default() -> Self {
        Self::with_limit(DEFAULT_CACHE_LIMIT)
    }
}

impl SolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `limit` requests (at least one)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            limit: limit.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Cached solutions for `request`, searching on a miss
    ///
    /// Invalid requests are never cached.
    pub fn get_or_solve(
        &mut self,
        solver: &ChipDistributionSolver,
        request: &DistributionRequest,
    ) -> Result<&[Solution], DistributionError> {
        let key = RequestKey::from(request);

        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            let solutions = solver.find_all(request)?;
            self.misses += 1;
            if self.entries.len() >= self.limit {
                if let Some(oldest) = self.order.pop_front() {
                    self.entries.remove(&oldest);
                    log::debug!("evicted oldest cached request");
                }
            }
            log::debug!(
                "cached {} solutions ({} entries)",
                solutions.len(),
                self.entries.len() + 1
            );
            self.entries.insert(key, solutions);
            self.order.push_back(key);
        }

        Ok(self.entries.get(&key).map(Vec::as_slice).unwrap_or_default())
    }

    /// Solutions already cached for `request`
    pub fn get(&self, request: &DistributionRequest) -> Option<&[Solution]> {
        self.entries
            .get(&RequestKey::from(request))
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
