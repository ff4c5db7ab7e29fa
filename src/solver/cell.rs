//! Per-cell WFC state and the entropy-bucketed cache used to find the
//! next cell to collapse without scanning the whole grid.

use std::collections::BTreeSet;

/// State of a single grid cell.
#[derive(Debug, Clone)]
pub struct Cell {
  pub x: usize,
  pub y: usize,
  pub possibilities: BTreeSet<String>,
  pub collapsed_tile: Option<String>,
  /// User-placed constraint; survives [`reset`](super::engine::SolverEngine::reset).
  pub locked: bool,
}

impl Cell {
  pub fn new(x: usize, y: usize, possibilities: BTreeSet<String>) -> Self {
    Self {
      x,
      y,
      possibilities,
      collapsed_tile: None,
      locked: false,
    }
  }

  pub fn is_collapsed(&self) -> bool {
    self.collapsed_tile.is_some()
  }

  /// Remaining possibility count; 0 once collapsed.
  pub fn entropy(&self) -> usize {
    if self.is_collapsed() {
      0
    } else {
      self.possibilities.len()
    }
  }
}

/// Buckets uncollapsed cell indexes by entropy so the solver can find the
/// minimum-entropy set in O(1) instead of scanning every cell each step.
/// Bucket 0 holds contradictions (empty possibility sets left behind by
/// an aborted propagation); `lowest()` skips it deliberately — per the
/// solver's contract, those surface only via [`first_contradiction`],
/// checked once at the start of the next observation step, never mid-
/// propagation. Ascending `BTreeSet` order also gives ties a stable,
/// deterministic candidate order, required for a seeded run to
/// reproduce exactly.
///
/// [`first_contradiction`]: EntropyCache::first_contradiction
#[derive(Debug, Default)]
pub struct EntropyCache(Vec<BTreeSet<usize>>);

impl EntropyCache {
  pub fn new(max_entropy: usize) -> Self {
    Self(vec![BTreeSet::new(); max_entropy + 1])
  }

  pub fn lowest(&self) -> Option<&BTreeSet<usize>> {
    self.0.iter().skip(1).find(|bucket| !bucket.is_empty())
  }

  /// Smallest index currently sitting in the contradiction bucket, if
  /// any — mirrors the scan order of a row-major grid traversal.
  pub fn first_contradiction(&self) -> Option<usize> {
    self.0[0].iter().next().copied()
  }

  pub fn insert(&mut self, entropy: usize, index: usize) {
    self.0[entropy].insert(index);
  }

  pub fn set(&mut self, old_entropy: usize, index: usize, new_entropy: usize) {
    self.0[old_entropy].remove(&index);
    self.0[new_entropy].insert(index);
  }

  pub fn clear_entry(&mut self, entropy: usize, index: usize) {
    self.0[entropy].remove(&index);
  }
}
