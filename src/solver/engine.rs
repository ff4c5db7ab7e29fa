//! Tick-based Wave Function Collapse solver over a rectangular grid of
//! tile-atlas variants.
//!
//! There is no internal timer: `start`/`pause` only flip [`EngineState`],
//! and the caller drives progress by calling [`SolverEngine::step`]
//! (directly, or repeatedly while [`SolverEngine::state`] is
//! [`EngineState::Running`]).

use super::cell::{Cell, EntropyCache};
use crate::atlas::Atlas;
use crate::err::SolverError;
use crate::transform::Side;
use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::collections::BTreeSet;

/// Lifecycle state of a [`SolverEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EngineState {
  Idle,
  Running,
  Paused,
  Finished,
  Contradiction,
}

/// Rust-native replacement for the original's Qt signals: a listener with
/// one default no-op method per event. Register with
/// [`SolverEngine::add_observer`].
pub trait SolverObserver {
  fn cell_collapsed(&mut self, _x: usize, _y: usize, _tile: &str) {}
  fn cell_updated(&mut self, _x: usize, _y: usize) {}
  fn contradiction_found(&mut self, _x: usize, _y: usize) {}
  fn state_changed(&mut self, _state: EngineState) {}
  fn finished(&mut self, _success: bool) {}
  fn progress_updated(&mut self, _collapsed: usize, _total: usize) {}
}

const DIRECTIONS: [(isize, isize, Side); 4] = [
  (-1, 0, Side::Left),
  (1, 0, Side::Right),
  (0, -1, Side::Top),
  (0, 1, Side::Bottom),
];

/// A cell's full state, enough to reconstruct a [`SolverEngine`] exactly
/// via [`SolverEngine::from_snapshot`] — used by `.tm` grid I/O.
#[derive(Debug, Clone)]
pub struct CellSnapshot {
  pub x: usize,
  pub y: usize,
  pub tile_id: Option<String>,
  pub locked: bool,
  pub possibilities: BTreeSet<String>,
}

pub struct SolverEngine {
  atlas: Atlas,
  width: usize,
  height: usize,
  cells: Vec<Cell>,
  entropy_cache: EntropyCache,
  state: EngineState,
  collapsed_count: usize,
  total_cells: usize,
  rng: ChaCha20Rng,
  seed: u64,
  observers: Vec<Box<dyn SolverObserver>>,
}

impl SolverEngine {
  /// Builds an engine over `atlas`, with every cell initialized to the
  /// full enabled-variant set. `seed` fixes the RNG for reproducible
  /// runs; `None` draws a fresh seed from system entropy.
  pub fn new(atlas: Atlas, width: usize, height: usize, seed: Option<u64>) -> Self {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let rng = ChaCha20Rng::seed_from_u64(seed);

    let mut engine = Self {
      atlas,
      width,
      height,
      cells: Vec::new(),
      entropy_cache: EntropyCache::new(0),
      state: EngineState::Idle,
      collapsed_count: 0,
      total_cells: width * height,
      rng,
      seed,
      observers: Vec::new(),
    };
    engine.initialize();
    engine
  }

  pub fn add_observer(&mut self, observer: Box<dyn SolverObserver>) {
    self.observers.push(observer);
  }

  pub fn state(&self) -> EngineState {
    self.state
  }

  pub fn seed(&self) -> u64 {
    self.seed
  }

  pub fn width(&self) -> usize {
    self.width
  }

  pub fn height(&self) -> usize {
    self.height
  }

  pub fn cell(&self, x: usize, y: usize) -> Option<&Cell> {
    self.index_of(x, y).map(|i| &self.cells[i])
  }

  pub fn atlas(&self) -> &Atlas {
    &self.atlas
  }

  /// A full, order-independent snapshot of every cell's current state.
  pub fn snapshot(&self) -> Vec<CellSnapshot> {
    self
      .cells
      .iter()
      .map(|c| CellSnapshot {
        x: c.x,
        y: c.y,
        tile_id: c.collapsed_tile.clone(),
        locked: c.locked,
        possibilities: c.possibilities.clone(),
      })
      .collect()
  }

  /// Builds an engine whose cells are exactly `cells`, bypassing the
  /// default full-possibility initialization. Used to restore a grid
  /// loaded from a `.tm` archive; entries for positions not present in
  /// `cells` keep the default full possibility set.
  pub fn from_snapshot(
    atlas: Atlas,
    width: usize,
    height: usize,
    seed: Option<u64>,
    cells: Vec<CellSnapshot>,
  ) -> Result<Self, SolverError> {
    let mut engine = Self::new(atlas, width, height, seed);
    for snap in cells {
      let index = engine.index_of(snap.x, snap.y).ok_or(SolverError::OutOfBounds {
        x: snap.x,
        y: snap.y,
        width,
        height,
      })?;
      let cell = &mut engine.cells[index];
      cell.collapsed_tile = snap.tile_id;
      cell.locked = snap.locked;
      cell.possibilities = snap.possibilities;
    }
    engine.rebuild_entropy_cache();
    Ok(engine)
  }

  /// Recomputes the entropy cache and `collapsed_count` from the current
  /// cell contents. Needed after bulk mutation outside the normal
  /// collapse/propagate path (see [`Self::from_snapshot`]).
  fn rebuild_entropy_cache(&mut self) {
    let max_entropy = self.atlas.enabled_variant_ids().len();
    self.entropy_cache = EntropyCache::new(max_entropy);
    self.collapsed_count = 0;
    for (index, cell) in self.cells.iter().enumerate() {
      if cell.is_collapsed() {
        self.collapsed_count += 1;
      } else {
        self.entropy_cache.insert(cell.entropy(), index);
      }
    }
  }

  fn set_state(&mut self, state: EngineState) {
    if self.state != state {
      self.state = state;
      #[cfg(feature = "tracing")]
      tracing::info!(?state, "solver state changed");
      for observer in &mut self.observers {
        observer.state_changed(state);
      }
    }
  }

  fn index_of(&self, x: usize, y: usize) -> Option<usize> {
    (x < self.width && y < self.height).then(|| y * self.width + x)
  }

  /// (Re)populates every cell with the full possibility set. Locked cells
  /// are not preserved here; see [`reset`](Self::reset).
  fn initialize(&mut self) {
    let enabled = self.atlas.enabled_variant_ids();
    let max_entropy = enabled.len();

    self.cells.clear();
    self.entropy_cache = EntropyCache::new(max_entropy);
    self.collapsed_count = 0;
    self.total_cells = self.width * self.height;

    for y in 0..self.height {
      for x in 0..self.width {
        let index = self.cells.len();
        let possibilities: BTreeSet<String> = enabled.iter().cloned().collect();
        let entropy = possibilities.len();
        self.cells.push(Cell::new(x, y, possibilities));
        self.entropy_cache.insert(entropy, index);
      }
    }

    self.set_state(EngineState::Idle);
    for observer in &mut self.observers {
      observer.progress_updated(0, self.total_cells);
    }
  }

  /// Locks `(x, y)` to `tile_id`, collapsing it immediately and
  /// propagating the new constraint to its neighbors.
  pub fn lock_cell(&mut self, x: usize, y: usize, tile_id: &str) -> Result<(), SolverError> {
    let index = self.index_of(x, y).ok_or(SolverError::OutOfBounds {
      x,
      y,
      width: self.width,
      height: self.height,
    })?;
    if self.atlas.get_variant(tile_id).is_none() {
      return Err(SolverError::UnknownVariant(tile_id.to_string()));
    }

    let was_collapsed = self.cells[index].is_collapsed();
    let starting_entropy = self.cells[index].entropy();

    {
      let cell = &mut self.cells[index];
      cell.collapsed_tile = Some(tile_id.to_string());
      cell.locked = true;
      cell.possibilities = BTreeSet::from([tile_id.to_string()]);
    }
    if starting_entropy > 0 {
      self.entropy_cache.clear_entry(starting_entropy, index);
    }

    if !was_collapsed {
      self.collapsed_count += 1;
    }

    for observer in &mut self.observers {
      observer.cell_collapsed(x, y, tile_id);
      observer.progress_updated(self.collapsed_count, self.total_cells);
    }

    self.propagate(index)
  }

  /// Restores `(x, y)` to the full possibility set and unlocks it.
  /// Re-propagates from any already-collapsed neighbor so the grid
  /// stays consistent.
  pub fn unlock_cell(&mut self, x: usize, y: usize) -> Result<(), SolverError> {
    let index = self.index_of(x, y).ok_or(SolverError::OutOfBounds {
      x,
      y,
      width: self.width,
      height: self.height,
    })?;

    let was_collapsed = self.cells[index].is_collapsed();
    let was_contradiction = self.cells[index].possibilities.is_empty();
    let starting_entropy = self.cells[index].entropy();

    let enabled = self.atlas.enabled_variant_ids();
    {
      let cell = &mut self.cells[index];
      cell.locked = false;
      cell.collapsed_tile = None;
      cell.possibilities = enabled.into_iter().collect();
    }
    let new_entropy = self.cells[index].entropy();
    // `starting_entropy` reads 0 for both a collapsed cell (not tracked
    // in any bucket) and an aborted-propagation contradiction (tracked
    // in bucket 0); `set` no-ops removing an absent index either way.
    self.entropy_cache.set(starting_entropy, index, new_entropy);

    if was_collapsed {
      self.collapsed_count = self.collapsed_count.saturating_sub(1);
    }
    if (was_collapsed || was_contradiction)
      && matches!(self.state, EngineState::Finished | EngineState::Contradiction)
    {
      self.set_state(EngineState::Idle);
    }

    for observer in &mut self.observers {
      observer.cell_updated(x, y);
      observer.progress_updated(self.collapsed_count, self.total_cells);
    }

    // Loosen neighbors that were only constrained because this cell used
    // to be collapsed (e.g. a neighbor left empty by an aborted
    // propagation that this lock caused).
    self.propagate(index)?;

    // Then reconstrain (x, y) itself against whatever neighbors are
    // still collapsed.
    for (nx, ny, _) in self.neighbors_with_sides(x, y) {
      if self.cells[self.index_of(nx, ny).unwrap()].is_collapsed() {
        self.propagate(self.index_of(nx, ny).unwrap())?;
      }
    }
    Ok(())
  }

  pub fn start(&mut self) {
    if matches!(self.state, EngineState::Finished | EngineState::Contradiction) {
      return;
    }
    self.set_state(EngineState::Running);
  }

  pub fn pause(&mut self) {
    if self.state == EngineState::Running {
      self.set_state(EngineState::Paused);
    }
  }

  /// Runs exactly one collapse iteration; a no-op once finished or
  /// contradicted.
  pub fn step(&mut self) -> Result<(), SolverError> {
    if matches!(self.state, EngineState::Finished | EngineState::Contradiction) {
      return Ok(());
    }
    self.do_step()
  }

  /// Re-initializes the grid, then re-locks every previously-locked cell.
  pub fn reset(&mut self) -> Result<(), SolverError> {
    let locked: Vec<(usize, usize, String)> = self
      .cells
      .iter()
      .filter(|c| c.locked)
      .filter_map(|c| c.collapsed_tile.clone().map(|tile| (c.x, c.y, tile)))
      .collect();

    self.initialize();
    for (x, y, tile) in locked {
      self.lock_cell(x, y, &tile)?;
    }
    Ok(())
  }

  /// Clears every cell, including locked ones.
  pub fn clear_all(&mut self) {
    self.initialize();
  }

  fn do_step(&mut self) -> Result<(), SolverError> {
    if let Some(index) = self.entropy_cache.first_contradiction() {
      let (x, y) = (self.cells[index].x, self.cells[index].y);
      #[cfg(feature = "tracing")]
      tracing::warn!(x, y, "contradiction found at start of observation step");
      self.set_state(EngineState::Contradiction);
      for observer in &mut self.observers {
        observer.contradiction_found(x, y);
        observer.finished(false);
      }
      return Ok(());
    }

    let Some(bucket) = self.entropy_cache.lowest() else {
      self.set_state(EngineState::Finished);
      for observer in &mut self.observers {
        observer.finished(true);
      }
      return Ok(());
    };

    let index = *bucket.iter().choose(&mut self.rng).expect("non-empty bucket");
    let (x, y) = (self.cells[index].x, self.cells[index].y);

    let valid_now = self.valid_possibilities_for(x, y);
    if valid_now.is_empty() {
      self.set_state(EngineState::Contradiction);
      for observer in &mut self.observers {
        observer.contradiction_found(x, y);
        observer.finished(false);
      }
      return Ok(());
    }

    let tile_id = valid_now.iter().choose(&mut self.rng).cloned().unwrap();

    let starting_entropy = self.cells[index].entropy();
    {
      let cell = &mut self.cells[index];
      cell.collapsed_tile = Some(tile_id.clone());
      cell.possibilities = BTreeSet::from([tile_id.clone()]);
    }
    self.entropy_cache.clear_entry(starting_entropy, index);
    self.collapsed_count += 1;

    for observer in &mut self.observers {
      observer.cell_collapsed(x, y, &tile_id);
      observer.progress_updated(self.collapsed_count, self.total_cells);
    }

    self.propagate(index)
  }

  /// BFS constraint propagation starting from the uncollapsed neighbors
  /// of `start_index`. If a cell's possibility set becomes empty,
  /// propagation aborts immediately, leaving the cell uncollapsed and
  /// empty; the contradiction itself is only surfaced by the next
  /// observation step's scan (see [`do_step`](Self::do_step)).
  fn propagate(&mut self, start_index: usize) -> Result<(), SolverError> {
    let (start_x, start_y) = (self.cells[start_index].x, self.cells[start_index].y);

    let mut queue: std::collections::VecDeque<usize> = std::collections::VecDeque::new();
    for (nx, ny, _) in self.neighbors_with_sides(start_x, start_y) {
      let ni = self.index_of(nx, ny).unwrap();
      if !self.cells[ni].is_collapsed() {
        queue.push_back(ni);
      }
    }

    while let Some(index) = queue.pop_front() {
      if self.cells[index].is_collapsed() {
        continue;
      }
      let (x, y) = (self.cells[index].x, self.cells[index].y);

      let valid = self.valid_possibilities_for(x, y);
      if valid == self.cells[index].possibilities {
        continue;
      }

      let starting_entropy = self.cells[index].entropy();
      self.cells[index].possibilities = valid.clone();
      let new_entropy = self.cells[index].entropy();

      #[cfg(feature = "tracing")]
      tracing::debug!(x, y, remaining = new_entropy, "propagated constraint to cell");
      for observer in &mut self.observers {
        observer.cell_updated(x, y);
      }

      if starting_entropy != new_entropy {
        self.entropy_cache.set(starting_entropy, index, new_entropy);
      }

      if valid.is_empty() {
        // Abort: leave the cell uncollapsed with no possibilities. The
        // next observation step's scan is what turns this into a
        // CONTRADICTION state transition.
        return Ok(());
      }

      if valid.len() == 1 {
        let tile = valid.into_iter().next().unwrap();
        self.cells[index].collapsed_tile = Some(tile.clone());
        self.entropy_cache.clear_entry(new_entropy, index);
        self.collapsed_count += 1;

        for observer in &mut self.observers {
          observer.cell_collapsed(x, y, &tile);
          observer.progress_updated(self.collapsed_count, self.total_cells);
        }
      }

      for (nx, ny, _) in self.neighbors_with_sides(x, y) {
        let ni = self.index_of(nx, ny).unwrap();
        if !self.cells[ni].is_collapsed() {
          queue.push_back(ni);
        }
      }
    }

    Ok(())
  }

  /// The atlas-allowed tile set for `(x, y)` given its already-collapsed
  /// neighbors: for each, both "the neighbor allows me" and "I allow the
  /// neighbor" must hold.
  pub fn valid_possibilities_for(&self, x: usize, y: usize) -> BTreeSet<String> {
    let mut valid: BTreeSet<String> = self.atlas.enabled_variant_ids().into_iter().collect();

    for (nx, ny, side) in self.neighbors_with_sides(x, y) {
      let neighbor = &self.cells[self.index_of(nx, ny).unwrap()];
      let Some(neighbor_tile) = &neighbor.collapsed_tile else {
        continue;
      };

      let neighbor_allows: BTreeSet<String> = self
        .atlas
        .neighbors_of(neighbor_tile, side.opposite())
        .map(|(id, _)| id.to_string())
        .collect();
      let i_allow = self.atlas.tiles_allowing(side, neighbor_tile);

      valid = valid.intersection(&neighbor_allows).cloned().collect();
      valid = valid.intersection(&i_allow).cloned().collect();
    }

    valid
  }

  /// Checks every collapsed adjacency in the grid against the atlas rule
  /// table, returning one message per violation.
  pub fn validate_grid(&self) -> Vec<String> {
    let mut errors = Vec::new();

    for y in 0..self.height {
      for x in 0..self.width {
        let cell = &self.cells[self.index_of(x, y).unwrap()];
        let Some(tile_id) = &cell.collapsed_tile else {
          continue;
        };

        for (nx, ny, side) in self.neighbors_with_sides(x, y) {
          let neighbor = &self.cells[self.index_of(nx, ny).unwrap()];
          let Some(neighbor_tile) = &neighbor.collapsed_tile else {
            continue;
          };

          let allowed: BTreeSet<&str> = self.atlas.neighbors_of(tile_id, side).map(|(id, _)| id).collect();
          if !allowed.contains(neighbor_tile.as_str()) {
            errors.push(format!(
              "({x},{y}) '{tile_id}' does not allow '{neighbor_tile}' on {side:?}"
            ));
          }
        }
      }
    }

    errors
  }

  fn neighbors_with_sides(&self, x: usize, y: usize) -> Vec<(usize, usize, Side)> {
    let mut out = Vec::with_capacity(4);
    for (dx, dy, side) in DIRECTIONS {
      let nx = x as isize + dx;
      let ny = y as isize + dy;
      if nx >= 0 && ny >= 0 && (nx as usize) < self.width && (ny as usize) < self.height {
        out.push((nx as usize, ny as usize, side));
      }
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::atlas::BaseTile;

  fn checkerboard_atlas() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("black", "black.png", 16, 16)).unwrap();
    atlas.add_base_tile(BaseTile::new("white", "white.png", 16, 16)).unwrap();
    for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
      atlas.add_rule("black", side, "white", 100.0, false).unwrap();
      atlas.add_rule("white", side, "black", 100.0, false).unwrap();
    }
    atlas
  }

  fn run_to_completion(engine: &mut SolverEngine) {
    let mut guard = 0;
    while matches!(engine.state(), EngineState::Idle | EngineState::Running | EngineState::Paused) {
      engine.step().unwrap();
      guard += 1;
      assert!(guard < 10_000, "solver did not converge");
    }
  }

  fn xy_atlas() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("X", "x.png", 16, 16)).unwrap();
    atlas.add_base_tile(BaseTile::new("Y", "y.png", 16, 16)).unwrap();
    atlas
  }

  // S4 — solver uniqueness.
  #[test]
  fn s4_solver_uniqueness() {
    let mut atlas = xy_atlas();
    for side in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
      atlas.add_rule("X", side, "X", 100.0, false).unwrap();
      atlas.add_rule("Y", side, "Y", 100.0, false).unwrap();
    }

    let mut engine = SolverEngine::new(atlas, 3, 3, Some(42));
    engine.lock_cell(0, 0, "X").unwrap();
    engine.start();
    run_to_completion(&mut engine);

    assert_eq!(engine.state(), EngineState::Finished);
    for y in 0..3 {
      for x in 0..3 {
        assert_eq!(engine.cell(x, y).unwrap().collapsed_tile.as_deref(), Some("X"));
      }
    }
  }

  // S5 — contradiction: contradictions surface only at the next
  // observation step, never synchronously inside lock/propagate.
  #[test]
  fn s5_contradiction() {
    let mut atlas = xy_atlas();
    atlas.add_rule("X", Side::Right, "X", 100.0, false).unwrap();
    atlas.add_rule("X", Side::Left, "X", 100.0, false).unwrap();

    let mut engine = SolverEngine::new(atlas, 2, 1, Some(1));
    engine.lock_cell(0, 0, "Y").unwrap();
    assert_eq!(engine.state(), EngineState::Idle);
    assert!(engine.cell(1, 0).unwrap().possibilities.is_empty());

    engine.step().unwrap();
    assert_eq!(engine.state(), EngineState::Contradiction);
  }

  // S6 — unlock recovery.
  #[test]
  fn s6_unlock_recovery() {
    let mut atlas = xy_atlas();
    atlas.add_rule("X", Side::Right, "X", 100.0, false).unwrap();
    atlas.add_rule("X", Side::Left, "X", 100.0, false).unwrap();

    let mut engine = SolverEngine::new(atlas, 2, 1, Some(1));
    engine.lock_cell(0, 0, "Y").unwrap();
    engine.step().unwrap();
    assert_eq!(engine.state(), EngineState::Contradiction);

    engine.unlock_cell(0, 0).unwrap();
    assert_eq!(engine.state(), EngineState::Idle);
    assert_eq!(engine.cell(0, 0).unwrap().possibilities.len(), 2);
    assert_eq!(engine.cell(1, 0).unwrap().possibilities.len(), 2);
  }

  #[test]
  fn same_seed_produces_same_result() {
    let atlas = checkerboard_atlas();
    let mut a = SolverEngine::new(atlas.clone(), 5, 5, Some(7));
    let mut b = SolverEngine::new(atlas, 5, 5, Some(7));
    run_to_completion(&mut a);
    run_to_completion(&mut b);

    for y in 0..5 {
      for x in 0..5 {
        assert_eq!(a.cell(x, y).unwrap().collapsed_tile, b.cell(x, y).unwrap().collapsed_tile);
      }
    }
  }

  #[test]
  fn checkerboard_rules_force_alternating_grid() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 4, 4, Some(42));
    engine.start();
    run_to_completion(&mut engine);

    assert_eq!(engine.state(), EngineState::Finished);
    for y in 0..4 {
      for x in 0..4 {
        let cell = engine.cell(x, y).unwrap();
        let tile = cell.collapsed_tile.as_ref().unwrap();
        for (nx, ny, _) in engine.neighbors_with_sides(x, y) {
          let neighbor_tile = engine.cell(nx, ny).unwrap().collapsed_tile.clone().unwrap();
          assert_ne!(*tile, neighbor_tile);
        }
      }
    }
  }

  #[test]
  fn lock_cell_rejects_unknown_variant() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 2, 2, Some(1));
    let err = engine.lock_cell(0, 0, "lava").unwrap_err();
    assert!(matches!(err, SolverError::UnknownVariant(_)));
  }

  #[test]
  fn lock_cell_rejects_out_of_bounds() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 2, 2, Some(1));
    let err = engine.lock_cell(5, 5, "black").unwrap_err();
    assert!(matches!(err, SolverError::OutOfBounds { .. }));
  }

  #[test]
  fn reset_preserves_locked_cells() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 3, 3, Some(1));
    engine.lock_cell(0, 0, "black").unwrap();
    engine.start();
    run_to_completion(&mut engine);

    engine.reset().unwrap();

    assert_eq!(engine.cell(0, 0).unwrap().collapsed_tile.as_deref(), Some("black"));
    assert!(engine.cell(0, 0).unwrap().locked);
    assert_ne!(engine.state(), EngineState::Finished);
  }

  #[test]
  fn clear_all_drops_locked_cells() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 3, 3, Some(1));
    engine.lock_cell(0, 0, "black").unwrap();

    engine.clear_all();

    assert!(!engine.cell(0, 0).unwrap().is_collapsed());
    assert!(!engine.cell(0, 0).unwrap().locked);
  }

  #[test]
  fn validate_grid_reports_no_errors_for_consistent_checkerboard() {
    let atlas = checkerboard_atlas();
    let mut engine = SolverEngine::new(atlas, 3, 3, Some(3));
    engine.start();
    run_to_completion(&mut engine);
    assert!(engine.validate_grid().is_empty());
  }
}
