//! Atlas completeness checks: every enabled tile should have at least
//! one neighbor on each side, with per-side weights summing to 100.

use crate::atlas::Atlas;
use crate::transform::Side;
use std::collections::HashMap;

const WEIGHT_TOLERANCE: f64 = 0.01;
const FULL_WEIGHT: f64 = 100.0;

/// Validation result for a single tile.
#[derive(Debug, Clone, Default)]
pub struct TileValidation {
  pub tile_id: String,
  pub missing_sides: Vec<Side>,
  /// side -> total weight, only present when the total isn't ~100.
  pub incomplete_sides: HashMap<Side, f64>,
}

impl TileValidation {
  pub fn is_valid(&self) -> bool {
    self.missing_sides.is_empty() && self.incomplete_sides.is_empty()
  }

  pub fn has_warnings(&self) -> bool {
    !self.incomplete_sides.is_empty()
  }

  pub fn has_errors(&self) -> bool {
    !self.missing_sides.is_empty()
  }
}

/// Overall validation result for an atlas.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
  pub tile_results: HashMap<String, TileValidation>,
  /// Tiles with no rules at all on any side.
  pub orphan_tiles: Vec<String>,
}

impl ValidationResult {
  pub fn is_valid(&self) -> bool {
    self.orphan_tiles.is_empty() && self.tile_results.values().all(TileValidation::is_valid)
  }

  pub fn error_count(&self) -> usize {
    self.orphan_tiles.len() + self.tile_results.values().map(|tr| tr.missing_sides.len()).sum::<usize>()
  }

  pub fn warning_count(&self) -> usize {
    self.tile_results.values().map(|tr| tr.incomplete_sides.len()).sum()
  }

  /// Tile ids with any issue, orphan or otherwise, sorted.
  pub fn tiles_with_issues(&self) -> Vec<String> {
    let mut issues: Vec<String> = self.orphan_tiles.clone();
    for (tile_id, tr) in &self.tile_results {
      if !tr.is_valid() && !issues.contains(tile_id) {
        issues.push(tile_id.clone());
      }
    }
    issues.sort();
    issues.dedup();
    issues
  }
}

/// Checks every side of every tile (only `enabled` ones when
/// `enabled_only`) for a complete, fully-weighted rule set.
pub fn validate_atlas(atlas: &Atlas, enabled_only: bool) -> ValidationResult {
  let mut result = ValidationResult::default();

  for tile in atlas.variants.iter().filter(|t| !enabled_only || t.enabled) {
    let mut tile_result = TileValidation {
      tile_id: tile.id.clone(),
      ..Default::default()
    };
    let mut has_any_rules = false;

    for side in all_sides() {
      let rules = atlas.get_rules_for_tile(&tile.id, Some(side));
      if rules.is_empty() {
        tile_result.missing_sides.push(side);
      } else {
        has_any_rules = true;
        let total_weight: f64 = rules.iter().map(|r| r.weight).sum();
        if (total_weight - FULL_WEIGHT).abs() > WEIGHT_TOLERANCE {
          tile_result.incomplete_sides.insert(side, total_weight);
        }
      }
    }

    if !has_any_rules {
      result.orphan_tiles.push(tile.id.clone());
    }
    result.tile_results.insert(tile.id.clone(), tile_result);
  }

  result
}

pub fn side_weight_total(atlas: &Atlas, tile_id: &str, side: Side) -> f64 {
  atlas.get_rules_for_tile(tile_id, Some(side)).iter().map(|r| r.weight).sum()
}

/// Rescales every rule on `tile_id`'s `side` so their weights sum to 100.
/// A no-op if there are no rules, or their total is non-positive.
pub fn normalize_side_weights(atlas: &mut Atlas, tile_id: &str, side: Side) {
  let total: f64 = atlas.get_rules_for_tile(tile_id, Some(side)).iter().map(|r| r.weight).sum();
  if total <= 0.0 {
    return;
  }

  let scale = FULL_WEIGHT / total;
  let mut touched = false;
  for rule in atlas.rules.iter_mut() {
    if rule.tile_id == tile_id && rule.side == side {
      rule.weight *= scale;
      touched = true;
    }
  }
  if touched {
    atlas.modified = true;
  }
}

fn all_sides() -> [Side; 4] {
  [Side::Top, Side::Right, Side::Bottom, Side::Left]
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::atlas::BaseTile;

  fn fully_ringed_atlas() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    for side in all_sides() {
      atlas.add_rule("grass", side, "grass", 100.0, false).unwrap();
    }
    atlas
  }

  #[test]
  fn fully_ringed_tile_is_valid() {
    let atlas = fully_ringed_atlas();
    let result = validate_atlas(&atlas, true);
    assert!(result.is_valid());
    assert_eq!(result.error_count(), 0);
    assert_eq!(result.warning_count(), 0);
  }

  #[test]
  fn missing_side_is_an_error() {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    atlas.add_rule("grass", Side::Top, "grass", 100.0, false).unwrap();

    let result = validate_atlas(&atlas, true);
    assert!(!result.is_valid());
    let tr = &result.tile_results["grass"];
    assert!(tr.missing_sides.contains(&Side::Bottom));
    assert!(tr.has_errors());
  }

  #[test]
  fn underweighted_side_is_a_warning_not_an_error() {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    for side in all_sides() {
      atlas.add_rule("grass", side, "grass", 50.0, false).unwrap();
    }

    let result = validate_atlas(&atlas, true);
    assert!(!result.is_valid());
    let tr = &result.tile_results["grass"];
    assert!(tr.has_warnings());
    assert!(!tr.has_errors());
    assert_eq!(tr.incomplete_sides[&Side::Top], 50.0);
  }

  #[test]
  fn tile_with_no_rules_is_orphan() {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("lonely", "lonely.png", 16, 16)).unwrap();

    let result = validate_atlas(&atlas, true);
    assert!(result.orphan_tiles.contains(&"lonely".to_string()));
  }

  #[test]
  fn normalize_side_weights_rescales_to_100() {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    atlas.add_base_tile(BaseTile::new("water", "water.png", 16, 16)).unwrap();
    atlas.add_rule("grass", Side::Top, "grass", 30.0, false).unwrap();
    atlas.add_rule("grass", Side::Top, "water", 30.0, false).unwrap();

    normalize_side_weights(&mut atlas, "grass", Side::Top);

    let total = side_weight_total(&atlas, "grass", Side::Top);
    assert!((total - 100.0).abs() < WEIGHT_TOLERANCE);
  }

  #[test]
  fn normalize_side_weights_noop_without_rules() {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    normalize_side_weights(&mut atlas, "grass", Side::Top);
    assert!(!atlas.modified);
  }
}
