//! Auto-propagation of adjacency rules across tile transform variants.
//!
//! Given a manual rule between two variants, derive the equivalent rule
//! for every other variant pair related by the same relative transform.
//! Operates only on variants that already exist in the atlas; see
//! [`ensure_variants_for_rule`] for variant creation.

use crate::atlas::{Atlas, Rule};
use crate::err::AtlasError;
use crate::transform::{Side, Transform};

/// Propagates `rule` to every existing variant of both tiles' bases,
/// creating `auto_generated = true` rules. Returns the newly created
/// rules (not including `rule` itself).
pub fn propagate_rule(atlas: &mut Atlas, rule: &Rule) -> Result<Vec<Rule>, AtlasError> {
  let source = atlas
    .get_variant(&rule.tile_id)
    .ok_or_else(|| AtlasError::UnknownVariant(rule.tile_id.clone()))?
    .clone();
  let target = atlas
    .get_variant(&rule.neighbor_id)
    .ok_or_else(|| AtlasError::UnknownVariant(rule.neighbor_id.clone()))?
    .clone();

  let source_variants: Vec<_> = atlas
    .get_tiles_for_base(&source.base_tile_id)
    .into_iter()
    .cloned()
    .collect();
  let target_variants: Vec<_> = atlas
    .get_tiles_for_base(&target.base_tile_id)
    .into_iter()
    .cloned()
    .collect();

  let source_transform = source.transform();
  let target_transform = target.transform();

  let mut new_rules = Vec::new();

  for src_variant in &source_variants {
    if src_variant.id == rule.tile_id {
      continue;
    }

    let src_var_transform = src_variant.transform();
    let relative_transform = source_transform.inverse().compose(&src_var_transform);
    let new_side = transform_side_between(rule.side, source_transform, src_var_transform);
    let target_var_transform = target_transform.compose(&relative_transform);

    let target_variant = target_variants
      .iter()
      .find(|tv| tv.transform() == target_var_transform);

    if let Some(target_variant) = target_variant {
      let new_rule = atlas.add_rule(&src_variant.id, new_side, &target_variant.id, rule.weight, true)?;
      new_rules.push(new_rule);
    }
  }

  Ok(new_rules)
}

/// Drops every auto-generated rule and re-derives the full set from the
/// current manual rules. Returns the number of rules created.
pub fn propagate_all(atlas: &mut Atlas) -> Result<usize, AtlasError> {
  let manual_rules: Vec<Rule> = atlas.rules.iter().filter(|r| !r.auto_generated).cloned().collect();
  atlas.remove_auto_rules();

  let mut total_new = 0;
  for rule in &manual_rules {
    total_new += propagate_rule(atlas, rule)?.len();
  }
  #[cfg(feature = "tracing")]
  tracing::debug!(manual = manual_rules.len(), derived = total_new, "propagated rule set");
  Ok(total_new)
}

/// Advisory: pre-creates the sibling variants `propagate_rule` would need
/// to fully propagate `rule`, consulting [`crate::atlas::Settings`].
/// Never removes a variant; both tiles' bases receive the same set of
/// transforms.
pub fn ensure_variants_for_rule(atlas: &mut Atlas, rule: &Rule) -> Result<Vec<crate::atlas::Tile>, AtlasError> {
  let source_base = atlas
    .get_variant(&rule.tile_id)
    .ok_or_else(|| AtlasError::UnknownVariant(rule.tile_id.clone()))?
    .base_tile_id
    .clone();
  let target_base = atlas
    .get_variant(&rule.neighbor_id)
    .ok_or_else(|| AtlasError::UnknownVariant(rule.neighbor_id.clone()))?
    .base_tile_id
    .clone();

  let mut transforms = Vec::new();
  let rotations = atlas.settings.auto_propagate_rotations;
  let mirrors = atlas.settings.auto_propagate_mirrors;

  if rotations {
    transforms.push(Transform::new(90, false, false));
    transforms.push(Transform::new(180, false, false));
    transforms.push(Transform::new(270, false, false));
  }
  if mirrors {
    transforms.push(Transform::new(0, true, false));
    transforms.push(Transform::new(0, false, true));
  }
  if rotations && mirrors {
    for rotation in [90, 180, 270] {
      transforms.push(Transform::new(rotation, true, false));
      transforms.push(Transform::new(rotation, false, true));
    }
    transforms.push(Transform::new(0, true, true));
    for rotation in [90, 180, 270] {
      transforms.push(Transform::new(rotation, true, true));
    }
  }

  let mut new_tiles = Vec::new();
  for base_id in [source_base, target_base] {
    for transform in &transforms {
      let id = crate::atlas::Tile::make_id(&base_id, *transform);
      if atlas.get_variant(&id).is_none() {
        new_tiles.push(atlas.add_variant(&base_id, *transform)?);
      }
    }
  }

  Ok(new_tiles)
}

/// Which side in `to_transform`'s frame corresponds to `side` in
/// `from_transform`'s frame, both relative to the same base tile.
fn transform_side_between(side: Side, from_transform: Transform, to_transform: Transform) -> Side {
  let original_side = from_transform.inverse_side(side);
  to_transform.apply_to_side(original_side)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::atlas::BaseTile;

  fn sample() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("path", "path.png", 16, 16)).unwrap();
    atlas.add_base_tile(BaseTile::new("grass", "grass.png", 16, 16)).unwrap();
    atlas
  }

  // S3 — propagation.
  #[test]
  fn s3_propagate_rule_covers_rotated_variants() {
    let mut atlas = sample();
    atlas.add_variant("path", Transform::new(90, false, false)).unwrap();
    atlas.add_variant("grass", Transform::new(90, false, false)).unwrap();

    let rule = atlas.add_rule("path", Side::Right, "grass", 100.0, false).unwrap();
    let new_rules = propagate_rule(&mut atlas, &rule).unwrap();

    assert!(!new_rules.is_empty());
    assert!(new_rules.iter().all(|r| r.auto_generated));

    // path_r90 rotates Right -> Bottom, and the propagated neighbor must
    // be grass_r90 (the identically-rotated sibling of grass).
    let derived = atlas.get_rule("path_r90", Side::Bottom, "grass_r90");
    assert!(derived.is_some());
  }

  #[test]
  fn propagate_rule_skips_without_matching_target_variant() {
    let mut atlas = sample();
    atlas.add_variant("path", Transform::new(90, false, false)).unwrap();
    // grass has no r90 variant yet.

    let rule = atlas.add_rule("path", Side::Right, "grass", 100.0, false).unwrap();
    let new_rules = propagate_rule(&mut atlas, &rule).unwrap();
    assert!(new_rules.is_empty());
  }

  #[test]
  fn propagate_all_replaces_auto_generated_set() {
    let mut atlas = sample();
    atlas.add_variant("path", Transform::new(90, false, false)).unwrap();
    atlas.add_variant("grass", Transform::new(90, false, false)).unwrap();
    atlas.add_rule("path", Side::Right, "grass", 100.0, false).unwrap();

    let first_pass = propagate_all(&mut atlas).unwrap();
    assert!(first_pass > 0);
    let manual_and_auto = atlas.rules.len();

    let second_pass = propagate_all(&mut atlas).unwrap();
    assert_eq!(first_pass, second_pass);
    assert_eq!(manual_and_auto, atlas.rules.len());
  }

  #[test]
  fn ensure_variants_for_rule_respects_settings() {
    let mut atlas = sample();
    atlas.settings.auto_propagate_rotations = true;
    atlas.settings.auto_propagate_mirrors = false;

    let rule = atlas.add_rule("path", Side::Right, "grass", 100.0, false).unwrap();
    let created = ensure_variants_for_rule(&mut atlas, &rule).unwrap();

    assert!(created.iter().all(|t| t.flip_x == false && t.flip_y == false));
    assert!(atlas.get_variant("path_r90").is_some());
    assert!(atlas.get_variant("path_fx").is_none());
  }
}
