//! In-memory catalog of base tiles, variants, and adjacency rules.
//!
//! Pure data with structural invariants enforced at every boundary:
//! every rule's `tile_id`/`neighbor_id` resolves to an existing variant,
//! and exactly one identity variant exists per base tile. Atlas
//! exclusively owns its base tiles, variants, and rules.

pub mod base_tile;
pub mod rule;
pub mod settings;
pub mod variant;

pub use base_tile::BaseTile;
pub use rule::{Rule, RuleKey};
pub use settings::Settings;
pub use variant::Tile;

use crate::err::AtlasError;
use crate::transform::{Side, Transform};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// `tile_id -> side -> neighbor_id -> weight` and
/// `side -> neighbor_id -> {tile_id}`, rebuilt eagerly whenever rules
/// change (see design note in SPEC_FULL.md §9).
#[derive(Debug, Default, Clone)]
struct RuleIndex {
  by_tile_side: HashMap<String, HashMap<Side, HashMap<String, f64>>>,
  by_side_neighbor: HashMap<Side, HashMap<String, HashSet<String>>>,
}

impl RuleIndex {
  fn rebuild(rules: &[Rule]) -> Self {
    let mut this = Self::default();
    for rule in rules {
      this
        .by_tile_side
        .entry(rule.tile_id.clone())
        .or_default()
        .entry(rule.side)
        .or_default()
        .insert(rule.neighbor_id.clone(), rule.weight);

      this
        .by_side_neighbor
        .entry(rule.side)
        .or_default()
        .entry(rule.neighbor_id.clone())
        .or_default()
        .insert(rule.tile_id.clone());
    }
    this
  }

  fn neighbors_of(&self, tile_id: &str, side: Side) -> impl Iterator<Item = (&str, f64)> {
    self
      .by_tile_side
      .get(tile_id)
      .and_then(|by_side| by_side.get(&side))
      .into_iter()
      .flat_map(|m| m.iter().map(|(id, w)| (id.as_str(), *w)))
  }

  /// Tiles `T` such that `(T, side, neighbor)` is a rule.
  fn tiles_allowing(&self, side: Side, neighbor: &str) -> HashSet<String> {
    self
      .by_side_neighbor
      .get(&side)
      .and_then(|m| m.get(neighbor))
      .cloned()
      .unwrap_or_default()
  }
}

/// Root container for all tile and rule data.
#[derive(Debug, Clone)]
pub struct Atlas {
  pub version: String,
  pub settings: Settings,
  pub base_tiles: Vec<BaseTile>,
  pub variants: Vec<Tile>,
  pub rules: Vec<Rule>,

  /// Transient: the archive this atlas was loaded from or last saved to.
  pub file_path: Option<PathBuf>,
  /// Transient: whether any mutation has happened since the last save.
  pub modified: bool,

  index: RuleIndex,
}

impl Default for Atlas {
  fn default() -> Self {
    Self {
      version: "1.0".to_string(),
      settings: Settings::default(),
      base_tiles: Vec::new(),
      variants: Vec::new(),
      rules: Vec::new(),
      file_path: None,
      modified: false,
      index: RuleIndex::default(),
    }
  }
}

impl Atlas {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn reindex(&mut self) {
    self.index = RuleIndex::rebuild(&self.rules);
  }

  // --- Base tile operations ---

  pub fn get_base_tile(&self, id: &str) -> Option<&BaseTile> {
    self.base_tiles.iter().find(|bt| bt.id == id)
  }

  /// Appends `bt` and creates its identity variant. Fails if `bt.id`
  /// already exists.
  pub fn add_base_tile(&mut self, bt: BaseTile) -> Result<(), AtlasError> {
    if self.get_base_tile(&bt.id).is_some() {
      return Err(AtlasError::DuplicateBaseTile(bt.id));
    }
    if !bt.is_square() {
      return Err(AtlasError::NonSquareBaseTile {
        id: bt.id,
        width: bt.width,
        height: bt.height,
      });
    }
    let identity = Tile::from_base(bt.id.clone(), Transform::IDENTITY);
    self.base_tiles.push(bt);
    self.variants.push(identity);
    self.modified = true;
    Ok(())
  }

  /// Removes the base, all its variants, and every rule touching any
  /// removed variant.
  pub fn remove_base_tile(&mut self, id: &str) -> Result<(), AtlasError> {
    if self.get_base_tile(id).is_none() {
      return Err(AtlasError::UnknownBaseTile(id.to_string()));
    }

    self.base_tiles.retain(|bt| bt.id != id);

    let removed: HashSet<String> = self
      .variants
      .iter()
      .filter(|v| v.base_tile_id == id)
      .map(|v| v.id.clone())
      .collect();
    self.variants.retain(|v| v.base_tile_id != id);
    self
      .rules
      .retain(|r| !removed.contains(&r.tile_id) && !removed.contains(&r.neighbor_id));

    self.modified = true;
    self.reindex();
    Ok(())
  }

  // --- Variant operations ---

  pub fn get_variant(&self, id: &str) -> Option<&Tile> {
    self.variants.iter().find(|v| v.id == id)
  }

  pub fn get_tiles_for_base(&self, base_id: &str) -> Vec<&Tile> {
    self.variants.iter().filter(|v| v.base_tile_id == base_id).collect()
  }

  /// Idempotent: returns the existing variant if `transform` already has
  /// one for `base_id`, otherwise creates it.
  pub fn add_variant(&mut self, base_id: &str, transform: Transform) -> Result<Tile, AtlasError> {
    if self.get_base_tile(base_id).is_none() {
      return Err(AtlasError::UnknownBaseTile(base_id.to_string()));
    }

    let id = Tile::make_id(base_id, transform);
    if let Some(existing) = self.get_variant(&id) {
      return Ok(existing.clone());
    }

    let variant = Tile::from_base(base_id, transform);
    self.variants.push(variant.clone());
    self.modified = true;
    Ok(variant)
  }

  /// Forbidden on identity variants. Cascades rules referencing `id`.
  pub fn remove_variant(&mut self, id: &str) -> Result<(), AtlasError> {
    let variant = self
      .get_variant(id)
      .ok_or_else(|| AtlasError::UnknownVariant(id.to_string()))?;

    if variant.is_identity() {
      return Err(AtlasError::CannotRemoveIdentityVariant(id.to_string()));
    }

    self.variants.retain(|v| v.id != id);
    self.rules.retain(|r| r.tile_id != id && r.neighbor_id != id);
    self.modified = true;
    self.reindex();
    Ok(())
  }

  // --- Rule operations ---

  /// Upserts by the `(tile_id, side, neighbor_id)` key.
  pub fn add_rule(&mut self, tile_id: &str, side: Side, neighbor_id: &str, weight: f64, auto_generated: bool) -> Result<Rule, AtlasError> {
    if self.get_variant(tile_id).is_none() {
      return Err(AtlasError::UnknownVariant(tile_id.to_string()));
    }
    if self.get_variant(neighbor_id).is_none() {
      return Err(AtlasError::UnknownVariant(neighbor_id.to_string()));
    }

    if let Some(existing) = self
      .rules
      .iter_mut()
      .find(|r| r.tile_id == tile_id && r.side == side && r.neighbor_id == neighbor_id)
    {
      existing.weight = weight;
      existing.auto_generated = auto_generated;
      let rule = existing.clone();
      self.modified = true;
      self.reindex();
      return Ok(rule);
    }

    let rule = Rule::new(tile_id, side, neighbor_id, weight, auto_generated);
    self.rules.push(rule.clone());
    self.modified = true;
    self.reindex();
    Ok(rule)
  }

  pub fn get_rule(&self, tile_id: &str, side: Side, neighbor_id: &str) -> Option<&Rule> {
    self
      .rules
      .iter()
      .find(|r| r.tile_id == tile_id && r.side == side && r.neighbor_id == neighbor_id)
  }

  pub fn get_rules_for_tile(&self, tile_id: &str, side: Option<Side>) -> Vec<&Rule> {
    self
      .rules
      .iter()
      .filter(|r| r.tile_id == tile_id && side.map_or(true, |s| r.side == s))
      .collect()
  }

  pub fn remove_rule(&mut self, key: &RuleKey) {
    let (tile_id, side, neighbor_id) = key;
    let before = self.rules.len();
    self
      .rules
      .retain(|r| !(&r.tile_id == tile_id && &r.side == side && &r.neighbor_id == neighbor_id));
    if self.rules.len() != before {
      self.modified = true;
      self.reindex();
    }
  }

  /// Returns the number of rules removed.
  pub fn remove_auto_rules(&mut self) -> usize {
    let before = self.rules.len();
    self.rules.retain(|r| !r.auto_generated);
    let removed = before - self.rules.len();
    if removed > 0 {
      self.modified = true;
      self.reindex();
    }
    removed
  }

  // --- Oracle for the solver ---

  /// Weighted neighbors of `tile_id` on `side` per the raw rule table
  /// (ignores the solver's double-check — see [`crate::solver`]).
  pub(crate) fn neighbors_of(&self, tile_id: &str, side: Side) -> impl Iterator<Item = (&str, f64)> {
    self.index.neighbors_of(tile_id, side)
  }

  pub(crate) fn tiles_allowing(&self, side: Side, neighbor: &str) -> HashSet<String> {
    self.index.tiles_allowing(side, neighbor)
  }

  pub fn enabled_variant_ids(&self) -> HashSet<String> {
    self.variants.iter().filter(|v| v.enabled).map(|v| v.id.clone()).collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> Atlas {
    let mut atlas = Atlas::new();
    atlas.add_base_tile(BaseTile::new("grass", "tiles/grass.png", 16, 16)).unwrap();
    atlas.add_base_tile(BaseTile::new("water", "tiles/water.png", 16, 16)).unwrap();
    atlas
  }

  #[test]
  fn add_base_tile_creates_identity_variant() {
    let atlas = sample();
    assert_eq!(atlas.get_variant("grass").unwrap().base_tile_id, "grass");
    assert!(atlas.get_variant("grass").unwrap().is_identity());
  }

  #[test]
  fn non_square_base_tile_rejected() {
    let mut atlas = Atlas::new();
    let err = atlas
      .add_base_tile(BaseTile::new("ramp", "ramp.png", 16, 32))
      .unwrap_err();
    assert!(matches!(err, AtlasError::NonSquareBaseTile { .. }));
    assert!(atlas.get_base_tile("ramp").is_none());
  }

  #[test]
  fn duplicate_base_tile_rejected() {
    let mut atlas = sample();
    let err = atlas.add_base_tile(BaseTile::new("grass", "x.png", 4, 4)).unwrap_err();
    assert!(matches!(err, AtlasError::DuplicateBaseTile(_)));
  }

  #[test]
  fn add_variant_is_idempotent() {
    let mut atlas = sample();
    let a = atlas.add_variant("grass", Transform::new(90, false, false)).unwrap();
    let b = atlas.add_variant("grass", Transform::new(90, false, false)).unwrap();
    assert_eq!(a.id, b.id);
    assert_eq!(atlas.get_tiles_for_base("grass").len(), 2);
  }

  #[test]
  fn remove_identity_variant_forbidden() {
    let mut atlas = sample();
    let err = atlas.remove_variant("grass").unwrap_err();
    assert!(matches!(err, AtlasError::CannotRemoveIdentityVariant(_)));
  }

  #[test]
  fn remove_base_tile_cascades_variants_and_rules() {
    let mut atlas = sample();
    atlas.add_variant("grass", Transform::new(90, false, false)).unwrap();
    atlas.add_rule("grass", Side::Right, "water", 100.0, false).unwrap();

    atlas.remove_base_tile("grass").unwrap();

    assert!(atlas.get_base_tile("grass").is_none());
    assert!(atlas.get_tiles_for_base("grass").is_empty());
    assert!(atlas.rules.is_empty());
  }

  #[test]
  fn add_rule_upserts_by_key() {
    let mut atlas = sample();
    atlas.add_rule("grass", Side::Right, "water", 50.0, false).unwrap();
    atlas.add_rule("grass", Side::Right, "water", 75.0, true).unwrap();

    assert_eq!(atlas.rules.len(), 1);
    let rule = atlas.get_rule("grass", Side::Right, "water").unwrap();
    assert_eq!(rule.weight, 75.0);
    assert!(rule.auto_generated);
  }

  #[test]
  fn rule_rejects_unknown_variant() {
    let mut atlas = sample();
    let err = atlas.add_rule("grass", Side::Right, "lava", 100.0, false).unwrap_err();
    assert!(matches!(err, AtlasError::UnknownVariant(_)));
  }

  #[test]
  fn remove_auto_rules_keeps_manual() {
    let mut atlas = sample();
    atlas.add_rule("grass", Side::Right, "water", 100.0, false).unwrap();
    atlas.add_rule("grass", Side::Left, "water", 100.0, true).unwrap();

    let removed = atlas.remove_auto_rules();
    assert_eq!(removed, 1);
    assert_eq!(atlas.rules.len(), 1);
    assert!(!atlas.rules[0].auto_generated);
  }
}
