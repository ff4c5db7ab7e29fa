//! A directed adjacency fact between two tile variants.

use crate::transform::Side;

/// `(tile_id, side, neighbor_id)` is the identity key; weight and
/// `auto_generated` are the only mutable fields once a rule exists.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rule {
  #[cfg_attr(feature = "serde", serde(rename = "tile"))]
  pub tile_id: String,
  pub side: Side,
  #[cfg_attr(feature = "serde", serde(rename = "neighbor"))]
  pub neighbor_id: String,
  #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
  pub weight: f64,
  #[cfg_attr(feature = "serde", serde(rename = "auto", default))]
  pub auto_generated: bool,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
  100.0
}

/// `(tile_id, side, neighbor_id)`, the rule's identity key.
pub type RuleKey = (String, Side, String);

impl Rule {
  pub fn new(tile_id: impl Into<String>, side: Side, neighbor_id: impl Into<String>, weight: f64, auto_generated: bool) -> Self {
    Self {
      tile_id: tile_id.into(),
      side,
      neighbor_id: neighbor_id.into(),
      weight,
      auto_generated,
    }
  }

  pub fn key(&self) -> RuleKey {
    (self.tile_id.clone(), self.side, self.neighbor_id.clone())
  }
}
