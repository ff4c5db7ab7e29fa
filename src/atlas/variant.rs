//! A base tile viewed under a specific [`Transform`].

use crate::transform::Transform;

/// One of the 8 symmetric renderings of a [`super::BaseTile`]. The
/// identity variant's id equals the base id.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tile {
  pub id: String,
  #[cfg_attr(feature = "serde", serde(rename = "base", alias = "base_tile_id"))]
  pub base_tile_id: String,
  pub rotation: u16,
  pub flip_x: bool,
  pub flip_y: bool,
  pub enabled: bool,
}

impl Tile {
  /// `id = base_id + transform.suffix()`.
  pub fn make_id(base_id: &str, transform: Transform) -> String {
    let suffix = transform.suffix();
    if suffix.is_empty() {
      base_id.to_string()
    } else {
      format!("{base_id}_{suffix}")
    }
  }

  pub fn from_base(base_id: impl Into<String>, transform: Transform) -> Self {
    let base_id = base_id.into();
    let id = Self::make_id(&base_id, transform);
    Self {
      id,
      base_tile_id: base_id,
      rotation: transform.rotation,
      flip_x: transform.flip_x,
      flip_y: transform.flip_y,
      enabled: true,
    }
  }

  pub fn transform(&self) -> Transform {
    Transform::new(self.rotation, self.flip_x, self.flip_y)
  }

  pub fn is_identity(&self) -> bool {
    self.transform().is_identity()
  }
}
