//! An imported square tile image, prior to any transform.

/// An immutable record of an imported square image. Width and height are
/// enforced equal at ingest (see [`super::Atlas::add_base_tile`]).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BaseTile {
  pub id: String,
  pub source: String,
  pub width: u32,
  pub height: u32,
}

impl BaseTile {
  pub fn new(id: impl Into<String>, source: impl Into<String>, width: u32, height: u32) -> Self {
    Self {
      id: id.into(),
      source: source.into(),
      width,
      height,
    }
  }

  pub fn is_square(&self) -> bool {
    self.width == self.height
  }
}
