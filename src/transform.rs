//! The 8-element group of square-tile symmetries and the four-sided
//! coordinate frame it acts on.

use strum_macros::{EnumCount, EnumIter, VariantArray};

/// One side of a square tile.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumCount, EnumIter, VariantArray,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
  Top,
  Right,
  Bottom,
  Left,
}

impl Side {
  /// `top<->bottom`, `left<->right`.
  pub fn opposite(self) -> Self {
    match self {
      Self::Top => Self::Bottom,
      Self::Bottom => Self::Top,
      Self::Left => Self::Right,
      Self::Right => Self::Left,
    }
  }

  fn rotate_cw(self, degrees: u16) -> Self {
    let steps = (degrees / 90) % 4;
    let order = [Self::Top, Self::Right, Self::Bottom, Self::Left];
    let index = order.iter().position(|s| *s == self).unwrap();
    order[(index + steps as usize) % 4]
  }

  fn flip_x(self) -> Self {
    match self {
      Self::Left => Self::Right,
      Self::Right => Self::Left,
      other => other,
    }
  }

  fn flip_y(self) -> Self {
    match self {
      Self::Top => Self::Bottom,
      Self::Bottom => Self::Top,
      other => other,
    }
  }
}

/// A square-tile symmetry: rotate clockwise, then flip horizontally, then
/// flip vertically.
///
/// The group has order 8. Canonical form uses only `flip_x` (`flip_y` is
/// always `false`); `normalize` collapses any transform to this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform {
  pub rotation: u16,
  pub flip_x: bool,
  pub flip_y: bool,
}

impl Default for Transform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

impl Transform {
  pub const IDENTITY: Self = Self {
    rotation: 0,
    flip_x: false,
    flip_y: false,
  };

  pub fn new(rotation: u16, flip_x: bool, flip_y: bool) -> Self {
    Self {
      rotation: rotation % 360,
      flip_x,
      flip_y,
    }
  }

  pub fn is_identity(&self) -> bool {
    *self == Self::IDENTITY
  }

  /// Identifier suffix: join of nonempty of `{"r{rotation}", "fx", "fy"}`
  /// by `_`; empty for identity.
  pub fn suffix(&self) -> String {
    let mut parts = Vec::with_capacity(2);
    if self.rotation != 0 {
      parts.push(format!("r{}", self.rotation));
    }
    if self.flip_x {
      parts.push("fx".to_string());
    }
    if self.flip_y {
      parts.push("fy".to_string());
    }
    parts.join("_")
  }

  /// Rotate clockwise by `rotation`, then flip horizontally if `flip_x`,
  /// then flip vertically if `flip_y`.
  pub fn apply_to_side(&self, side: Side) -> Side {
    let mut result = side.rotate_cw(self.rotation);
    if self.flip_x {
      result = result.flip_x();
    }
    if self.flip_y {
      result = result.flip_y();
    }
    result
  }

  /// The unique side `s` such that `self.apply_to_side(s) == side`.
  pub fn inverse_side(&self, side: Side) -> Side {
    use strum::IntoEnumIterator;
    Side::iter()
      .find(|&candidate| self.apply_to_side(candidate) == side)
      .expect("Side is a 4-element closed group under apply_to_side")
  }

  /// The group inverse, in canonical form.
  pub fn inverse(&self) -> Self {
    let inv_rotation = (360 - self.rotation) % 360;

    // Undo in reverse order (flip_y, flip_x, rotate(inv)); commute the
    // flips past the inverse rotation to restore (rotate, flip_x, flip_y)
    // order. Passing a flip through r90/r270 swaps the flip axes.
    let (new_flip_x, new_flip_y) = if inv_rotation == 90 || inv_rotation == 270 {
      (self.flip_y, self.flip_x)
    } else {
      (self.flip_x, self.flip_y)
    };

    Self::new(inv_rotation, new_flip_x, new_flip_y).normalize()
  }

  /// `self` first, then `other`. Result in canonical form.
  pub fn compose(&self, other: &Self) -> Self {
    // Move self's flips past other's rotation before combining.
    let (mut fx1, mut fy1) = (self.flip_x, self.flip_y);
    if other.rotation == 90 || other.rotation == 270 {
      std::mem::swap(&mut fx1, &mut fy1);
    }

    let new_rotation = (self.rotation + other.rotation) % 360;
    let new_flip_x = fx1 != other.flip_x;
    let new_flip_y = fy1 != other.flip_y;

    Self::new(new_rotation, new_flip_x, new_flip_y).normalize()
  }

  /// Collapse `flip_y` into `rotation + 180, flip_x xor 1`; idempotent.
  pub fn normalize(&self) -> Self {
    if !self.flip_y {
      return *self;
    }

    if self.flip_x {
      Self::new(self.rotation + 180, false, false)
    } else {
      Self::new(self.rotation + 180, true, false)
    }
  }
}
