//! Editor settings controlling auto-propagation behavior.

/// Controls which sibling transforms [`crate::propagator::ensure_variants_for_rule`]
/// pre-creates. Never consulted by `propagate_rule`/`propagate_all`
/// themselves — those operate only on variants that already exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settings {
  pub auto_propagate_rotations: bool,
  pub auto_propagate_mirrors: bool,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      auto_propagate_rotations: true,
      auto_propagate_mirrors: true,
    }
  }
}
