//! Wave Function Collapse over a tile atlas: an 8-element square-symmetry
//! transform algebra, an atlas of tiles and directed adjacency rules, a
//! rule propagator that derives rules across symmetric variants, a
//! completeness validator, and a tick-based, seedable solver.

pub mod atlas;
#[cfg(feature = "serde")]
pub mod envelope;
pub mod err;
pub mod propagator;
pub mod solver;
#[cfg(feature = "tracing")]
pub mod telemetry;
pub mod transform;
pub mod validator;

pub mod prelude {
  pub use crate::atlas::{Atlas, BaseTile, Rule, RuleKey, Settings, Tile};
  #[cfg(feature = "serde")]
  pub use crate::envelope::{load_atlas, load_grid, save_atlas, save_grid};
  #[cfg(feature = "serde")]
  pub use crate::err::EnvelopeError;
  pub use crate::err::{AtlasError, SolverError};
  pub use crate::propagator::{ensure_variants_for_rule, propagate_all, propagate_rule};
  pub use crate::solver::{Cell, CellSnapshot, EngineState, SolverEngine, SolverObserver};
  #[cfg(feature = "tracing")]
  pub use crate::telemetry::init_tracing;
  pub use crate::transform::{Side, Transform};
  pub use crate::validator::{normalize_side_weights, side_weight_total, validate_atlas, TileValidation, ValidationResult};
}

pub use prelude::*;
