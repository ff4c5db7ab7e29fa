//! Per-concern error enums, following the taxonomy in the design doc:
//! validation, envelope, and solver-precondition failures are distinct
//! error surfaces that never get merged into one crate-wide type.

use thiserror::Error;

/// Failures from mutating or querying an [`crate::atlas::Atlas`].
#[derive(Debug, Error)]
pub enum AtlasError {
  #[error("base tile '{0}' already exists")]
  DuplicateBaseTile(String),
  #[error("no base tile with id '{0}'")]
  UnknownBaseTile(String),
  #[error("no variant with id '{0}'")]
  UnknownVariant(String),
  #[error("cannot remove the identity variant '{0}' directly; remove its base tile instead")]
  CannotRemoveIdentityVariant(String),
  #[error("base tile '{id}' is not square ({width}x{height})")]
  NonSquareBaseTile { id: String, width: u32, height: u32 },
}

/// Failures surfaced while driving the solver.
#[derive(Debug, Error)]
pub enum SolverError {
  #[error("cell ({x}, {y}) is out of bounds for a {width}x{height} grid")]
  OutOfBounds {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
  },
  #[error("no variant with id '{0}' in the atlas backing this solver")]
  UnknownVariant(String),
}

/// Failures surfaced by `.tr`/`.tm` archive I/O.
#[cfg(feature = "serde")]
#[derive(Debug, Error)]
pub enum EnvelopeError {
  #[error("archive is missing required entry '{0}'")]
  MissingEntry(String),
  #[error("malformed JSON in '{entry}': {source}")]
  MalformedJson {
    entry: String,
    #[source]
    source: serde_json::Error,
  },
  #[error("zip archive error: {0}")]
  Zip(#[from] zip::result::ZipError),
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
  #[error("unsupported file extension: expected '.{expected}'")]
  UnsupportedExtension { expected: &'static str },
  #[error("grid data references an invalid cell: {0}")]
  InvalidGridData(#[from] SolverError),
  #[error("no image payload supplied for base tile '{0}'")]
  MissingTileImage(String),
}
