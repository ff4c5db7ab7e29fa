//! Archive I/O for the two on-disk formats: `.tr` (Tile Rules, an atlas)
//! and `.tm` (Tile Map, a solved or in-progress grid). Both are deflate
//! ZIP archives carrying a JSON document plus the PNGs it references.
//!
//! Gated behind the `serde` feature: the JSON documents borrow
//! [`crate::atlas::Atlas`]'s own field types, which only implement
//! `Serialize`/`Deserialize` under that feature.

pub mod atlas_io;
pub mod grid_io;

pub use atlas_io::{load_atlas, save_atlas};
pub use grid_io::{load_grid, save_grid};
