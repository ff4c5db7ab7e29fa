//! Tick-based Wave Function Collapse solver over a rectangular grid.

pub mod cell;
pub mod engine;

pub use cell::Cell;
pub use engine::{CellSnapshot, EngineState, SolverEngine, SolverObserver};
