//! Blast core crate - grid, shapes and the shape catalog.

mod board;
pub mod catalog;
mod shape;
mod snapshot;

pub use board::{Board, Occupant, PlacementError};
pub use catalog::{Catalog, SHAPES};
pub use shape::{RotationSet, Shape, ShapeError, MAX_SIDE};
pub use snapshot::{col_mask, footprint, row_mask, ClearedLines, Snapshot, CELL_COUNT, GRID_SIZE};
