//! Blast search crate - placement enumeration and sequence feasibility.

mod feasibility;
mod moves;

pub use feasibility::{sequence_fits, solve_sequence};
pub use moves::{best_placement, fits_anywhere, has_any_move, legal_positions, Placement};
