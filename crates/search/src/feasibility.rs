//! sequence feasibility - can the tray be played out in order?
//! depth-first over rotations then row-major anchors, first hit wins
//! each level owns its snapshot by value so branches never share a grid

use blast_core::{Catalog, Shape, Snapshot};

use crate::moves::{legal_positions, Placement};

/// True when `shapes` can be placed one after another, any rotation each,
/// with line clears resolved between placements. Empty list fits.
pub fn sequence_fits(board: &Snapshot, shapes: &[Shape]) -> bool {
    let mut path = Vec::with_capacity(shapes.len());
    solve(*board, shapes, &mut path)
}

/// Like `sequence_fits` but returns the first solution found.
pub fn solve_sequence(board: &Snapshot, shapes: &[Shape]) -> Option<Vec<Placement>> {
    let mut path = Vec::with_capacity(shapes.len());
    solve(*board, shapes, &mut path).then_some(path)
}

fn solve(board: Snapshot, shapes: &[Shape], path: &mut Vec<Placement>) -> bool {
    let Some((first, rest)) = shapes.split_first() else {
        return true;
    };

    for (rotation, shape) in Catalog::global().rotations(first).iter().enumerate() {
        for (col, row) in legal_positions(&board, shape) {
            path.push(Placement {
                shape: *shape,
                rotation,
                col,
                row,
            });
            if solve(board.simulate(shape, col, row), rest, path) {
                return true;
            }
            path.pop();
        }
    }
    false
}
