//! placement enumeration over a snapshot - positions, game-over check,
//! best single placement by evaluation

use blast_core::{Catalog, Shape, Snapshot, GRID_SIZE};
use blast_eval::{evaluate, EvalWeights};

/// A shape orientation anchored at (col, row) by its top-left corner.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Placement {
    pub shape: Shape,
    /// Index into the shape's unique rotation set; 0 is the base orientation.
    pub rotation: usize,
    pub col: i8,
    pub row: i8,
}

/// Every legal anchor for `shape` as it stands, row-major.
pub fn legal_positions<'a>(
    board: &'a Snapshot,
    shape: &'a Shape,
) -> impl Iterator<Item = (i8, i8)> + 'a {
    (0..GRID_SIZE as i8)
        .flat_map(|row| (0..GRID_SIZE as i8).map(move |col| (col, row)))
        .filter(move |&(col, row)| board.can_place(shape, col, row))
}

/// True when some rotation of `shape` fits somewhere.
pub fn fits_anywhere(board: &Snapshot, shape: &Shape) -> bool {
    Catalog::global()
        .rotations(shape)
        .iter()
        .any(|rotated| legal_positions(board, rotated).next().is_some())
}

/// Game-over test: false iff no rotation of any shape fits anywhere.
/// An empty shape list has no move.
pub fn has_any_move(board: &Snapshot, shapes: &[Shape]) -> bool {
    shapes.iter().any(|shape| fits_anywhere(board, shape))
}

/// Best-scoring anchor for `shape` in its given orientation, judged on the
/// board after clears. First maximum in row-major order wins ties.
pub fn best_placement(
    board: &Snapshot,
    shape: &Shape,
    weights: &EvalWeights,
) -> Option<(Placement, f32)> {
    let mut best: Option<(Placement, f32)> = None;
    for (col, row) in legal_positions(board, shape) {
        let score = evaluate(&board.simulate(shape, col, row), weights);
        if best.map_or(true, |(_, current)| score > current) {
            let placement = Placement {
                shape: *shape,
                rotation: 0,
                col,
                row,
            };
            best = Some((placement, score));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use blast_core::{row_mask, SHAPES};

    const SINGLE: Shape = SHAPES[0];
    const LINE4: Shape = SHAPES[5];
    const VLINE4: Shape = SHAPES[6];

    #[test]
    fn test_empty_board_positions() {
        let board = Snapshot::EMPTY;
        assert_eq!(legal_positions(&board, &SINGLE).count(), 64);
        // 5 anchors per row, 8 rows
        assert_eq!(legal_positions(&board, &LINE4).count(), 40);
        assert_eq!(legal_positions(&board, &LINE4).next(), Some((0, 0)));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Snapshot::FULL;
        assert!(!has_any_move(&board, &SHAPES));
        assert!(!has_any_move(&board, &[SINGLE]));
    }

    #[test]
    fn test_empty_shape_list_has_no_move() {
        assert!(!has_any_move(&Snapshot::EMPTY, &[]));
    }

    #[test]
    fn test_rotation_rescues_move() {
        // only a vertical gap in column 3 is free
        let board = Snapshot::from_bits(!blast_core::col_mask(3));
        assert_eq!(legal_positions(&board, &LINE4).count(), 0);
        assert!(fits_anywhere(&board, &LINE4));
        assert!(has_any_move(&board, &[LINE4]));
        assert_eq!(legal_positions(&board, &VLINE4).count(), 5);
    }

    #[test]
    fn test_best_placement_matches_max_score() {
        let mut board = Snapshot::from_bits(row_mask(7));
        board.set(6, 7, false);
        board.set(2, 5, true);
        let weights = EvalWeights::default();

        let mut best_score = f32::NEG_INFINITY;
        for (col, row) in legal_positions(&board, &SHAPES[7]) {
            let score = evaluate(&board.simulate(&SHAPES[7], col, row), &weights);
            best_score = best_score.max(score);
        }

        let (placement, score) = best_placement(&board, &SHAPES[7], &weights).expect("a move");
        assert!((score - best_score).abs() < 0.0001);
        assert!(board.can_place(&placement.shape, placement.col, placement.row));
    }

    #[test]
    fn test_best_placement_ties_keep_first() {
        // every anchor scores the same on an empty board
        let (placement, score) =
            best_placement(&Snapshot::EMPTY, &SINGLE, &EvalWeights::default()).expect("a move");
        assert_eq!((placement.col, placement.row), (0, 0));
        assert!((score - (-100.0 / 64.0 + 2.5)).abs() < 0.0001);
    }

    #[test]
    fn test_best_placement_none_when_blocked() {
        assert!(best_placement(&Snapshot::FULL, &SINGLE, &EvalWeights::default()).is_none());
    }
}
