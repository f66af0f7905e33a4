//! Blast eval crate - heuristics for board health.

use blast_core::{Snapshot, CELL_COUNT, GRID_SIZE};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalWeights {
    /// Scales occupied / total cells; applied as a penalty.
    pub fullness: f32,
    /// Scales filled / N for each partially filled row and column.
    pub line_potential: f32,
    /// Flat penalty per fragmented empty cell.
    pub fragmentation: f32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            fullness: 100.0,
            line_potential: 10.0,
            fragmentation: 15.0,
        }
    }
}

/// Higher is healthier. Pure function of the snapshot.
pub fn evaluate(board: &Snapshot, weights: &EvalWeights) -> f32 {
    let mut score = -weights.fullness * board.occupied_count() as f32 / CELL_COUNT as f32;

    // Near-complete lines
    for i in 0..GRID_SIZE {
        score += line_bonus(board.row_count(i), weights);
        score += line_bonus(board.col_count(i), weights);
    }

    // Holes that only small shapes can fill
    score -= count_fragments(board) as f32 * weights.fragmentation;

    score
}

fn line_bonus(filled: u32, weights: &EvalWeights) -> f32 {
    if filled == 0 || filled as usize == GRID_SIZE {
        return 0.0;
    }
    weights.line_potential * filled as f32 / GRID_SIZE as f32
}

/// Empty cells with 3 or 4 occupied orthogonal neighbours. Off-grid
/// neighbours do not count as occupied.
pub fn count_fragments(board: &Snapshot) -> u32 {
    let mut fragments = 0u32;
    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            if board.is_occupied(col, row) {
                continue;
            }
            let mut neighbours = 0;
            if row > 0 && board.is_occupied(col, row - 1) {
                neighbours += 1;
            }
            if row + 1 < GRID_SIZE && board.is_occupied(col, row + 1) {
                neighbours += 1;
            }
            if col > 0 && board.is_occupied(col - 1, row) {
                neighbours += 1;
            }
            if col + 1 < GRID_SIZE && board.is_occupied(col + 1, row) {
                neighbours += 1;
            }
            if neighbours >= 3 {
                fragments += 1;
            }
        }
    }
    fragments
}
