//! occupancy-only copy of the grid as a u64 bitboard, bit `row * 8 + col`
//! used by search and evaluation - Copy, so every branch owns its own grid

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::Shape;

/// Side length of the square grid.
pub const GRID_SIZE: usize = 8;
/// Total number of cells in the grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

const ROW_MASK: u64 = 0xFF;
const COL_MASK: u64 = 0x0101_0101_0101_0101;

#[inline(always)]
pub const fn row_mask(row: usize) -> u64 {
    ROW_MASK << (row * GRID_SIZE)
}

#[inline(always)]
pub const fn col_mask(col: usize) -> u64 {
    COL_MASK << col
}

#[inline(always)]
const fn bit(col: usize, row: usize) -> u64 {
    1u64 << (row * GRID_SIZE + col)
}

/// Cells covered by `shape` with its top-left corner at (col, row).
/// None when any filled cell lands off the grid.
pub fn footprint(shape: &Shape, col: i8, row: i8) -> Option<u64> {
    let mut mask = 0u64;
    for (r, c) in shape.filled_cells() {
        let x = col as i16 + c as i16;
        let y = row as i16 + r as i16;
        if x < 0 || y < 0 || x >= GRID_SIZE as i16 || y >= GRID_SIZE as i16 {
            return None;
        }
        mask |= bit(x as usize, y as usize);
    }
    Some(mask)
}

/// Row and column indices removed by one clear pass, ascending.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct ClearedLines {
    pub rows: SmallVec<[u8; GRID_SIZE]>,
    pub cols: SmallVec<[u8; GRID_SIZE]>,
}

impl ClearedLines {
    pub fn count(&self) -> usize {
        self.rows.len() + self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.cols.is_empty()
    }

    /// Union of every cleared cell; a cell on a cleared row and a cleared
    /// column appears once.
    pub fn cell_mask(&self) -> u64 {
        let rows = self
            .rows
            .iter()
            .fold(0u64, |acc, &r| acc | row_mask(r as usize));
        self.cols
            .iter()
            .fold(rows, |acc, &c| acc | col_mask(c as usize))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Snapshot {
    bits: u64,
}

impl Snapshot {
    pub const EMPTY: Snapshot = Snapshot { bits: 0 };
    pub const FULL: Snapshot = Snapshot { bits: !0 };

    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    #[inline]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.bits & bit(col, row) != 0
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, occupied: bool) {
        if occupied {
            self.bits |= bit(col, row);
        } else {
            self.bits &= !bit(col, row);
        }
    }

    #[inline]
    pub fn occupied_count(&self) -> u32 {
        self.bits.count_ones()
    }

    pub fn fullness(&self) -> f32 {
        self.occupied_count() as f32 / CELL_COUNT as f32
    }

    #[inline]
    pub fn row_count(&self, row: usize) -> u32 {
        (self.bits & row_mask(row)).count_ones()
    }

    #[inline]
    pub fn col_count(&self, col: usize) -> u32 {
        (self.bits & col_mask(col)).count_ones()
    }

    pub fn can_place(&self, shape: &Shape, col: i8, row: i8) -> bool {
        matches!(footprint(shape, col, row), Some(mask) if mask & self.bits == 0)
    }

    /// Marks the shape's cells occupied.
    ///
    /// # Panics
    /// If the shape does not fit at (col, row); callers check `can_place` first.
    pub fn place(&mut self, shape: &Shape, col: i8, row: i8) {
        let mask = match footprint(shape, col, row) {
            Some(mask) if mask & self.bits == 0 => mask,
            _ => panic!("shape does not fit at col {col}, row {row}"),
        };
        self.bits |= mask;
    }

    /// Full rows and columns as they stand, without clearing anything.
    pub fn full_lines(&self) -> ClearedLines {
        let mut lines = ClearedLines::default();
        for i in 0..GRID_SIZE {
            if self.bits & row_mask(i) == row_mask(i) {
                lines.rows.push(i as u8);
            }
            if self.bits & col_mask(i) == col_mask(i) {
                lines.cols.push(i as u8);
            }
        }
        lines
    }

    /// Clears every full row and column found in the current state in one
    /// pass. No re-check after clearing.
    pub fn clear_full_lines(&mut self) -> ClearedLines {
        let lines = self.full_lines();
        self.bits &= !lines.cell_mask();
        lines
    }

    /// Board after placing `shape` at (col, row) and resolving clears.
    pub fn simulate(&self, shape: &Shape, col: i8, row: i8) -> Snapshot {
        let mut next = *self;
        next.place(shape, col, row);
        next.clear_full_lines();
        next
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                write!(f, "{}", if self.is_occupied(col, row) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMINO: Shape = Shape::from_matrix([[1, 1]]);
    const CORNER: Shape = Shape::from_matrix([[1, 1], [1, 0]]);

    fn with_row(row: usize) -> Snapshot {
        Snapshot::from_bits(row_mask(row))
    }

    #[test]
    fn test_masks() {
        assert_eq!(row_mask(0), 0xFF);
        assert_eq!(row_mask(7), 0xFF << 56);
        assert_eq!(col_mask(0).count_ones(), 8);
        assert_eq!(row_mask(3) & col_mask(5), bit(5, 3));
    }

    #[test]
    fn test_footprint_bounds() {
        assert_eq!(footprint(&DOMINO, 0, 0), Some(0b11));
        assert_eq!(footprint(&DOMINO, 7, 0), None);
        assert_eq!(footprint(&DOMINO, -1, 0), None);
        assert_eq!(footprint(&DOMINO, 6, 7), Some(bit(6, 7) | bit(7, 7)));
    }

    #[test]
    fn test_footprint_ignores_empty_bbox_cells() {
        // the empty corner of .# / ## may hang off the left edge
        let shape = Shape::from_matrix([[0, 1], [1, 1]]);
        assert!(footprint(&shape, -1, 0).is_none());
        let hook = Shape::from_rows(&[[0u8, 1], [0, 1]]).expect("valid");
        assert_eq!(footprint(&hook, -1, 0), Some(bit(0, 0) | bit(0, 1)));
    }

    #[test]
    fn test_can_place_rejects_overlap() {
        let mut snap = Snapshot::EMPTY;
        snap.set(1, 0, true);
        assert!(!snap.can_place(&DOMINO, 0, 0));
        assert!(snap.can_place(&DOMINO, 2, 0));
        assert!(snap.can_place(&CORNER, 0, 1));
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_place_panics_on_overlap() {
        let mut snap = Snapshot::FULL;
        snap.place(&DOMINO, 0, 0);
    }

    #[test]
    fn test_clear_single_row() {
        let mut snap = with_row(0);
        snap.set(3, 4, true);
        let lines = snap.clear_full_lines();
        assert_eq!(lines.rows.as_slice(), &[0]);
        assert!(lines.cols.is_empty());
        assert_eq!(snap.occupied_count(), 1);
        assert!(snap.is_occupied(3, 4));
    }

    #[test]
    fn test_clear_row_and_column_together() {
        let mut snap = Snapshot::from_bits(row_mask(0) | col_mask(0));
        let lines = snap.clear_full_lines();
        assert_eq!(lines.rows.as_slice(), &[0]);
        assert_eq!(lines.cols.as_slice(), &[0]);
        assert_eq!(lines.count(), 2);
        assert_eq!(lines.cell_mask().count_ones(), 15);
        assert_eq!(snap, Snapshot::EMPTY);
    }

    #[test]
    fn test_clear_full_board_clears_everything_once() {
        let mut snap = Snapshot::FULL;
        let lines = snap.clear_full_lines();
        assert_eq!(lines.rows.len(), GRID_SIZE);
        assert_eq!(lines.cols.len(), GRID_SIZE);
        assert_eq!(snap, Snapshot::EMPTY);
    }

    #[test]
    fn test_simulate_leaves_original() {
        let mut snap = with_row(2);
        snap.set(0, 2, false);
        snap.set(1, 2, false);
        let next = snap.simulate(&DOMINO, 0, 2);
        assert_eq!(next, Snapshot::EMPTY);
        assert_eq!(snap.row_count(2), 6);
    }

    #[test]
    fn test_line_counts() {
        let snap = Snapshot::from_bits(row_mask(1) | bit(4, 6));
        assert_eq!(snap.row_count(1), 8);
        assert_eq!(snap.col_count(4), 2);
        assert_eq!(snap.col_count(0), 1);
        assert!((snap.fullness() - 9.0 / 64.0).abs() < 1e-6);
    }
}
