//! Polyomino shapes - R x C binary matrices packed into a u64 (8x8 max).
//! Bit `r * 8 + c` is the cell at row r, column c of the bounding box.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;
use thiserror::Error;

/// Largest bounding box side; a shape never outgrows the grid.
pub const MAX_SIDE: usize = 8;

/// Distinct 90-degree rotations of a shape, identity first.
pub type RotationSet = SmallVec<[Shape; 4]>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("shape has no rows or no columns")]
    Empty,
    #[error("shape is {rows}x{cols}, larger than 8x8")]
    TooLarge { rows: usize, cols: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("cell ({row}, {col}) is {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: u8 },
    #[error("shape has no filled cells")]
    NoFilledCells,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Shape {
    rows: u8,
    cols: u8,
    bits: u64,
}

impl Shape {
    /// Build a shape from a literal matrix. Used for the catalog constants,
    /// so a malformed literal fails at compile time.
    pub const fn from_matrix<const R: usize, const C: usize>(matrix: [[u8; C]; R]) -> Self {
        assert!(R > 0 && C > 0, "shape must not be empty");
        assert!(R <= MAX_SIDE && C <= MAX_SIDE, "shape exceeds 8x8");
        let mut bits = 0u64;
        let mut r = 0;
        while r < R {
            let mut c = 0;
            while c < C {
                assert!(matrix[r][c] <= 1, "shape cells must be 0 or 1");
                if matrix[r][c] == 1 {
                    bits |= 1 << (r * MAX_SIDE + c);
                }
                c += 1;
            }
            r += 1;
        }
        assert!(bits != 0, "shape must have a filled cell");
        Self {
            rows: R as u8,
            cols: C as u8,
            bits,
        }
    }

    /// Validated constructor for matrices that arrive at runtime.
    pub fn from_rows<T: AsRef<[u8]>>(matrix: &[T]) -> Result<Self, ShapeError> {
        let rows = matrix.len();
        let cols = matrix.first().map_or(0, |row| row.as_ref().len());
        if rows == 0 || cols == 0 {
            return Err(ShapeError::Empty);
        }
        if rows > MAX_SIDE || cols > MAX_SIDE {
            return Err(ShapeError::TooLarge { rows, cols });
        }

        let mut bits = 0u64;
        for (r, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ShapeError::Ragged {
                    row: r,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (c, &value) in row.iter().enumerate() {
                match value {
                    0 => {}
                    1 => bits |= 1 << (r * MAX_SIDE + c),
                    _ => return Err(ShapeError::InvalidCell { row: r, col: c, value }),
                }
            }
        }
        if bits == 0 {
            return Err(ShapeError::NoFilledCells);
        }

        Ok(Self {
            rows: rows as u8,
            cols: cols as u8,
            bits,
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows as usize
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols as usize
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols() && (self.bits >> (row * MAX_SIDE + col)) & 1 == 1
    }

    #[inline]
    pub fn cell_count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Filled cells as (row, col), row-major.
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.rows())
            .flat_map(move |r| (0..self.cols()).map(move |c| (r, c)))
            .filter(move |&(r, c)| self.get(r, c))
    }

    /// Rotate clockwise. An R x C shape becomes C x R and the cell at (r, c)
    /// moves to (c, R - 1 - r).
    pub fn rotate90(&self) -> Shape {
        let rows = self.rows();
        let mut bits = 0u64;
        for (r, c) in self.filled_cells() {
            bits |= 1 << (c * MAX_SIDE + (rows - 1 - r));
        }
        Shape {
            rows: self.cols,
            cols: self.rows,
            bits,
        }
    }

    pub fn unique_rotations(&self) -> RotationSet {
        let mut set = RotationSet::new();
        let mut current = *self;
        for _ in 0..4 {
            if !set.contains(&current) {
                set.push(current);
            }
            current = current.rotate90();
        }
        set
    }

    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.rows())
            .map(|r| (0..self.cols()).map(|c| self.get(r, c) as u8).collect())
            .collect()
    }
}

impl Serialize for Shape {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_rows().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<Vec<u8>> = Vec::deserialize(deserializer)?;
        Shape::from_rows(&rows).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows() {
            for c in 0..self.cols() {
                write!(f, "{}", if self.get(r, c) { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORNER: Shape = Shape::from_matrix([[1, 1], [1, 0]]);

    #[test]
    fn test_from_matrix_dimensions() {
        let line = Shape::from_matrix([[1, 1, 1]]);
        assert_eq!(line.rows(), 1);
        assert_eq!(line.cols(), 3);
        assert_eq!(line.cell_count(), 3);
    }

    #[test]
    fn test_rotate_swaps_dimensions() {
        let shape = Shape::from_matrix([[1, 0, 0], [1, 1, 1]]);
        let rotated = shape.rotate90();
        assert_eq!(rotated.rows(), 3);
        assert_eq!(rotated.cols(), 2);
        assert_eq!(rotated, Shape::from_matrix([[1, 1], [1, 0], [1, 0]]));
    }

    #[test]
    fn test_rotate_corner_clockwise() {
        // ##    ##
        // #. -> .#
        assert_eq!(CORNER.rotate90(), Shape::from_matrix([[1, 1], [0, 1]]));
    }

    #[test]
    fn test_four_rotations_is_identity() {
        let shape = Shape::from_matrix([[0, 1, 0], [1, 1, 1]]);
        let back = shape.rotate90().rotate90().rotate90().rotate90();
        assert_eq!(back, shape);
    }

    #[test]
    fn test_unique_rotations_counts() {
        let square = Shape::from_matrix([[1, 1], [1, 1]]);
        let line = Shape::from_matrix([[1, 1, 1, 1]]);
        assert_eq!(square.unique_rotations().len(), 1);
        assert_eq!(line.unique_rotations().len(), 2);
        assert_eq!(CORNER.unique_rotations().len(), 4);
        assert_eq!(CORNER.unique_rotations()[0], CORNER);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = Shape::from_rows(&[vec![1, 1], vec![1]]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::Ragged {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(Shape::from_rows::<Vec<u8>>(&[]), Err(ShapeError::Empty));
        assert_eq!(
            Shape::from_rows(&[[0u8, 0]]),
            Err(ShapeError::NoFilledCells)
        );
        assert_eq!(
            Shape::from_rows(&[[1u8, 2]]),
            Err(ShapeError::InvalidCell {
                row: 0,
                col: 1,
                value: 2
            })
        );
        assert_eq!(
            Shape::from_rows(&[[1u8; 9]]),
            Err(ShapeError::TooLarge { rows: 1, cols: 9 })
        );
    }

    #[test]
    fn test_filled_cells_row_major() {
        let cells: Vec<_> = CORNER.filled_cells().collect();
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_serde_matrix_form() {
        let json = serde_json::to_string(&CORNER).expect("serialize");
        assert_eq!(json, "[[1,1],[1,0]]");
        let back: Shape = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, CORNER);
        assert!(serde_json::from_str::<Shape>("[[0]]").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(CORNER.to_string(), "##\n#.\n");
    }
}
