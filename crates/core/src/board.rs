//! live 8x8 board - cell occupants plus an occupancy bitboard
//! the bitboard is kept in sync on every write so snapshots are free

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::snapshot::{ClearedLines, GRID_SIZE};
use crate::{Shape, Snapshot};

/// Opaque token stored in an occupied cell (a palette index for the UI).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Occupant(pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("cell ({col}, {row}) is outside the grid")]
    OutOfBounds { col: i16, row: i16 },
    #[error("cell ({col}, {row}) is already occupied")]
    Occupied { col: usize, row: usize },
}

type Cells = [[Option<Occupant>; GRID_SIZE]; GRID_SIZE];

#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Board {
    /// cells[row][col]
    cells: Cells,
    occupancy: Snapshot,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            cells: [[None; GRID_SIZE]; GRID_SIZE],
            occupancy: Snapshot::EMPTY,
        }
    }
}

impl Board {
    pub const SIZE: usize = GRID_SIZE;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Occupant> {
        self.cells[row][col]
    }

    pub fn set(&mut self, col: usize, row: usize, occupant: Option<Occupant>) {
        self.cells[row][col] = occupant;
        self.occupancy.set(col, row, occupant.is_some());
    }

    #[inline]
    pub fn is_occupied(&self, col: usize, row: usize) -> bool {
        self.occupancy.is_occupied(col, row)
    }

    /// Occupancy-only copy; never aliases this board.
    #[inline]
    pub fn snapshot(&self) -> Snapshot {
        self.occupancy
    }

    pub fn occupied_count(&self) -> u32 {
        self.occupancy.occupied_count()
    }

    pub fn fullness(&self) -> f32 {
        self.occupancy.fullness()
    }

    pub fn is_empty(&self) -> bool {
        self.occupancy == Snapshot::EMPTY
    }

    pub fn is_full(&self) -> bool {
        self.occupancy == Snapshot::FULL
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn can_place(&self, shape: &Shape, col: i8, row: i8) -> bool {
        self.occupancy.can_place(shape, col, row)
    }

    /// Writes `occupant` into every filled cell of `shape` at (col, row).
    /// Checks the whole footprint before writing anything.
    pub fn try_place(
        &mut self,
        shape: &Shape,
        col: i8,
        row: i8,
        occupant: Occupant,
    ) -> Result<(), PlacementError> {
        for (r, c) in shape.filled_cells() {
            let x = col as i16 + c as i16;
            let y = row as i16 + r as i16;
            if x < 0 || y < 0 || x >= GRID_SIZE as i16 || y >= GRID_SIZE as i16 {
                return Err(PlacementError::OutOfBounds { col: x, row: y });
            }
            if self.is_occupied(x as usize, y as usize) {
                return Err(PlacementError::Occupied {
                    col: x as usize,
                    row: y as usize,
                });
            }
        }

        for (r, c) in shape.filled_cells() {
            let x = (col as i16 + c as i16) as usize;
            let y = (row as i16 + r as i16) as usize;
            self.set(x, y, Some(occupant));
        }
        Ok(())
    }

    /// Same as `try_place` for callers that already checked `can_place`.
    ///
    /// # Panics
    /// On an illegal placement; writing anyway would desync the board.
    pub fn place(&mut self, shape: &Shape, col: i8, row: i8, occupant: Occupant) {
        if let Err(err) = self.try_place(shape, col, row, occupant) {
            panic!("illegal placement at ({col}, {row}): {err}");
        }
    }

    /// Clears every full row and column in one pass, judged on the state
    /// before any cell is cleared.
    pub fn clear_full_lines(&mut self) -> ClearedLines {
        let lines = self.occupancy.full_lines();
        for &row in &lines.rows {
            for col in 0..GRID_SIZE {
                self.set(col, row as usize, None);
            }
        }
        for &col in &lines.cols {
            for row in 0..GRID_SIZE {
                self.set(col as usize, row, None);
            }
        }
        lines
    }

    /// Snapshot of the board after placing `shape` and resolving clears.
    /// The board itself is untouched.
    pub fn simulate(&self, shape: &Shape, col: i8, row: i8) -> Snapshot {
        self.occupancy.simulate(shape, col, row)
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.cells.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let rows: Vec<[Option<Occupant>; GRID_SIZE]> = Vec::deserialize(deserializer)?;
        if rows.len() != GRID_SIZE {
            return Err(serde::de::Error::custom("expected 8 rows"));
        }
        let mut board = Board::new();
        for (row, cells) in rows.iter().enumerate() {
            for (col, &occupant) in cells.iter().enumerate() {
                board.set(col, row, occupant);
            }
        }
        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                match cell {
                    Some(Occupant(token)) => write!(f, "{:>2}", token)?,
                    None => write!(f, " .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
