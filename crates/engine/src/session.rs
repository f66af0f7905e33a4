//! game session - owns the live board, the tray and the score

use blast_core::{Board, ClearedLines, Occupant, PlacementError, Shape};
use blast_search::has_any_move;
use rand::rngs::SmallRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::TrayConfig;
use crate::scoring::placement_points;
use crate::tray::{TrayGenerator, TRAY_SIZE};

/// Number of occupant colours a tray slot can carry.
pub const PALETTE_SIZE: u8 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraySlot {
    /// This slot's own instance; rotating it never touches the catalog.
    pub shape: Shape,
    pub occupant: Occupant,
    pub placed: bool,
}

impl TraySlot {
    pub fn rotate(&mut self) {
        self.shape = self.shape.rotate90();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Playing,
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceOutcome {
    pub cleared: ClearedLines,
    pub points: u32,
    pub score: u32,
    pub tray_refreshed: bool,
    pub game_over: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("the game is over")]
    GameOver,
    #[error("tray slot {0} does not exist")]
    InvalidSlot(usize),
    #[error("tray slot {0} has already been placed")]
    SlotPlaced(usize),
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

pub struct GameSession<R = SmallRng> {
    board: Board,
    tray: [TraySlot; TRAY_SIZE],
    score: u32,
    best_score: u32,
    phase: Phase,
    generator: TrayGenerator<R>,
}

impl GameSession<SmallRng> {
    pub fn new(config: TrayConfig) -> Self {
        Self::with_generator(TrayGenerator::new(config))
    }

    pub fn with_seed(config: TrayConfig, seed: u64) -> Self {
        Self::with_generator(TrayGenerator::seeded(config, seed))
    }
}

impl<R: Rng> GameSession<R> {
    pub fn with_generator(mut generator: TrayGenerator<R>) -> Self {
        let board = Board::new();
        let tray = deal(&mut generator, &board, 0);
        Self {
            board,
            tray,
            score: 0,
            best_score: 0,
            phase: Phase::Playing,
            generator,
        }
    }

    /// Seeds the best score from wherever the caller keeps it.
    pub fn with_best_score(mut self, best_score: u32) -> Self {
        self.best_score = self.best_score.max(best_score);
        self
    }

    /// Resumes on a saved board with a freshly dealt tray.
    ///
    /// Lines already full on the saved board are cleared on load without
    /// scoring.
    pub fn with_board(mut self, board: Board) -> Self {
        self.board = board;
        let stale = self.board.clear_full_lines();
        if !stale.is_empty() {
            debug!(rows = ?stale.rows, cols = ?stale.cols, "cleared full lines on load");
        }
        self.tray = deal(&mut self.generator, &self.board, self.score);
        self.phase = Phase::Playing;
        self.check_game_over();
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn tray(&self) -> &[TraySlot] {
        &self.tray
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    pub fn generator(&self) -> &TrayGenerator<R> {
        &self.generator
    }

    pub fn unplaced_shapes(&self) -> Vec<Shape> {
        self.tray
            .iter()
            .filter(|slot| !slot.placed)
            .map(|slot| slot.shape)
            .collect()
    }

    /// Turns the slot's shape a quarter clockwise and returns the new orientation.
    pub fn rotate(&mut self, slot: usize) -> Result<Shape, SessionError> {
        let tray_slot = self.open_slot(slot)?;
        tray_slot.rotate();
        Ok(tray_slot.shape)
    }

    pub fn can_place(&self, slot: usize, col: i8, row: i8) -> bool {
        match self.tray.get(slot) {
            Some(tray_slot) if !tray_slot.placed && !self.is_game_over() => {
                self.board.can_place(&tray_slot.shape, col, row)
            }
            _ => false,
        }
    }

    pub fn place(&mut self, slot: usize, col: i8, row: i8) -> Result<PlaceOutcome, SessionError> {
        let tray_slot = *self.open_slot(slot)?;
        self.board
            .try_place(&tray_slot.shape, col, row, tray_slot.occupant)?;
        self.tray[slot].placed = true;

        let cleared = self.board.clear_full_lines();
        let points = placement_points(cleared.count());
        self.score = self.score.saturating_add(points);
        self.best_score = self.best_score.max(self.score);
        debug!(slot, col, row, lines = cleared.count(), points, "placed");

        let tray_refreshed = self.tray.iter().all(|s| s.placed);
        if tray_refreshed {
            self.tray = deal(&mut self.generator, &self.board, self.score);
        }
        let game_over = self.check_game_over();

        Ok(PlaceOutcome {
            cleared,
            points,
            score: self.score,
            tray_refreshed,
            game_over,
        })
    }

    /// New game on an empty board. The best score survives.
    pub fn reset(&mut self) {
        self.board.reset();
        self.score = 0;
        self.phase = Phase::Playing;
        self.tray = deal(&mut self.generator, &self.board, 0);
        info!(best_score = self.best_score, "session reset");
    }

    fn open_slot(&mut self, slot: usize) -> Result<&mut TraySlot, SessionError> {
        if self.is_game_over() {
            return Err(SessionError::GameOver);
        }
        let tray_slot = self
            .tray
            .get_mut(slot)
            .ok_or(SessionError::InvalidSlot(slot))?;
        if tray_slot.placed {
            return Err(SessionError::SlotPlaced(slot));
        }
        Ok(tray_slot)
    }

    fn check_game_over(&mut self) -> bool {
        if !has_any_move(&self.board.snapshot(), &self.unplaced_shapes()) {
            self.phase = Phase::GameOver;
            info!(score = self.score, best_score = self.best_score, "game over");
        }
        self.is_game_over()
    }
}

fn deal<R: Rng>(generator: &mut TrayGenerator<R>, board: &Board, score: u32) -> [TraySlot; TRAY_SIZE] {
    let shapes = generator.generate(board, score);
    let rng = generator.rng_mut();
    shapes.map(|shape| TraySlot {
        shape,
        occupant: Occupant(rng.gen_range(0..PALETTE_SIZE)),
        placed: false,
    })
}
