//! blast-wasm - WebAssembly entry points and bindings for the browser front end.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use blast_core::{Board, Catalog, Occupant, Shape};
use blast_engine::{GameSession, TrayConfig, TrayGenerator};
use blast_eval::{evaluate, EvalWeights};
use blast_search::{
    has_any_move as has_any_move_core, solve_sequence as solve_sequence_core, Placement,
};

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct JsBoard {
    inner: Board,
}

impl Default for JsBoard {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl JsBoard {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            inner: Board::new(),
        }
    }

    /// One byte per row, bit `col` set for an occupied cell.
    pub fn from_rows(rows: &[u8]) -> Self {
        let mut board = Board::new();
        for (row, bits) in rows.iter().take(Board::SIZE).enumerate() {
            for col in 0..Board::SIZE {
                if (bits >> col) & 1 == 1 {
                    board.set(col, row, Some(Occupant(0)));
                }
            }
        }
        Self { inner: board }
    }

    pub fn get(&self, col: i8, row: i8) -> bool {
        if !in_bounds(col, row) {
            return false;
        }
        self.inner.is_occupied(col as usize, row as usize)
    }

    pub fn set(&mut self, col: i8, row: i8, value: bool) {
        if !in_bounds(col, row) {
            return;
        }
        let occupant = value.then_some(Occupant(0));
        self.inner.set(col as usize, row as usize, occupant);
    }

    pub fn occupied_count(&self) -> u32 {
        self.inner.occupied_count()
    }

    pub fn can_place(&self, shape: JsValue, col: i8, row: i8) -> bool {
        shape_from_js(shape).map_or(false, |shape| self.inner.can_place(&shape, col, row))
    }

    /// False (and nothing written) when the shape is malformed or does not fit.
    pub fn place(&mut self, shape: JsValue, col: i8, row: i8, color: u8) -> bool {
        match shape_from_js(shape) {
            Some(shape) => self
                .inner
                .try_place(&shape, col, row, Occupant(color))
                .is_ok(),
            None => false,
        }
    }

    pub fn clear_lines(&mut self) -> u8 {
        self.inner.clear_full_lines().count() as u8
    }

    pub fn to_rows(&self) -> Vec<u8> {
        (0..Board::SIZE)
            .map(|row| {
                (0..Board::SIZE)
                    .filter(|&col| self.inner.is_occupied(col, row))
                    .fold(0u8, |acc, col| acc | (1 << col))
            })
            .collect()
    }

    /// Rows of cells, `null` for empty and the colour index otherwise.
    pub fn cells(&self) -> JsValue {
        to_js(&self.inner)
    }
}

#[derive(Serialize)]
pub struct JsPlacement {
    pub shape: Shape,
    pub rotation: usize,
    pub col: i8,
    pub row: i8,
}

impl From<&Placement> for JsPlacement {
    fn from(p: &Placement) -> Self {
        Self {
            shape: p.shape,
            rotation: p.rotation,
            col: p.col,
            row: p.row,
        }
    }
}

#[wasm_bindgen(js_name = catalogShapes)]
pub fn catalog_shapes() -> JsValue {
    to_js(Catalog::global().shapes())
}

#[wasm_bindgen]
pub fn evaluate_board(board: &JsBoard) -> f32 {
    evaluate(&board.inner.snapshot(), &EvalWeights::default())
}

#[wasm_bindgen]
pub fn evaluate_with_weights(board: &JsBoard, weights: JsValue) -> Result<f32, JsValue> {
    let weights: EvalWeights = serde_wasm_bindgen::from_value(weights)?;
    Ok(evaluate(&board.inner.snapshot(), &weights))
}

#[wasm_bindgen]
pub fn has_any_move(board: &JsBoard, shapes: JsValue) -> bool {
    match shapes_from_js(shapes) {
        Some(shapes) => has_any_move_core(&board.inner.snapshot(), &shapes),
        None => false,
    }
}

#[wasm_bindgen]
pub fn solve_sequence(board: &JsBoard, shapes: JsValue) -> JsValue {
    let Some(shapes) = shapes_from_js(shapes) else {
        return JsValue::NULL;
    };
    match solve_sequence_core(&board.inner.snapshot(), &shapes) {
        Some(placements) => {
            let result: Vec<JsPlacement> = placements.iter().map(JsPlacement::from).collect();
            to_js(&result)
        }
        None => JsValue::NULL,
    }
}

#[wasm_bindgen]
pub fn generate_tray(board: &JsBoard, score: u32, seed: u32) -> JsValue {
    let mut generator = TrayGenerator::seeded(TrayConfig::default(), seed as u64);
    to_js(&generator.generate_report(&board.inner, score))
}

#[wasm_bindgen(js_name = generateTrayWithConfig)]
pub fn generate_tray_with_config(
    board: &JsBoard,
    score: u32,
    seed: u32,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let mut generator = TrayGenerator::seeded(config, seed as u64);
    Ok(to_js(&generator.generate_report(&board.inner, score)))
}

// ============================================================================
// Session Bindings
// ============================================================================

/// A whole game: board, tray and score. The caller persists the best score.
#[wasm_bindgen]
pub struct JsSession {
    inner: GameSession,
}

#[wasm_bindgen]
impl JsSession {
    #[wasm_bindgen(constructor)]
    pub fn new(best_score: u32) -> Self {
        Self {
            inner: GameSession::new(TrayConfig::default()).with_best_score(best_score),
        }
    }

    /// Reproducible session for replays and tests.
    pub fn seeded(seed: u32, best_score: u32) -> Self {
        Self {
            inner: GameSession::with_seed(TrayConfig::default(), seed as u64)
                .with_best_score(best_score),
        }
    }

    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(seed: u32, best_score: u32, config: JsValue) -> Result<JsSession, JsValue> {
        let config = config_from_js(config)?;
        Ok(Self {
            inner: GameSession::with_seed(config, seed as u64).with_best_score(best_score),
        })
    }

    /// Outcome object on success; throws the rejection message otherwise.
    pub fn place(&mut self, slot: usize, col: i8, row: i8) -> Result<JsValue, JsValue> {
        self.inner
            .place(slot, col, row)
            .map(|outcome| to_js(&outcome))
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn rotate(&mut self, slot: usize) -> Result<JsValue, JsValue> {
        self.inner
            .rotate(slot)
            .map(|shape| to_js(&shape))
            .map_err(|err| JsValue::from_str(&err.to_string()))
    }

    pub fn can_place(&self, slot: usize, col: i8, row: i8) -> bool {
        self.inner.can_place(slot, col, row)
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    pub fn tray(&self) -> JsValue {
        to_js(self.inner.tray())
    }

    pub fn board_rows(&self) -> JsValue {
        to_js(self.inner.board())
    }

    #[wasm_bindgen(getter)]
    pub fn score(&self) -> u32 {
        self.inner.score()
    }

    #[wasm_bindgen(getter, js_name = bestScore)]
    pub fn best_score(&self) -> u32 {
        self.inner.best_score()
    }

    #[wasm_bindgen(getter, js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or_else(|_| JsValue::NULL)
}

/// Deserialized and validated; bad settings throw instead of reaching the generator.
fn config_from_js(value: JsValue) -> Result<TrayConfig, JsValue> {
    let config: TrayConfig = serde_wasm_bindgen::from_value(value)?;
    config
        .validate()
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(config)
}

fn shape_from_js(value: JsValue) -> Option<Shape> {
    serde_wasm_bindgen::from_value(value).ok()
}

fn shapes_from_js(value: JsValue) -> Option<Vec<Shape>> {
    serde_wasm_bindgen::from_value(value).ok()
}

fn in_bounds(col: i8, row: i8) -> bool {
    col >= 0 && row >= 0 && col < Board::SIZE as i8 && row < Board::SIZE as i8
}
