use blast_engine::{TrayConfig, TraySlot};
use blast_eval::EvalWeights;
use blast_wasm::*;
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Deserialize)]
struct TestTrayReport {
    pub shapes: Vec<Vec<Vec<u8>>>,
    pub difficulty: f32,
}

#[derive(Deserialize)]
struct TestOutcome {
    pub points: u32,
    pub score: u32,
    pub tray_refreshed: bool,
}

fn js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).expect("to js")
}

#[wasm_bindgen_test]
fn test_board_new() {
    let board = JsBoard::new();
    assert!(!board.get(0, 0));
    assert!(!board.get(-1, 9));
    assert_eq!(board.occupied_count(), 0);
}

#[wasm_bindgen_test]
fn test_rows_and_clear() {
    let mut rows = [0u8; 8];
    rows[0] = 0xFF;
    rows[3] = 0b0000_0101;
    let mut board = JsBoard::from_rows(&rows);
    assert_eq!(board.to_rows(), rows.to_vec());
    assert_eq!(board.clear_lines(), 1);
    assert_eq!(board.occupied_count(), 2);
}

#[wasm_bindgen_test]
fn test_place_shape_from_matrix() {
    let mut board = JsBoard::new();
    let square = js(&vec![vec![1u8, 1], vec![1, 1]]);
    assert!(board.can_place(square.clone(), 6, 6));
    assert!(!board.can_place(square.clone(), 7, 7));
    assert!(board.place(square.clone(), 6, 6, 2));
    assert!(!board.place(square, 6, 6, 2));
    assert_eq!(board.occupied_count(), 4);
    // malformed matrices are rejected, not panicked on
    assert!(!board.can_place(JsValue::from_str("square"), 0, 0));
}

#[wasm_bindgen_test]
fn test_catalog_shapes() {
    let shapes: Vec<Vec<Vec<u8>>> =
        serde_wasm_bindgen::from_value(catalog_shapes()).expect("catalog");
    assert_eq!(shapes.len(), 35);
    assert_eq!(shapes[0], vec![vec![1]]);
}

#[wasm_bindgen_test]
fn test_evaluate_board() {
    let board = JsBoard::new();
    assert_eq!(evaluate_board(&board), 0.0);

    let mut board = JsBoard::new();
    board.set(0, 0, true);
    let custom = js(&EvalWeights {
        fullness: 0.0,
        line_potential: 8.0,
        ..EvalWeights::default()
    });
    let score = evaluate_with_weights(&board, custom).expect("weights");
    assert!((score - 2.0).abs() < 1e-4);
}

#[wasm_bindgen_test]
fn test_has_any_move() {
    let full = JsBoard::from_rows(&[0xFF; 8]);
    let single = js(&vec![vec![vec![1u8]]]);
    assert!(!has_any_move(&full, single.clone()));
    assert!(has_any_move(&JsBoard::new(), single));
}

#[wasm_bindgen_test]
fn test_solve_sequence() {
    let board = JsBoard::new();
    let shapes = js(&vec![vec![vec![1u8, 1, 1]], vec![vec![1u8]]]);
    assert!(!solve_sequence(&board, shapes).is_null());

    let full = JsBoard::from_rows(&[0xFF; 8]);
    let shapes = js(&vec![vec![vec![1u8]]]);
    assert!(solve_sequence(&full, shapes).is_null());
}

#[wasm_bindgen_test]
fn test_generate_tray() {
    let board = JsBoard::new();
    let report: TestTrayReport =
        serde_wasm_bindgen::from_value(generate_tray(&board, 5_000, 7)).expect("report");
    assert_eq!(report.shapes.len(), 3);
    assert!((report.difficulty - 0.5).abs() < 1e-6);
}

#[wasm_bindgen_test]
fn test_generate_tray_with_config() {
    let board = JsBoard::from_rows(&[0xFF; 8]);
    let config = js(&TrayConfig {
        fallback_max_cells: 1,
        ..TrayConfig::default()
    });
    let report: TestTrayReport = serde_wasm_bindgen::from_value(
        generate_tray_with_config(&board, 0, 1, config).expect("config"),
    )
    .expect("report");
    assert!(report.shapes.iter().all(|shape| shape == &vec![vec![1u8]]));

    assert!(generate_tray_with_config(&board, 0, 1, JsValue::from_str("nope")).is_err());
}

#[wasm_bindgen_test]
fn test_inverted_mercy_bounds_rejected() {
    let inverted = TrayConfig {
        mercy_min: 0.9,
        mercy_max: 0.5,
        ..TrayConfig::default()
    };
    let board = JsBoard::new();
    assert!(generate_tray_with_config(&board, 5_000, 1, js(&inverted)).is_err());
    assert!(JsSession::with_config(1, 0, js(&inverted)).is_err());
}

#[wasm_bindgen_test]
fn test_session_place_flow() {
    let mut session = JsSession::seeded(3, 250);
    assert_eq!(session.score(), 0);
    assert_eq!(session.best_score(), 250);
    assert!(!session.is_game_over());

    let tray: Vec<TraySlot> = serde_wasm_bindgen::from_value(session.tray()).expect("tray");
    assert_eq!(tray.len(), 3);

    let (col, row) = (0..8i8)
        .flat_map(|row| (0..8i8).map(move |col| (col, row)))
        .find(|&(col, row)| session.can_place(0, col, row))
        .expect("slot 0 fits on an empty board");
    let outcome: TestOutcome =
        serde_wasm_bindgen::from_value(session.place(0, col, row).expect("placed"))
            .expect("outcome");
    assert_eq!(outcome.points, 10);
    assert_eq!(outcome.score, 10);
    assert!(!outcome.tray_refreshed);

    assert!(session.place(0, col, row).is_err());
    assert!(session.rotate(7).is_err());

    session.reset();
    assert_eq!(session.score(), 0);
    assert_eq!(session.best_score(), 250);
}

#[wasm_bindgen_test]
fn test_session_with_config() {
    let config = js(&TrayConfig::uniform());
    let session = JsSession::with_config(1, 0, config).expect("config");
    assert!(!session.is_game_over());
    assert!(JsSession::with_config(1, 0, JsValue::from_f64(3.0)).is_err());
}
