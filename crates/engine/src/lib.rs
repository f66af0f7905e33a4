//! blast-engine - tray generation and the game session.
//!
//! Ranks catalog shapes against the live board, draws playable trays, and
//! drives a session of placements, clears and scoring.

pub mod config;
pub mod difficulty;
pub mod scoring;
pub mod session;
pub mod tray;

pub use config::{ConfigError, TrayConfig};
pub use difficulty::{difficulty, mercy_range, mercy_window, weighted_score};
pub use scoring::placement_points;
pub use session::{GameSession, Phase, PlaceOutcome, SessionError, TraySlot, PALETTE_SIZE};
pub use tray::{Candidate, TrayGenerator, TrayReport, TraySource, TRAY_SIZE};

// Re-exported so callers can drive a session without naming the lower crates
pub use blast_core::{Board, Occupant, Shape, Snapshot};
pub use blast_search::has_any_move;
