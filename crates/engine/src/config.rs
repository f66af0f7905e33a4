use blast_eval::EvalWeights;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("mercy_min {min} is greater than mercy_max {max}")]
    MercyBounds { min: f32, max: f32 },
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },
}

/// Tuning knobs for tray generation. Every threshold the generator uses
/// lives here so tests and callers can sweep them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrayConfig {
    /// Ranked draws tried before falling back to small shapes.
    pub max_attempts: u32,
    /// Score at which difficulty saturates at 1.0.
    pub score_for_max_difficulty: f32,

    /// Shapes with at least this many cells count as large.
    pub large_shape_cells: u32,
    /// Difficulty above which large shapes are promoted.
    pub large_shape_threshold: f32,
    /// Promotion for large shapes, scaled by difficulty.
    pub large_shape_bonus: f32,
    /// Demotion for the single cell, scaled by difficulty.
    pub single_cell_penalty: f32,

    pub mercy_base: f32,
    pub mercy_slope: f32,
    pub mercy_min: f32,
    pub mercy_max: f32,
    /// Below this difficulty the window is widened to `easy_mercy_floor`.
    pub easy_difficulty: f32,
    pub easy_mercy_floor: f32,
    /// Above this fullness the window is narrowed by `crowded_mercy_cut`.
    pub crowded_fullness: f32,
    pub crowded_mercy_cut: f32,

    /// Duplicates are pruned from the draw pool only while more than this
    /// many candidates remain.
    pub variety_pool_min: usize,
    /// Largest shape (in cells) the fallback may hand out.
    pub fallback_max_cells: u32,

    pub weights: EvalWeights,
}

impl Default for TrayConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            score_for_max_difficulty: 10_000.0,
            large_shape_cells: 4,
            large_shape_threshold: 0.3,
            large_shape_bonus: 20.0,
            single_cell_penalty: 5.0,
            mercy_base: 0.2,
            mercy_slope: 0.6,
            mercy_min: 0.2,
            mercy_max: 0.8,
            easy_difficulty: 0.2,
            easy_mercy_floor: 0.5,
            crowded_fullness: 0.7,
            crowded_mercy_cut: 0.3,
            variety_pool_min: 5,
            fallback_max_cells: 2,
            weights: EvalWeights::default(),
        }
    }
}

impl TrayConfig {
    /// Ranking disabled: every fitting shape is always in the window.
    pub fn uniform() -> Self {
        Self {
            mercy_base: 1.0,
            mercy_slope: 0.0,
            mercy_min: 1.0,
            mercy_max: 1.0,
            easy_mercy_floor: 1.0,
            crowded_mercy_cut: 0.0,
            ..Self::default()
        }
    }

    /// Rejects settings a caller-supplied config can get wrong.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("score_for_max_difficulty", self.score_for_max_difficulty),
            ("mercy_base", self.mercy_base),
            ("mercy_slope", self.mercy_slope),
            ("mercy_min", self.mercy_min),
            ("mercy_max", self.mercy_max),
            ("easy_mercy_floor", self.easy_mercy_floor),
            ("crowded_mercy_cut", self.crowded_mercy_cut),
        ];
        if let Some(&(field, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(ConfigError::NotFinite { field, value });
        }
        if self.mercy_min > self.mercy_max {
            return Err(ConfigError::MercyBounds {
                min: self.mercy_min,
                max: self.mercy_max,
            });
        }
        Ok(())
    }
}
