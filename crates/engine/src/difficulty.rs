//! score-driven difficulty curve and the mercy window it controls

use crate::config::TrayConfig;

/// `min(1, score / score_for_max_difficulty)`.
pub fn difficulty(score: u32, config: &TrayConfig) -> f32 {
    if config.score_for_max_difficulty <= 0.0 {
        return 1.0;
    }
    (score as f32 / config.score_for_max_difficulty).min(1.0)
}

/// Fraction of the ranked candidates eligible for the draw.
pub fn mercy_range(difficulty: f32, fullness: f32, config: &TrayConfig) -> f32 {
    // max/min rather than clamp: inverted bounds resolve to mercy_max
    let mut range = (config.mercy_base + difficulty * config.mercy_slope)
        .max(config.mercy_min)
        .min(config.mercy_max);
    if difficulty < config.easy_difficulty {
        range = range.max(config.easy_mercy_floor);
    }
    if fullness > config.crowded_fullness {
        range = (range - config.crowded_mercy_cut).max(config.mercy_min);
    }
    range
}

/// Number of top-ranked candidates kept: `ceil(count * range)`, never more
/// than `count`.
pub fn mercy_window(count: usize, range: f32) -> usize {
    ((count as f32 * range).ceil() as usize).min(count)
}

/// Difficulty adjustment on top of a shape's best placement score.
pub fn weighted_score(base: f32, cells: u32, difficulty: f32, config: &TrayConfig) -> f32 {
    let mut score = base;
    if cells >= config.large_shape_cells && difficulty > config.large_shape_threshold {
        score += difficulty * config.large_shape_bonus;
    }
    if cells == 1 {
        score -= difficulty * config.single_cell_penalty;
    }
    score
}
