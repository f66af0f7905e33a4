//! tray generation - rank fitting shapes, draw from the mercy window,
//! verify the draw is playable, fall back to tiny shapes if it never is

use std::cmp::Ordering;

use blast_core::{Board, Catalog, Shape, Snapshot, SHAPES};
use blast_search::{best_placement, fits_anywhere, sequence_fits};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::TrayConfig;
use crate::difficulty::{difficulty, mercy_range, mercy_window, weighted_score};

pub const TRAY_SIZE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraySource {
    /// Drawn from the ranked window and verified on the given attempt.
    Ranked { attempt: u32 },
    /// Small shapes picked after every ranked attempt failed.
    Fallback,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrayReport {
    pub shapes: [Shape; TRAY_SIZE],
    pub source: TraySource,
    pub difficulty: f32,
}

/// A fitting catalog shape with its difficulty-weighted score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub shape: Shape,
    pub score: f32,
}

pub struct TrayGenerator<R = SmallRng> {
    config: TrayConfig,
    catalog: &'static Catalog,
    rng: R,
}

impl TrayGenerator<SmallRng> {
    pub fn new(config: TrayConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn seeded(config: TrayConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl Default for TrayGenerator<SmallRng> {
    fn default() -> Self {
        Self::new(TrayConfig::default())
    }
}

impl<R: Rng> TrayGenerator<R> {
    pub fn with_rng(config: TrayConfig, rng: R) -> Self {
        Self {
            config,
            catalog: Catalog::global(),
            rng,
        }
    }

    pub fn with_catalog(mut self, catalog: &'static Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> &TrayConfig {
        &self.config
    }

    /// The generator's random source, shared with the session for
    /// anything else that needs randomness.
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Three shapes in base orientation. The board is only read.
    pub fn generate(&mut self, board: &Board, score: u32) -> [Shape; TRAY_SIZE] {
        self.generate_report(board, score).shapes
    }

    #[instrument(level = "debug", skip(self, board), fields(occupied = board.occupied_count()))]
    pub fn generate_report(&mut self, board: &Board, score: u32) -> TrayReport {
        let snapshot = board.snapshot();
        let difficulty = difficulty(score, &self.config);

        let ranked = self.rank(&snapshot, difficulty);
        if ranked.is_empty() {
            debug!("no catalog shape fits, using fallback");
            return self.fallback(difficulty);
        }

        let range = mercy_range(difficulty, snapshot.fullness(), &self.config);
        let window: Vec<Shape> = ranked[..mercy_window(ranked.len(), range)]
            .iter()
            .map(|candidate| candidate.shape)
            .collect();

        for attempt in 1..=self.config.max_attempts {
            let Some(shapes) = self.draw(&window) else {
                break;
            };
            if sequence_fits(&snapshot, &shapes) {
                debug!(attempt, window = window.len(), "tray accepted");
                return TrayReport {
                    shapes,
                    source: TraySource::Ranked { attempt },
                    difficulty,
                };
            }
            debug!(attempt, "tray not playable in order, reshuffling");
        }

        debug!("attempts exhausted, using fallback");
        self.fallback(difficulty)
    }

    /// Fitting catalog shapes, best first. Shapes that only fit rotated have
    /// no base-orientation score and sink to the bottom.
    pub fn rank(&self, snapshot: &Snapshot, difficulty: f32) -> Vec<Candidate> {
        let config = &self.config;

        #[cfg(feature = "rayon")]
        let shapes = self.catalog.shapes().par_iter();
        #[cfg(not(feature = "rayon"))]
        let shapes = self.catalog.shapes().iter();

        // collect keeps catalog order under rayon too, so the stable sort
        // breaks ties the same way either way
        let mut ranked: Vec<Candidate> = shapes
            .filter(|shape| fits_anywhere(snapshot, shape))
            .map(|shape| {
                let base = best_placement(snapshot, shape, &config.weights)
                    .map_or(f32::NEG_INFINITY, |(_, score)| score);
                Candidate {
                    shape: *shape,
                    score: weighted_score(base, shape.cell_count(), difficulty, config),
                }
            })
            .collect();

        ranked.sort_by(|a, b| score_cmp(a.score, b.score));
        ranked
    }

    /// Shuffle the window and take three, pruning look-alikes while the
    /// pool is large; pad from the whole window when it runs dry.
    fn draw(&mut self, window: &[Shape]) -> Option<[Shape; TRAY_SIZE]> {
        if window.is_empty() {
            return None;
        }

        let mut shuffled = window.to_vec();
        shuffled.shuffle(&mut self.rng);

        let mut pool = shuffled.clone();
        let mut picked = Vec::with_capacity(TRAY_SIZE);
        while picked.len() < TRAY_SIZE && !pool.is_empty() {
            let shape = pool.remove(0);
            if pool.len() > self.config.variety_pool_min {
                pool.retain(|other| *other != shape);
            }
            picked.push(shape);
        }
        while picked.len() < TRAY_SIZE {
            picked.push(*shuffled.choose(&mut self.rng)?);
        }

        Some([picked[0], picked[1], picked[2]])
    }

    /// Uniform picks, with replacement, among the smallest shapes.
    fn fallback(&mut self, difficulty: f32) -> TrayReport {
        let mut small: Vec<Shape> = self
            .catalog
            .small_shapes(self.config.fallback_max_cells)
            .copied()
            .collect();
        if small.is_empty() {
            small.push(SHAPES[0]);
        }

        let rng = &mut self.rng;
        let shapes = std::array::from_fn(|_| small[rng.gen_range(0..small.len())]);
        TrayReport {
            shapes,
            source: TraySource::Fallback,
            difficulty,
        }
    }
}

fn score_cmp(a: f32, b: f32) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}
