//! fixed shape library + rotation cache
//! built once on first use, read-only afterwards

use std::sync::OnceLock;

use crate::shape::RotationSet;
use crate::Shape;

/// Every shape the tray can offer, in base orientation.
pub const SHAPES: [Shape; 35] = [
    // single
    Shape::from_matrix([[1]]),
    // lines
    Shape::from_matrix([[1, 1]]),
    Shape::from_matrix([[1], [1]]),
    Shape::from_matrix([[1, 1, 1]]),
    Shape::from_matrix([[1], [1], [1]]),
    Shape::from_matrix([[1, 1, 1, 1]]),
    Shape::from_matrix([[1], [1], [1], [1]]),
    // small corners
    Shape::from_matrix([[1, 1], [1, 0]]),
    Shape::from_matrix([[1, 1], [0, 1]]),
    Shape::from_matrix([[1, 0], [1, 1]]),
    Shape::from_matrix([[0, 1], [1, 1]]),
    // 2x2
    Shape::from_matrix([[1, 1], [1, 1]]),
    // large corners
    Shape::from_matrix([[1, 0, 0], [1, 0, 0], [1, 1, 1]]),
    Shape::from_matrix([[0, 0, 1], [0, 0, 1], [1, 1, 1]]),
    Shape::from_matrix([[1, 1, 1], [1, 0, 0], [1, 0, 0]]),
    Shape::from_matrix([[1, 1, 1], [0, 0, 1], [0, 0, 1]]),
    // 3x3, 3x2, 2x3 blocks
    Shape::from_matrix([[1, 1, 1], [1, 1, 1], [1, 1, 1]]),
    Shape::from_matrix([[1, 1], [1, 1], [1, 1]]),
    Shape::from_matrix([[1, 1, 1], [1, 1, 1]]),
    // L
    Shape::from_matrix([[1, 0], [1, 0], [1, 1]]),
    Shape::from_matrix([[0, 1], [0, 1], [1, 1]]),
    Shape::from_matrix([[1, 1], [1, 0], [1, 0]]),
    Shape::from_matrix([[1, 1], [0, 1], [0, 1]]),
    // J
    Shape::from_matrix([[1, 0, 0], [1, 1, 1]]),
    Shape::from_matrix([[0, 0, 1], [1, 1, 1]]),
    Shape::from_matrix([[1, 1, 1], [1, 0, 0]]),
    Shape::from_matrix([[1, 1, 1], [0, 0, 1]]),
    // S / Z
    Shape::from_matrix([[0, 1, 1], [1, 1, 0]]),
    Shape::from_matrix([[1, 0], [1, 1], [0, 1]]),
    Shape::from_matrix([[1, 1, 0], [0, 1, 1]]),
    Shape::from_matrix([[0, 1], [1, 1], [1, 0]]),
    // T
    Shape::from_matrix([[1, 1, 1], [0, 1, 0]]),
    Shape::from_matrix([[0, 1], [1, 1], [0, 1]]),
    Shape::from_matrix([[0, 1, 0], [1, 1, 1]]),
    Shape::from_matrix([[1, 0], [1, 1], [1, 0]]),
];

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

#[derive(Clone, Debug)]
pub struct Catalog {
    shapes: Vec<Shape>,
    rotations: Vec<RotationSet>,
}

impl Catalog {
    pub fn new(shapes: &[Shape]) -> Self {
        Self {
            shapes: shapes.to_vec(),
            rotations: shapes.iter().map(Shape::unique_rotations).collect(),
        }
    }

    /// Process-wide catalog over `SHAPES`.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(|| Catalog::new(&SHAPES))
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shape> {
        self.shapes.get(index)
    }

    pub fn index_of(&self, shape: &Shape) -> Option<usize> {
        self.shapes.iter().position(|s| s == shape)
    }

    pub fn contains(&self, shape: &Shape) -> bool {
        self.index_of(shape).is_some()
    }

    pub fn rotations_at(&self, index: usize) -> &[Shape] {
        &self.rotations[index]
    }

    /// Cached rotation set for catalog entries, computed for anything else
    /// (e.g. a tray instance the player has already turned).
    pub fn rotations(&self, shape: &Shape) -> RotationSet {
        match self.index_of(shape) {
            Some(index) => self.rotations[index].clone(),
            None => shape.unique_rotations(),
        }
    }

    /// Entries with at most `max_cells` filled cells.
    pub fn small_shapes(&self, max_cells: u32) -> impl Iterator<Item = &Shape> + '_ {
        self.shapes
            .iter()
            .filter(move |shape| shape.cell_count() <= max_cells)
    }
}
