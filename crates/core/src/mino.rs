//! Mino module - rigid pieces built from unit blocks
//!
//! A mino is a named, coloured set of blocks plus a pivot. Blocks carry their
//! own density so a piece can fill only part of a cell. Moves and rotations
//! apply to the whole piece; trial transforms are always made on a clone.

use crate::geometry::{union_centroid, Point, Quad};
use crate::types::Rgb;

/// One unit square of a piece, filled to `density`.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub quad: Quad,
    pub density: f64,
}

impl Block {
    pub fn new(quad: Quad, density: f64) -> Self {
        Self { quad, density }
    }

    /// Block at grid offset `(col, row)`
    pub fn at(col: f64, row: f64, density: f64) -> Self {
        Self::new(Quad::unit(col, row), density)
    }

    pub fn centroid(&self) -> Point {
        self.quad.centroid()
    }
}

/// A falling piece
#[derive(Debug, Clone, PartialEq)]
pub struct Mino {
    name: String,
    blocks: Vec<Block>,
    color: Rgb,
    pivot: Point,
    can_fall: bool,
}

impl Mino {
    /// Build a piece from `(col, row, density)` triples.
    ///
    /// With an explicit `center` cell the pivot is that cell's centre,
    /// otherwise it is the centroid of the union of all blocks. Returns `None`
    /// when there are no blocks.
    pub fn new(
        name: impl Into<String>,
        cells: &[(f64, f64, f64)],
        color: Rgb,
        center: Option<(f64, f64)>,
    ) -> Option<Self> {
        let blocks: Vec<Block> = cells
            .iter()
            .map(|&(col, row, density)| Block::at(col, row, density))
            .collect();

        let pivot = match center {
            Some((x, y)) => Quad::unit(x, y).centroid(),
            None => {
                let quads: Vec<Quad> = blocks.iter().map(|b| b.quad).collect();
                union_centroid(&quads)?
            }
        };

        Some(Self {
            name: name.into(),
            blocks,
            color,
            pivot,
            can_fall: true,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn pivot(&self) -> Point {
        self.pivot
    }

    /// Whether the piece is still falling (has not failed a downward step)
    pub fn can_fall(&self) -> bool {
        self.can_fall
    }

    pub(crate) fn set_can_fall(&mut self, can_fall: bool) {
        self.can_fall = can_fall;
    }

    /// Translate every block and the pivot
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        for block in &mut self.blocks {
            block.quad.translate(dx, dy);
        }
        self.pivot = self.pivot.translated(dx, dy);
    }

    /// Rotate every block about the current pivot; the pivot stays put.
    pub fn rotate(&mut self, angle_deg: f64) {
        let pivot = self.pivot;
        for block in &mut self.blocks {
            block.quad.rotate(angle_deg, pivot);
        }
    }

    /// Block centroids, handy for tests and previews
    pub fn centroids(&self) -> Vec<Point> {
        self.blocks.iter().map(Block::centroid).collect()
    }
}

impl std::fmt::Display for Mino {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
