//! Board module - the fractional-occupancy grid
//!
//! The board stores `height + 1` rows of `width + 2` cells. Column 0 and
//! column `width + 1` are walls and the last row is the floor; all three are
//! permanently full, so collisions with the edges need no special casing.
//!
//! Grid coordinates: interior x runs `0..width`, the walls sit at x = -1 and
//! x = width; y runs `0..height` with the floor at y = height. Cell `(x, y)`
//! covers the unit square `[x, x + 1] x [y, y + 1]`.

use std::collections::BTreeSet;
use std::fmt;

use arrayvec::ArrayVec;

use crate::cell::{round_tenths, Cell};
use crate::mino::{Block, Mino};

/// Row weights are sums of tenths; tolerate the float noise of adding them up.
const WEIGHT_EPSILON: f64 = 1e-9;

/// The game board
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: usize,
    height: usize,
    rows: Vec<Vec<Cell>>,
}

impl Board {
    /// Create an empty board with walls and floor
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..=height)
            .map(|y| {
                if y == height {
                    Self::floor_row(width, y)
                } else {
                    Self::empty_row(width, y)
                }
            })
            .collect();
        Self {
            width,
            height,
            rows,
        }
    }

    fn empty_row(width: usize, y: usize) -> Vec<Cell> {
        let y = y as i32;
        let right = width as i32;
        (-1..=right)
            .map(|x| {
                if x == -1 || x == right {
                    Cell::wall(x, y)
                } else {
                    Cell::empty(x, y)
                }
            })
            .collect()
    }

    fn floor_row(width: usize, y: usize) -> Vec<Cell> {
        (-1..=width as i32).map(|x| Cell::wall(x, y as i32)).collect()
    }

    /// Interior columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Interior rows (the floor row is extra)
    pub fn height(&self) -> usize {
        self.height
    }

    /// All stored rows, walls and floor included
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Whether grid column `x` exists (walls included)
    pub fn has_column(&self, x: i32) -> bool {
        x >= -1 && x <= self.width as i32
    }

    /// Whether grid row `y` exists (floor included)
    pub fn has_row(&self, y: i32) -> bool {
        y >= 0 && y <= self.height as i32
    }

    /// Cell at grid coordinates, walls and floor included
    pub fn get(&self, x: i32, y: i32) -> Option<&Cell> {
        if !self.has_column(x) || !self.has_row(y) {
            return None;
        }
        Some(&self.rows[y as usize][(x + 1) as usize])
    }

    pub fn get_mut(&mut self, x: i32, y: i32) -> Option<&mut Cell> {
        if !self.has_column(x) || !self.has_row(y) {
            return None;
        }
        Some(&mut self.rows[y as usize][(x + 1) as usize])
    }

    /// Interior cells of row `y`
    pub fn interior(&self, y: usize) -> &[Cell] {
        let row = &self.rows[y];
        &row[1..row.len() - 1]
    }

    /// Total occupancy of a row's interior cells
    pub fn row_weight(&self, y: usize) -> f64 {
        self.interior(y).iter().map(Cell::area).sum()
    }

    /// Weight of every playable row, top to bottom, rounded to tenths
    pub fn row_weights(&self) -> Vec<f64> {
        (0..self.height)
            .map(|y| round_tenths(self.row_weight(y)))
            .collect()
    }

    /// Whether every cell is at or below full capacity
    pub fn within_capacity(&self) -> bool {
        self.rows.iter().flatten().all(|cell| !cell.is_over_capacity())
    }

    /// Grid cells that can overlap `block`: the 3x3 neighbourhood of the cell
    /// containing its centroid, clipped to the board.
    ///
    /// Returns `None` when the centroid has left the board through a wall or
    /// the floor. Blocks above the top row are allowed.
    pub fn neighbourhood(&self, block: &Block) -> Option<ArrayVec<(i32, i32), 9>> {
        let centroid = block.centroid();
        if !centroid.is_finite() {
            return None;
        }
        let (x, y) = centroid.grid_floor();
        if !self.has_column(x) || y > self.height as i32 {
            return None;
        }

        let mut cells = ArrayVec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (cx, cy) = (x + dx, y + dy);
                if self.has_column(cx) && self.has_row(cy) {
                    cells.push((cx, cy));
                }
            }
        }
        Some(cells)
    }

    /// The board as it would look with `mino` merged in, or `None` if any
    /// cell would exceed full capacity. Never modifies `self`.
    pub fn merged_with(&self, mino: &Mino) -> Option<Board> {
        let mut candidates = BTreeSet::new();
        for block in mino.blocks() {
            candidates.extend(self.neighbourhood(block)?);
        }

        let mut scratch = self.clone();
        for (x, y) in candidates {
            let Some(cell) = scratch.get_mut(x, y) else {
                continue;
            };
            for block in mino.blocks() {
                cell.intersect(block, mino.color());
            }
            if cell.is_over_capacity() {
                return None;
            }
        }
        Some(scratch)
    }

    /// Remove every row whose weight reaches `threshold` percent of its
    /// capacity and return how many were removed.
    ///
    /// Rows are visited once, top to bottom; rows above a cleared one shift
    /// down and a fresh empty row appears at the top.
    pub fn clear_lines(&mut self, threshold: f64) -> usize {
        let required = self.width as f64 * threshold / 100.0;
        let mut cleared = 0;

        for y in 0..self.height {
            if self.row_weight(y) + WEIGHT_EPSILON < required {
                continue;
            }

            self.rows.remove(y);
            for row in &mut self.rows[..y] {
                for cell in row.iter_mut() {
                    cell.move_by(0.0, 1.0);
                }
            }
            self.rows.insert(0, Self::empty_row(self.width, 0));
            cleared += 1;
        }

        cleared
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(crate::types::DEFAULT_WIDTH, crate::types::DEFAULT_HEIGHT)
    }
}

/// One line per row, cell areas separated by spaces (walls and floor included).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            let mut first = true;
            for cell in row {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{:.1}", cell.area())?;
                first = false;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
