//! Cell module - one grid square with fractional occupancy
//!
//! A cell accumulates how much of its unit area is covered by piece blocks.
//! Contributions are rounded to tenths, so a block that merely grazes a cell
//! adds nothing and the stored area always sits on the tenths grid.

use serde::ser::SerializeSeq;
use serde::Serialize;

use crate::geometry::{Point, Quad};
use crate::mino::Block;
use crate::types::{Rgb, EMPTY_COLOR, WALL_COLOR};

/// Contributions above this share of a cell blend the incoming colour in.
const BLEND_MIN_CONTRIBUTION: f64 = 0.1;

/// Round to one decimal place.
///
/// Rounds the exact binary value, so `0.35` (stored just below) gives `0.3`,
/// and exact ties such as `0.25` go to the even tenth.
#[inline]
pub fn round_tenths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let lower = (value * 10.0).floor();
    // Fused, so the sign of the distance to the midpoint is exact.
    let above_mid = value.mul_add(10.0, -(lower + 0.5));
    let tenths = if above_mid > 0.0 {
        lower + 1.0
    } else if above_mid < 0.0 || lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };
    tenths / 10.0
}

/// Colour as exposed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellColor {
    /// Empty cell: plain RGB
    Opaque(Rgb),
    /// Occupied cell: RGB plus `area * 255` as a fill alpha
    Translucent(Rgb, f64),
}

/// Serialized flat: `[r, g, b]` or `[r, g, b, alpha]`.
impl Serialize for CellColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CellColor::Opaque(rgb) => rgb.serialize(serializer),
            CellColor::Translucent(rgb, alpha) => {
                let mut seq = serializer.serialize_seq(Some(4))?;
                for channel in rgb {
                    seq.serialize_element(channel)?;
                }
                seq.serialize_element(alpha)?;
                seq.end()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    quad: Quad,
    area: f64,
    color: Rgb,
}

impl Cell {
    /// An empty interior cell covering `[x, x + 1] x [y, y + 1]`
    pub fn empty(x: i32, y: i32) -> Self {
        Self {
            quad: Quad::unit(x as f64, y as f64),
            area: 0.0,
            color: EMPTY_COLOR,
        }
    }

    /// A permanently full wall or floor cell
    pub fn wall(x: i32, y: i32) -> Self {
        Self {
            quad: Quad::unit(x as f64, y as f64),
            area: 1.0,
            color: WALL_COLOR,
        }
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn rgb(&self) -> Rgb {
        self.color
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn vertices(&self) -> &[Point; 4] {
        self.quad.vertices()
    }

    pub fn is_empty(&self) -> bool {
        self.area == 0.0
    }

    /// Whether the cell holds more than one full unit
    pub fn is_over_capacity(&self) -> bool {
        self.area > 1.0
    }

    /// Accumulate the overlap of `block` into this cell.
    ///
    /// Returns the unrounded contribution (share of this cell covered,
    /// weighted by the block's density).
    pub fn intersect(&mut self, block: &Block, color: Rgb) -> f64 {
        let contribution =
            block.quad.intersection_area(&self.quad) * block.density / self.quad.area();
        self.area = round_tenths(self.area + round_tenths(contribution));

        if self.area != 0.0 {
            if self.color == EMPTY_COLOR {
                self.color = color;
            } else if contribution > BLEND_MIN_CONTRIBUTION {
                self.blend(color);
            }
        } else {
            self.color = EMPTY_COLOR;
        }

        contribution
    }

    /// Root-mean-square blend per channel
    fn blend(&mut self, incoming: Rgb) {
        for (old, new) in self.color.iter_mut().zip(incoming) {
            let a = f64::from(*old);
            let b = f64::from(new);
            *old = ((a * a + b * b) / 2.0).sqrt().round() as u8;
        }
    }

    /// Translate the cell's geometry; used when rows shift during a line clear.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.quad.translate(dx, dy);
    }

    pub fn color(&self) -> CellColor {
        if self.area == 0.0 {
            CellColor::Opaque(self.color)
        } else {
            CellColor::Translucent(self.color, self.area * 255.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_at(x: f64, y: f64, density: f64) -> Block {
        Block::new(Quad::unit(x, y), density)
    }

    #[test]
    fn round_tenths_matches_decimal_rounding() {
        assert_eq!(round_tenths(0.25), 0.2);
        assert_eq!(round_tenths(0.35), 0.3);
        assert_eq!(round_tenths(0.75), 0.8);
        assert_eq!(round_tenths(0.04), 0.0);
        assert_eq!(round_tenths(0.96), 1.0);
        assert_eq!(round_tenths(0.2 + 0.1), 0.3);
        assert_eq!(round_tenths(-0.25), -0.2);
    }

    #[test]
    fn quarter_overlap_rounds_to_even_tenth() {
        let mut cell = Cell::empty(2, 6);
        cell.intersect(&block_at(1.5, 5.5, 1.0), [240, 240, 0]);
        assert_eq!(cell.area(), 0.2);
    }

    #[test]
    fn full_overlap_fills_and_adopts_color() {
        let mut cell = Cell::empty(2, 3);
        cell.intersect(&block_at(2.0, 3.0, 1.0), [200, 0, 0]);
        assert_eq!(cell.area(), 1.0);
        assert_eq!(cell.rgb(), [200, 0, 0]);
        assert_eq!(cell.color(), CellColor::Translucent([200, 0, 0], 255.0));
    }

    #[test]
    fn disjoint_block_keeps_cell_empty() {
        let mut cell = Cell::empty(0, 0);
        cell.intersect(&block_at(1.0, 0.0, 1.0), [200, 0, 0]);
        assert!(cell.is_empty());
        assert_eq!(cell.rgb(), EMPTY_COLOR);
        assert_eq!(cell.color(), CellColor::Opaque(EMPTY_COLOR));
    }

    #[test]
    fn grazing_overlap_rounds_to_nothing() {
        let mut cell = Cell::empty(0, 0);
        // 4% overlap rounds down to zero.
        cell.intersect(&block_at(0.96, 0.0, 1.0), [10, 200, 10]);
        assert!(cell.is_empty());
        assert_eq!(cell.rgb(), EMPTY_COLOR);
    }

    #[test]
    fn density_scales_the_contribution() {
        let mut cell = Cell::empty(0, 0);
        cell.intersect(&block_at(0.0, 0.0, 0.5), [0, 0, 200]);
        assert_eq!(cell.area(), 0.5);

        cell.intersect(&block_at(0.5, 0.0, 1.0), [0, 0, 200]);
        assert_eq!(cell.area(), 1.0);
    }

    #[test]
    fn second_piece_blends_with_rms() {
        let mut cell = Cell::empty(0, 0);
        cell.intersect(&block_at(0.0, 0.0, 0.5), [100, 0, 200]);
        cell.intersect(&block_at(0.0, 0.0, 0.5), [200, 0, 0]);
        // sqrt((100^2 + 200^2) / 2) = 158.11..., sqrt(200^2 / 2) = 141.42...
        assert_eq!(cell.rgb(), [158, 0, 141]);
        assert_eq!(cell.area(), 1.0);
    }

    #[test]
    fn small_contribution_does_not_blend() {
        let mut cell = Cell::empty(0, 0);
        cell.intersect(&block_at(0.0, 0.0, 0.5), [100, 100, 100]);
        // Exactly 0.1 of the cell: added to the area, colour unchanged.
        cell.intersect(&block_at(0.0, 0.0, 0.1), [0, 0, 0]);
        assert_eq!(cell.area(), 0.6);
        assert_eq!(cell.rgb(), [100, 100, 100]);
    }

    #[test]
    fn tenths_do_not_drift() {
        let mut cell = Cell::empty(0, 0);
        for _ in 0..10 {
            cell.intersect(&block_at(0.0, 0.0, 0.1), [50, 50, 50]);
        }
        assert_eq!(cell.area(), 1.0);
        assert!(!cell.is_over_capacity());

        cell.intersect(&block_at(0.0, 0.0, 0.1), [50, 50, 50]);
        assert!(cell.is_over_capacity());
    }

    #[test]
    fn wall_cells_are_full_and_not_sentinel() {
        let wall = Cell::wall(-1, 0);
        assert_eq!(wall.area(), 1.0);
        assert_ne!(wall.rgb(), EMPTY_COLOR);
    }

    #[test]
    fn color_serializes_flat() {
        let empty = serde_json::to_string(&CellColor::Opaque(EMPTY_COLOR)).unwrap();
        assert_eq!(empty, "[20,20,20]");

        let half = serde_json::to_string(&CellColor::Translucent([1, 2, 3], 127.5)).unwrap();
        assert_eq!(half, "[1,2,3,127.5]");
    }

    #[test]
    fn move_by_shifts_geometry_only() {
        let mut cell = Cell::empty(0, 0);
        cell.intersect(&block_at(0.0, 0.0, 1.0), [1, 2, 3]);
        cell.move_by(0.0, 1.0);
        assert_eq!(cell.quad(), &Quad::unit(0.0, 1.0));
        assert_eq!(cell.area(), 1.0);
        assert_eq!(cell.rgb(), [1, 2, 3]);
    }
}
