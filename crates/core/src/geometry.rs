//! Geometry module - unit quads, affine moves and intersection area
//!
//! Every cell and every piece block starts life as the unit square
//! `[x, x + 1] x [y, y + 1]`. Translation and rotation about an arbitrary
//! pivot keep it a convex quadrilateral, so all collision geometry reduces to
//! the intersection area of two convex quads.
//!
//! Vertices are stored counter-clockwise in the grid frame (x right, y down
//! the board), which makes the signed shoelace area of a fresh unit quad +1.

use arrayvec::ArrayVec;
use serde::Serialize;

/// A point in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate by `(dx, dy)`
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotate about `pivot` by `angle_deg` degrees (positive is counter-clockwise)
    pub fn rotated(self, angle_deg: f64, pivot: Point) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        let dx = self.x - pivot.x;
        let dy = self.y - pivot.y;
        Self::new(
            pivot.x + dx * cos - dy * sin,
            pivot.y + dx * sin + dy * cos,
        )
    }

    /// Integer grid coordinates of the cell containing this point
    pub fn grid_floor(self) -> (i32, i32) {
        (self.x.floor() as i32, self.y.floor() as i32)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Cross product of `(b - a)` and `(p - a)`; positive when `p` is left of `a -> b`.
#[inline(always)]
fn side(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Signed shoelace area of a closed polygon
fn signed_area(vertices: &[Point]) -> f64 {
    let n = vertices.len();
    let mut twice = 0.0;
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice / 2.0
}

/// Each clip edge at most doubles the vertex count, so four edges bound it at 64.
type Clipped = ArrayVec<Point, 64>;

/// A convex quadrilateral: a unit grid square, possibly moved and rotated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Quad {
    vertices: [Point; 4],
}

impl Quad {
    /// The unit square with top-left corner at `(x, y)`
    pub fn unit(x: f64, y: f64) -> Self {
        Self {
            vertices: [
                Point::new(x, y),
                Point::new(x + 1.0, y),
                Point::new(x + 1.0, y + 1.0),
                Point::new(x, y + 1.0),
            ],
        }
    }

    pub fn vertices(&self) -> &[Point; 4] {
        &self.vertices
    }

    /// Unsigned area
    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Area-weighted centroid
    pub fn centroid(&self) -> Point {
        let a = signed_area(&self.vertices);
        if a == 0.0 {
            // Degenerate quad: fall back to the vertex average.
            let sx: f64 = self.vertices.iter().map(|p| p.x).sum();
            let sy: f64 = self.vertices.iter().map(|p| p.y).sum();
            return Point::new(sx / 4.0, sy / 4.0);
        }

        let mut cx = 0.0;
        let mut cy = 0.0;
        for i in 0..4 {
            let p = self.vertices[i];
            let q = self.vertices[(i + 1) % 4];
            let cross = p.x * q.y - q.x * p.y;
            cx += (p.x + q.x) * cross;
            cy += (p.y + q.y) * cross;
        }
        Point::new(cx / (6.0 * a), cy / (6.0 * a))
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        for v in &mut self.vertices {
            *v = v.translated(dx, dy);
        }
    }

    pub fn rotate(&mut self, angle_deg: f64, pivot: Point) {
        for v in &mut self.vertices {
            *v = v.rotated(angle_deg, pivot);
        }
    }

    /// Axis-aligned bounds as `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut b = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for v in &self.vertices {
            b.0 = b.0.min(v.x);
            b.1 = b.1.min(v.y);
            b.2 = b.2.max(v.x);
            b.3 = b.3.max(v.y);
        }
        b
    }

    /// Area of the intersection of two quads; 0 when they are disjoint or only touch.
    pub fn intersection_area(&self, other: &Quad) -> f64 {
        let (ax0, ay0, ax1, ay1) = self.bounds();
        let (bx0, by0, bx1, by1) = other.bounds();
        if ax1 <= bx0 || bx1 <= ax0 || ay1 <= by0 || by1 <= ay0 {
            return 0.0;
        }

        let clipped = clip_convex(&self.vertices, &other.vertices);
        if clipped.len() < 3 {
            return 0.0;
        }
        signed_area(&clipped).abs()
    }
}

/// Sutherland-Hodgman clip of a convex `subject` against a convex `clip` polygon.
fn clip_convex(subject: &[Point; 4], clip: &[Point; 4]) -> Clipped {
    let mut output: Clipped = subject.iter().copied().collect();
    let orientation = signed_area(clip).signum();

    for i in 0..clip.len() {
        if output.is_empty() {
            break;
        }
        let a = clip[i];
        let b = clip[(i + 1) % clip.len()];
        let input = std::mem::take(&mut output);

        let mut prev = input[input.len() - 1];
        let mut prev_side = side(a, b, prev) * orientation;
        for &cur in &input {
            let cur_side = side(a, b, cur) * orientation;
            if cur_side >= 0.0 {
                if prev_side < 0.0 {
                    output.push(crossing(prev, cur, prev_side, cur_side));
                }
                output.push(cur);
            } else if prev_side >= 0.0 {
                output.push(crossing(prev, cur, prev_side, cur_side));
            }
            prev = cur;
            prev_side = cur_side;
        }
    }

    output
}

/// Point where segment `p -> q` crosses the clip edge, given both side values.
#[inline(always)]
fn crossing(p: Point, q: Point, p_side: f64, q_side: f64) -> Point {
    let t = p_side / (p_side - q_side);
    Point::new(p.x + (q.x - p.x) * t, p.y + (q.y - p.y) * t)
}

/// Area-weighted centroid of the union of grid cells.
///
/// Identical quads are counted once, so a shape listing the same cell twice
/// gets the same pivot as one listing it once. Distinct cells of a piece never
/// overlap, which makes the union area the plain sum of their areas.
pub fn union_centroid(quads: &[Quad]) -> Option<Point> {
    let mut seen: Vec<&Quad> = Vec::with_capacity(quads.len());
    let mut total = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;

    for quad in quads {
        if seen.iter().any(|q| *q == quad) {
            continue;
        }
        seen.push(quad);

        let area = quad.area();
        let c = quad.centroid();
        total += area;
        cx += c.x * area;
        cy += c.y * area;
    }

    if total == 0.0 {
        return None;
    }
    Some(Point::new(cx / total, cy / total))
}
