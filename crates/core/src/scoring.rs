//! Scoring module - points for cleared lines
//!
//! The line-clear threshold doubles as the score multiplier: clearing rows
//! at a stricter threshold is worth proportionally more. Four or more rows at
//! once earn ten times the threshold for every row beyond three.

/// Points for clearing `lines` rows at `threshold`
///
/// - 0..=3 lines: `lines * threshold`
/// - 4+ lines: `10 * (lines - 3) * threshold`
pub fn calculate_points(lines: usize, threshold: f64) -> f64 {
    if lines >= 4 {
        10.0 * (lines - 3) as f64 * threshold
    } else {
        lines as f64 * threshold
    }
}
