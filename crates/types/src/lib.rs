//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data with no external dependencies, so they are usable
//! from the core engine, the session layer and any external renderer.
//!
//! # Board Dimensions
//!
//! The playable area defaults to 10 columns by 20 rows. The engine surrounds it
//! with one permanently full wall column on each side and one full floor row
//! below, so the stored grid is `(height + 1) x (width + 2)`.
//!
//! # Occupancy
//!
//! Cells hold a fractional `area` in tenths of a unit cell rather than a
//! boolean. A cell with `area == 0` always carries [`EMPTY_COLOR`].
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_WIDTH` | 10 | Interior columns |
//! | `DEFAULT_HEIGHT` | 20 | Interior rows |
//! | `DEFAULT_THRESHOLD` | 100 | Percent of a row's capacity needed to clear it |
//! | `QUEUE_REFILL_BELOW` | 6 | Refill the piece queue below this length |
//! | `PREVIEW_LEN` | 5 | Pieces shown in the next-piece preview |
//!
//! # Examples
//!
//! ```
//! use fractris_types::{GameAction, EMPTY_COLOR, DEFAULT_WIDTH};
//!
//! // Parse the command vocabulary used by game configs
//! assert_eq!(GameAction::from_str("cw"), Some(GameAction::RotateCw));
//! assert_eq!(GameAction::from_str("HardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(EMPTY_COLOR, [20, 20, 20]);
//! assert_eq!(DEFAULT_WIDTH, 10);
//! ```

/// An RGB colour, one byte per channel.
pub type Rgb = [u8; 3];

/// Colour carried by every empty cell.
pub const EMPTY_COLOR: Rgb = [20, 20, 20];

/// Colour of the permanent wall and floor cells.
///
/// Distinct from [`EMPTY_COLOR`] so that the sentinel only ever marks zero-area cells.
pub const WALL_COLOR: Rgb = [128, 128, 128];

/// Default number of interior columns
pub const DEFAULT_WIDTH: usize = 10;

/// Default number of interior rows
pub const DEFAULT_HEIGHT: usize = 20;

/// Default line-clear threshold, as a percentage of a row's full capacity.
///
/// Also the score multiplier.
pub const DEFAULT_THRESHOLD: f64 = 100.0;

/// The piece queue is topped up with a fresh bag once fewer than this many remain.
pub const QUEUE_REFILL_BELOW: usize = 6;

/// Number of upcoming pieces exposed for preview.
pub const PREVIEW_LEN: usize = 5;

/// Default movement step (cells per move command)
pub const DEFAULT_OFFSET: f64 = 1.0;

/// Default rotation step in degrees
pub const DEFAULT_ANGLE: f64 = 90.0;

/// Commands a game session understands.
///
/// Names match the command strings used in game config keymaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move the piece left by the configured offset
    Left,
    /// Move the piece right by the configured offset
    Right,
    /// Move the piece down by the configured offset
    Down,
    /// Rotate clockwise by the configured angle
    RotateCw,
    /// Rotate counter-clockwise by the configured angle
    RotateCcw,
    /// Rotate clockwise by twice the configured angle
    RotateCw2x,
    /// Rotate counter-clockwise by twice the configured angle
    RotateCcw2x,
    /// Drop until grounded, then lock
    HardDrop,
    /// Toggle pause
    Pause,
    /// Leave the game
    Quit,
    /// Start a fresh game
    Retry,
}

impl GameAction {
    /// Parse action from its config name (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use fractris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("left"), Some(GameAction::Left));
    /// assert_eq!(GameAction::from_str("ccw2x"), Some(GameAction::RotateCcw2x));
    /// assert_eq!(GameAction::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" => Some(GameAction::Left),
            "right" => Some(GameAction::Right),
            "down" => Some(GameAction::Down),
            "cw" => Some(GameAction::RotateCw),
            "ccw" => Some(GameAction::RotateCcw),
            "cw2x" => Some(GameAction::RotateCw2x),
            "ccw2x" => Some(GameAction::RotateCcw2x),
            "harddrop" => Some(GameAction::HardDrop),
            "pause" => Some(GameAction::Pause),
            "quit" => Some(GameAction::Quit),
            "retry" => Some(GameAction::Retry),
            _ => None,
        }
    }

    /// Config name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::Left => "left",
            GameAction::Right => "right",
            GameAction::Down => "down",
            GameAction::RotateCw => "cw",
            GameAction::RotateCcw => "ccw",
            GameAction::RotateCw2x => "cw2x",
            GameAction::RotateCcw2x => "ccw2x",
            GameAction::HardDrop => "harddrop",
            GameAction::Pause => "pause",
            GameAction::Quit => "quit",
            GameAction::Retry => "retry",
        }
    }

    /// Whether the action still applies while paused or after game over.
    pub fn is_meta(&self) -> bool {
        matches!(
            self,
            GameAction::Pause | GameAction::Quit | GameAction::Retry
        )
    }
}
