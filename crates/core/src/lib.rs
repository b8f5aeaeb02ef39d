//! Core game logic module - pure, deterministic, and testable
//!
//! This crate contains the rules of a falling-block puzzle played on a
//! fractional-occupancy grid. It has no dependencies on rendering, input or
//! timing, so the same engine runs under a terminal driver, a test or a bot.
//!
//! # Module Structure
//!
//! - [`geometry`]: points, convex quads, polygon clipping and areas
//! - [`cell`]: one grid square holding a fractional area and a colour
//! - [`board`]: the walled grid, the merge test and line clearing
//! - [`mino`]: pieces made of weighted unit blocks with a pivot
//! - [`library`]: piece definitions loaded from JSON
//! - [`rng`]: seeded shuffling and the piece queue
//! - [`scoring`]: points for cleared lines
//! - [`engine`]: the move / rotate / drop / place state machine
//! - [`snapshot`]: serializable views of a running game
//!
//! # Game Rules
//!
//! - Pieces may sit at any real-valued offset and any rotation angle
//! - A cell may hold at most one unit of area; a move that would overfill any
//!   cell is rejected
//! - A piece that fails one downward step is grounded; a second failed step
//!   locks it
//! - A row clears once its occupancy reaches the threshold percentage of its
//!   width
//!
//! # Example
//!
//! ```
//! use fractris_core::{Engine, EngineConfig, MoveOutcome, PieceLibrary};
//!
//! let mut engine = Engine::new(EngineConfig::default(), PieceLibrary::standard(), 12345).unwrap();
//!
//! assert_eq!(engine.move_by(0.0, 1.0), MoveOutcome::Moved);
//! engine.rotate(-90.0);
//! let event = engine.hard_drop(1.0);
//!
//! assert!(!event.topped_out);
//! assert!(engine.board().within_capacity());
//! ```

pub mod board;
pub mod cell;
pub mod config;
pub mod engine;
pub mod geometry;
pub mod library;
pub mod mino;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use fractris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use cell::{Cell, CellColor};
pub use config::{ConfigError, EngineConfig, MAX_BOARD_SIDE};
pub use engine::{Engine, EngineError, LockEvent, MoveOutcome};
pub use geometry::{union_centroid, Point, Quad};
pub use library::{LibraryError, PieceLibrary, PieceRecord};
pub use mino::{Block, Mino};
pub use rng::{PieceQueue, SimpleRng};
pub use scoring::calculate_points;
pub use snapshot::{ActiveSnapshot, BlockSnapshot, CellSnapshot, GameSnapshot};
